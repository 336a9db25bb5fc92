/// libclang の不透明型を表す型タグを宣言するマクロ。
///
/// 解放関数を指定した場合は `Disposable` も実装され、所有ハンドルとして保持できます。
/// 省略した場合は借用ハンドル専用の種別になります。
///
/// ```ignore
/// native_kind!(
///     /// `CXIndex`
///     pub IndexKind("CXIndex"): c_void => clang_disposeIndex
/// );
/// native_kind!(pub FileKind("CXFile"): c_void);
/// ```
macro_rules! native_kind {
    ($(#[$meta:meta])* $vis:vis $kind:ident($name:literal): $target:ty => $dispose:ident) => {
        native_kind!($(#[$meta])* $vis $kind($name): $target);

        unsafe impl $crate::handle::Disposable for $kind {
            unsafe fn dispose(raw: ::std::ptr::NonNull<$target>) {
                unsafe { $crate::bindings::$dispose(raw.as_ptr()) }
            }
        }
    };
    ($(#[$meta:meta])* $vis:vis $kind:ident($name:literal): $target:ty) => {
        $(#[$meta])*
        #[derive(Debug)]
        $vis enum $kind {}

        unsafe impl $crate::handle::NativeKind for $kind {
            type Target = $target;
            const NAME: &'static str = $name;
        }
    };
}
