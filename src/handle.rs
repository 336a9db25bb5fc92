//! このモジュールは、libclang の不透明ポインタを所有権フラグ付きで保持するハンドルを提供します。
//!
//! - 所有 (`Ownership::Owning`) ハンドルは、明示的な `close` かドロップのどちらかで
//!   ネイティブの解放関数をちょうど一度だけ呼び出します。
//! - 借用 (`Ownership::Borrowed`) ハンドルは決して解放しません。親オブジェクト
//!   (多くの場合は翻訳単位) が寿命を管理します。
use crate::error::HandleError;
use std::fmt;
use std::ptr::NonNull;

/// ネイティブ型を識別する型タグ。
///
/// # Safety
/// `Target` は libclang が返すポインタの指す型と一致している必要があります。
pub unsafe trait NativeKind {
    /// ポインタが指す型。`void *` で公開される型は `c_void` です。
    type Target;
    /// エラーメッセージやログで使用する型名。
    const NAME: &'static str;
}

/// 所有ハンドルとして保持できる種別。
///
/// # Safety
/// `dispose` は `Target` を確保した libclang 関数に対応する解放関数を呼び出す必要があります。
pub unsafe trait Disposable: NativeKind {
    /// ネイティブの解放関数を呼び出します。
    ///
    /// # Safety
    /// `raw` は未解放の有効なポインタでなければなりません。
    unsafe fn dispose(raw: NonNull<Self::Target>);
}

/// ハンドルの所有権。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// このハンドルが解放の責任を持つ
    Owning,
    /// 解放は別のオブジェクトの責任
    Borrowed,
}

/// 所有権フラグ付きの不透明ポインタ。
pub struct Handle<K: NativeKind> {
    ptr: Option<NonNull<K::Target>>,
    // Some = 所有。解放関数をハンドル自身が持つことで、Drop が種別の境界に依存しない
    deleter: Option<unsafe fn(NonNull<K::Target>)>,
}

impl<K: NativeKind> Handle<K> {
    /// 所有ハンドルを作成します。`raw` が null の場合は `None` を返します。
    ///
    /// # Safety
    /// `raw` は libclang が新たに確保したポインタで、他の誰も解放しないものでなければなりません。
    pub unsafe fn owned(raw: *mut K::Target) -> Option<Self>
    where
        K: Disposable,
    {
        NonNull::new(raw).map(|ptr| Self {
            ptr: Some(ptr),
            deleter: Some(K::dispose as unsafe fn(NonNull<K::Target>)),
        })
    }

    /// 借用ハンドルを作成します。`raw` が null の場合は `None` を返します。
    ///
    /// # Safety
    /// 呼び出し元は、ハンドルの使用中にポインタの所有者が生存していることを保証する必要があります。
    pub unsafe fn borrowed(raw: *mut K::Target) -> Option<Self> {
        NonNull::new(raw).map(|ptr| Self {
            ptr: Some(ptr),
            deleter: None,
        })
    }

    /// ネイティブ呼び出しに渡すための生ポインタを返します。
    pub fn raw(&self) -> Result<*mut K::Target, HandleError> {
        self.ptr
            .map(NonNull::as_ptr)
            .ok_or(HandleError::Released { kind: K::NAME })
    }

    /// 所有権を呼び出し元に移し、ハンドルを不活性にします。
    ///
    /// 以後の解放は呼び出し元の責任です。
    pub fn release(&mut self) -> Result<*mut K::Target, HandleError> {
        if self.deleter.is_none() {
            return Err(HandleError::NotOwned { kind: K::NAME });
        }
        let ptr = self
            .ptr
            .take()
            .ok_or(HandleError::Released { kind: K::NAME })?;
        Ok(ptr.as_ptr())
    }

    /// 所有ハンドルを今すぐ解放します。二回目以降の呼び出しや借用ハンドルでは何もしません。
    pub fn close(&mut self) {
        let Some(deleter) = self.deleter else {
            return;
        };
        if let Some(ptr) = self.ptr.take() {
            tracing::trace!(kind = K::NAME, ptr = ?ptr, "disposing native handle");
            unsafe { deleter(ptr) }
        }
    }

    pub fn ownership(&self) -> Ownership {
        if self.deleter.is_some() {
            Ownership::Owning
        } else {
            Ownership::Borrowed
        }
    }

    /// `release` または `close` 済みかどうか。
    pub fn is_released(&self) -> bool {
        self.ptr.is_none()
    }

    pub fn kind(&self) -> &'static str {
        K::NAME
    }

    /// ラッパー型の内部で使う生ポインタ。解放済みの場合は null です。
    pub(crate) fn as_ptr(&self) -> *mut K::Target {
        self.ptr.map_or(std::ptr::null_mut(), NonNull::as_ptr)
    }
}

impl<K: NativeKind> Drop for Handle<K> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<K: NativeKind> fmt::Debug for Handle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("kind", &K::NAME)
            .field("ptr", &self.ptr)
            .field("ownership", &self.ownership())
            .finish()
    }
}
