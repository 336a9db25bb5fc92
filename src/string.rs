//! libclang が返す文字列 (`CXString`) のラッパー。
use crate::bindings;
use std::ffi::CStr;
use std::fmt;

/// libclang の `CXString` を所有し、ドロップ時に `clang_disposeString` を呼ぶラッパー
pub struct ClangString {
    raw: bindings::CXString,
}

impl ClangString {
    /// # Safety
    /// `raw` は libclang 関数の戻り値で、まだ解放されていないものでなければなりません。
    pub unsafe fn from_raw(raw: bindings::CXString) -> Self {
        Self { raw }
    }

    /// 文字列本体。libclang が null を返した場合は `None`
    pub fn as_c_str(&self) -> Option<&CStr> {
        unsafe {
            let ptr = bindings::clang_getCString(self.raw);
            if ptr.is_null() {
                None
            } else {
                Some(CStr::from_ptr(ptr))
            }
        }
    }

    pub fn into_string(self) -> String {
        self.as_c_str()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl Drop for ClangString {
    fn drop(&mut self) {
        unsafe {
            bindings::clang_disposeString(self.raw);
        }
    }
}

impl fmt::Display for ClangString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_c_str() {
            Some(s) => f.write_str(&s.to_string_lossy()),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for ClangString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClangString({:?})", self.to_string())
    }
}

/// `CXString` を返す呼び出しの結果を `String` に変換して即座に解放する
pub(crate) fn take(raw: bindings::CXString) -> String {
    unsafe { ClangString::from_raw(raw) }.into_string()
}
