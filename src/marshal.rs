//! ネイティブ呼び出しの引数変換。
//!
//! ここで作られる値はすべて、一回の呼び出しの間だけ有効なポインタを提供します。
use crate::error::{ClangResult, Error};
use std::ffi::{CString, c_char};
use std::path::Path;

/// 文字列の列を `const char *const *` として渡すための配列
pub(crate) struct CStringArray {
    // ptrs が指す先を保持する
    _owned: Vec<CString>,
    ptrs: Vec<*const c_char>,
}

impl CStringArray {
    pub(crate) fn new<I, S>(items: I) -> ClangResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let owned = items
            .into_iter()
            .map(|s| c_string(s.as_ref()))
            .collect::<ClangResult<Vec<_>>>()?;
        let ptrs = owned.iter().map(|s| s.as_ptr()).collect();
        Ok(Self {
            _owned: owned,
            ptrs,
        })
    }

    /// 空の場合は null を返す (libclang は要素数 0 のとき配列を参照しない)
    pub(crate) fn as_ptr(&self) -> *const *const c_char {
        if self.ptrs.is_empty() {
            std::ptr::null()
        } else {
            self.ptrs.as_ptr()
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.ptrs.len()
    }
}

pub(crate) fn c_string(s: &str) -> ClangResult<CString> {
    CString::new(s).map_err(|_| Error::InteriorNul(s.to_string()))
}

#[cfg(unix)]
pub(crate) fn c_path(path: &Path) -> ClangResult<CString> {
    use std::os::unix::ffi::OsStrExt;
    CString::new(path.as_os_str().as_bytes()).map_err(|_| Error::InvalidPath(path.to_path_buf()))
}

#[cfg(not(unix))]
pub(crate) fn c_path(path: &Path) -> ClangResult<CString> {
    let s = path
        .to_str()
        .ok_or_else(|| Error::InvalidPath(path.to_path_buf()))?;
    CString::new(s).map_err(|_| Error::InvalidPath(path.to_path_buf()))
}
