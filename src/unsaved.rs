//! このモジュールは、libclang の `CXUnsavedFile` をRustで扱うための構造体を提供します。
//!
//! `CXUnsavedFile` はディスク上のファイルの代わりにメモリ上の内容を libclang に渡すための構造体で、
//! ファイル名と内容を生ポインタで参照します。`UnsavedFile` はその参照先となる
//! `StringHolder` を自身で所有するため、構造体より先にバッファが解放されることはありません。
use crate::bindings::{self, CXUnsavedFile};
use crate::error::{ClangResult, Error};
use crate::holder::StringHolder;
use std::ffi::{CStr, c_ulong};
use std::fmt;

/// 保存されていないファイル (ファイル名と、ディスクの代わりに使う内容)。
pub struct UnsavedFile {
    raw: CXUnsavedFile,
    file_name: StringHolder,
    contents: StringHolder,
}

impl UnsavedFile {
    pub fn new(file_name: &str, contents: impl AsRef<[u8]>) -> ClangResult<Self> {
        let mut file = Self {
            raw: CXUnsavedFile::default(),
            file_name: StringHolder::new(),
            contents: StringHolder::new(),
        };
        file.set_file_name(StringHolder::from(file_name))?;
        file.set_contents(StringHolder::with_text(contents));
        Ok(file)
    }

    /// `Filename` フィールドを `holder` のバッファに向けます。
    pub fn set_file_name(&mut self, holder: StringHolder) -> ClangResult<()> {
        if holder.has_interior_nul() {
            return Err(Error::InteriorNul(
                String::from_utf8_lossy(holder.as_bytes()).into_owned(),
            ));
        }
        self.file_name = holder;
        self.raw.Filename = self.file_name.as_ptr();
        Ok(())
    }

    /// `Contents` と `Length` フィールドを `holder` のバッファに向けます。
    pub fn set_contents(&mut self, holder: StringHolder) {
        self.contents = holder;
        self.raw.Contents = self.contents.as_ptr();
        self.raw.Length = self.contents.len() as c_ulong;
    }

    /// `Filename` フィールドから読み戻したファイル名。
    pub fn file_name(&self) -> &str {
        if self.raw.Filename.is_null() {
            return "";
        }
        unsafe { CStr::from_ptr(self.raw.Filename) }
            .to_str()
            .unwrap_or("")
    }

    /// `Contents` と `Length` フィールドから読み戻した内容。
    pub fn contents(&self) -> &[u8] {
        if self.raw.Contents.is_null() {
            return &[];
        }
        unsafe {
            std::slice::from_raw_parts(self.raw.Contents as *const u8, self.raw.Length as usize)
        }
    }

    /// ネイティブ構造体のコピー。ポインタは `self` が生存している間だけ有効です。
    pub fn as_raw(&self) -> CXUnsavedFile {
        self.raw
    }
}

impl fmt::Debug for UnsavedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnsavedFile")
            .field("file_name", &self.file_name())
            .field("length", &self.raw.Length)
            .finish()
    }
}

/// 呼び出しに渡す `CXUnsavedFile` 配列を組み立てます。
pub(crate) fn raw_unsaved_files(files: &[UnsavedFile]) -> Vec<bindings::CXUnsavedFile> {
    files.iter().map(UnsavedFile::as_raw).collect()
}

/// 配列を libclang の `struct CXUnsavedFile *` 引数に変換します。空の場合は null です。
pub(crate) fn unsaved_ptr(raw: &mut [bindings::CXUnsavedFile]) -> *mut bindings::CXUnsavedFile {
    if raw.is_empty() {
        std::ptr::null_mut()
    } else {
        raw.as_mut_ptr()
    }
}
