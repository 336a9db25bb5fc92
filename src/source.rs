//! ソース上の位置 (`CXSourceLocation`)、範囲 (`CXSourceRange`)、ファイル (`CXFile`) のラッパー。
//!
//! いずれも翻訳単位の内部データを参照するため、ライフタイム `'tu` で翻訳単位に束縛されます。
use crate::adapter;
use crate::bindings;
use crate::handle::Handle;
use crate::string;
use std::ffi::c_void;
use std::fmt;
use std::marker::PhantomData;

native_kind!(
    /// `CXFile`。ファイルは翻訳単位が所有するため、常に借用として扱う
    pub FileKind("CXFile"): c_void
);

/// 翻訳単位に含まれるソースファイル。
pub struct File<'tu> {
    handle: Handle<FileKind>,
    _tu: PhantomData<&'tu ()>,
}

impl<'tu> File<'tu> {
    pub(crate) fn from_raw(raw: bindings::CXFile) -> Option<Self> {
        let handle = unsafe { Handle::borrowed(raw) }?;
        Some(Self {
            handle,
            _tu: PhantomData,
        })
    }

    pub(crate) fn raw(&self) -> bindings::CXFile {
        self.handle.as_ptr()
    }

    pub fn handle(&self) -> &Handle<FileKind> {
        &self.handle
    }

    /// ファイルの完全なパス名。
    pub fn name(&self) -> String {
        string::take(unsafe { bindings::clang_getFileName(self.raw()) })
    }

    /// 最終更新時刻 (UNIX 時刻)。
    pub fn time(&self) -> i64 {
        unsafe { bindings::clang_getFileTime(self.raw()) as i64 }
    }
}

impl PartialEq for File<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.raw() == other.raw()
    }
}

impl fmt::Debug for File<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<File: {}>", self.name())
    }
}

impl fmt::Display for File<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// ソースファイル内の位置。
#[derive(Clone, Copy)]
pub struct SourceLocation<'tu> {
    raw: bindings::CXSourceLocation,
    _tu: PhantomData<&'tu ()>,
}

impl<'tu> SourceLocation<'tu> {
    pub(crate) fn from_raw(raw: bindings::CXSourceLocation) -> Self {
        Self {
            raw,
            _tu: PhantomData,
        }
    }

    pub fn raw(&self) -> bindings::CXSourceLocation {
        self.raw
    }

    /// どの翻訳単位にも属さない null 位置。
    pub fn null() -> Self {
        Self::from_raw(unsafe { bindings::clang_getNullLocation() })
    }

    /// (ファイル, 行, 列, オフセット) を一度のネイティブ呼び出しで取得します。
    pub fn instantiation(&self) -> (Option<File<'tu>>, u32, u32, u32) {
        adapter::instantiation_location(self)
    }

    pub fn file(&self) -> Option<File<'tu>> {
        self.instantiation().0
    }

    pub fn line(&self) -> u32 {
        self.instantiation().1
    }

    pub fn column(&self) -> u32 {
        self.instantiation().2
    }

    pub fn offset(&self) -> u32 {
        self.instantiation().3
    }

    /// システムヘッダー内の位置かどうか。
    pub fn is_in_system_header(&self) -> bool {
        unsafe { bindings::clang_Location_isInSystemHeader(self.raw) != 0 }
    }
}

impl PartialEq for SourceLocation<'_> {
    fn eq(&self, other: &Self) -> bool {
        unsafe { bindings::clang_equalLocations(self.raw, other.raw) != 0 }
    }
}

impl fmt::Debug for SourceLocation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (file, line, column, _) = self.instantiation();
        write!(
            f,
            "<SourceLocation file {:?}, line {}, column {}>",
            file.map(|f| f.name()),
            line,
            column
        )
    }
}

/// ソース上の範囲。
#[derive(Clone, Copy)]
pub struct SourceRange<'tu> {
    raw: bindings::CXSourceRange,
    _tu: PhantomData<&'tu ()>,
}

impl<'tu> SourceRange<'tu> {
    pub(crate) fn from_raw(raw: bindings::CXSourceRange) -> Self {
        Self {
            raw,
            _tu: PhantomData,
        }
    }

    pub fn new(start: SourceLocation<'tu>, end: SourceLocation<'tu>) -> Self {
        Self::from_raw(unsafe { bindings::clang_getRange(start.raw, end.raw) })
    }

    pub fn raw(&self) -> bindings::CXSourceRange {
        self.raw
    }

    /// 範囲の最初の文字の位置。
    pub fn start(&self) -> SourceLocation<'tu> {
        SourceLocation::from_raw(unsafe { bindings::clang_getRangeStart(self.raw) })
    }

    /// 範囲の最後の文字の位置。
    pub fn end(&self) -> SourceLocation<'tu> {
        SourceLocation::from_raw(unsafe { bindings::clang_getRangeEnd(self.raw) })
    }

    pub fn is_null(&self) -> bool {
        unsafe { bindings::clang_Range_isNull(self.raw) != 0 }
    }

    /// `location` がこの範囲内にあるかどうか。
    ///
    /// ファイル名が一致し、開始行と終了行の間 (境界の行では列も比較) にある場合に `true` です。
    pub fn contains(&self, location: &SourceLocation<'_>) -> bool {
        let (start_file, start_line, start_column, _) = self.start().instantiation();
        let (end_file, end_line, end_column, _) = self.end().instantiation();
        let (file, line, column, _) = location.instantiation();

        let file = file.map(|f| f.name());
        if file != start_file.map(|f| f.name()) || file != end_file.map(|f| f.name()) {
            return false;
        }
        if line < start_line || line > end_line {
            return false;
        }
        if line == start_line && column < start_column {
            return false;
        }
        if line == end_line && column > end_column {
            return false;
        }
        true
    }
}

impl PartialEq for SourceRange<'_> {
    fn eq(&self, other: &Self) -> bool {
        unsafe { bindings::clang_equalRanges(self.raw, other.raw) != 0 }
    }
}

impl fmt::Debug for SourceRange<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<SourceRange start {:?}, end {:?}>", self.start(), self.end())
    }
}
