//! このモジュールは、解析済みのソースファイルを表す `TranslationUnit` を提供します。
//!
//! libclang のほとんどの操作は翻訳単位から始まります。位置・範囲・トークン・カーソル・
//! 診断情報はすべて翻訳単位の内部データを参照するため、`&self` のライフタイムに束縛されます。
use crate::adapter;
use crate::bindings;
use crate::completion::CodeCompleteResults;
use crate::cursor::Cursor;
use crate::diagnostic::Diagnostic;
use crate::error::{ClangResult, Error, SaveError};
use crate::handle::Handle;
use crate::index::Index;
use crate::marshal;
use crate::options::CompleteOptions;
use crate::source::{File, SourceLocation, SourceRange};
use crate::string;
use crate::token::Tokens;
use crate::unsaved::{self, UnsavedFile};
use std::ffi::{c_uint, c_void};
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

native_kind!(
    /// `CXTranslationUnit`
    pub TranslationUnitKind("CXTranslationUnit"): bindings::CXTranslationUnitImpl
        => clang_disposeTranslationUnit
);

/// 解析済みの翻訳単位。作成元の `Index` より長く生存することはできません。
pub struct TranslationUnit<'i> {
    handle: Handle<TranslationUnitKind>,
    _index: PhantomData<&'i Index>,
}

impl<'i> TranslationUnit<'i> {
    /// # Safety
    /// `raw` は `'i` のインデックスから作成された、未解放の翻訳単位でなければなりません。
    pub(crate) unsafe fn from_raw(raw: bindings::CXTranslationUnit) -> Option<Self> {
        let handle = unsafe { Handle::owned(raw) }?;
        Some(Self {
            handle,
            _index: PhantomData,
        })
    }

    pub(crate) fn raw(&self) -> bindings::CXTranslationUnit {
        self.handle.as_ptr()
    }

    pub fn handle(&self) -> &Handle<TranslationUnitKind> {
        &self.handle
    }

    /// 元のソースファイル名。
    pub fn spelling(&self) -> String {
        string::take(unsafe { bindings::clang_getTranslationUnitSpelling(self.raw()) })
    }

    /// 翻訳単位全体を表すカーソル。
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::from_raw(self, unsafe {
            bindings::clang_getTranslationUnitCursor(self.raw())
        })
    }

    /// 翻訳単位に含まれるファイルを名前で取得します。含まれない場合は `None` です。
    pub fn file(&self, name: impl AsRef<Path>) -> ClangResult<Option<File<'_>>> {
        let c_name = marshal::c_path(name.as_ref())?;
        Ok(File::from_raw(unsafe {
            bindings::clang_getFile(self.raw(), c_name.as_ptr())
        }))
    }

    /// 行・列 (いずれも 1 始まり) で位置を取得します。
    pub fn location(&self, file: &File<'_>, line: u32, column: u32) -> SourceLocation<'_> {
        SourceLocation::from_raw(unsafe {
            bindings::clang_getLocation(self.raw(), file.raw(), line, column)
        })
    }

    /// ファイル先頭からのバイトオフセットで位置を取得します。
    pub fn location_for_offset(&self, file: &File<'_>, offset: u32) -> SourceLocation<'_> {
        SourceLocation::from_raw(unsafe {
            bindings::clang_getLocationForOffset(self.raw(), file.raw(), offset)
        })
    }

    /// 二つのオフセットで範囲を作成します。
    pub fn extent(&self, file: &File<'_>, start: u32, end: u32) -> SourceRange<'_> {
        SourceRange::new(
            self.location_for_offset(file, start),
            self.location_for_offset(file, end),
        )
    }

    pub fn num_diagnostics(&self) -> u32 {
        unsafe { bindings::clang_getNumDiagnostics(self.raw()) }
    }

    pub fn diagnostic(&self, index: u32) -> Option<Diagnostic<'_>> {
        if index >= self.num_diagnostics() {
            return None;
        }
        unsafe { Diagnostic::from_raw(bindings::clang_getDiagnostic(self.raw(), index)) }
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic<'_>> {
        (0..self.num_diagnostics())
            .filter_map(|i| self.diagnostic(i))
            .collect()
    }

    /// `range` 内のトークンを取得します。
    pub fn tokenize<'tu>(&'tu self, range: SourceRange<'tu>) -> Tokens<'tu> {
        adapter::tokenize(self, range)
    }

    /// `#include` の一覧。入力ファイル自身 (深さ 0) は含みません。
    ///
    /// プリコンパイル済みヘッダー経由のインクルードは辿りません。
    pub fn includes(&self) -> Vec<FileInclusion<'_>> {
        let mut includes: Vec<FileInclusion<'_>> = Vec::new();
        unsafe {
            bindings::clang_getInclusions(
                self.raw(),
                Some(inclusion_visitor),
                &mut includes as *mut Vec<FileInclusion<'_>> as *mut c_void,
            );
        }
        includes
    }

    /// 翻訳単位を再解析し、更新された翻訳単位を返します。
    ///
    /// 失敗した翻訳単位には解放以外の操作ができないため、その場で解放します。
    pub fn reparse(mut self, unsaved_files: &[UnsavedFile]) -> ClangResult<Self> {
        let mut raw_unsaved = unsaved::raw_unsaved_files(unsaved_files);
        let code = unsafe {
            let options = bindings::clang_defaultReparseOptions(self.raw());
            bindings::clang_reparseTranslationUnit(
                self.raw(),
                raw_unsaved.len() as c_uint,
                unsaved::unsaved_ptr(&mut raw_unsaved),
                options,
            )
        };
        if code != 0 {
            tracing::debug!(code, "clang_reparseTranslationUnit failed");
            self.handle.close();
            return Err(Error::Reparse(code));
        }
        Ok(self)
    }

    /// AST ファイルとして保存します (`-emit-ast` と同等)。
    pub fn save(&self, path: impl AsRef<Path>) -> ClangResult<()> {
        let c_path = marshal::c_path(path.as_ref())?;
        let code = unsafe {
            let options = bindings::clang_defaultSaveOptions(self.raw());
            bindings::clang_saveTranslationUnit(self.raw(), c_path.as_ptr(), options)
        };
        match SaveError::from_code(code) {
            None => Ok(()),
            Some(err) => {
                tracing::debug!(code, "clang_saveTranslationUnit failed");
                Err(err.into())
            }
        }
    }

    /// `path` の `line`:`column` でコード補完を行います。
    ///
    /// 補完に失敗した場合は `Ok(None)` です。
    pub fn code_complete(
        &self,
        path: impl AsRef<Path>,
        line: u32,
        column: u32,
        unsaved_files: &[UnsavedFile],
        options: CompleteOptions,
    ) -> ClangResult<Option<CodeCompleteResults<'_>>> {
        let c_path = marshal::c_path(path.as_ref())?;
        let mut raw_unsaved = unsaved::raw_unsaved_files(unsaved_files);
        let raw = unsafe {
            bindings::clang_codeCompleteAt(
                self.raw(),
                c_path.as_ptr(),
                line,
                column,
                unsaved::unsaved_ptr(&mut raw_unsaved),
                raw_unsaved.len() as c_uint,
                options.bits(),
            )
        };
        Ok(unsafe { CodeCompleteResults::from_raw(raw) })
    }
}

impl fmt::Debug for TranslationUnit<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationUnit")
            .field("spelling", &self.spelling())
            .field("handle", &self.handle)
            .finish()
    }
}

/// `#include` によるファイルの取り込み。
#[derive(Debug)]
pub struct FileInclusion<'tu> {
    /// インクルードしている側のファイル
    pub source: File<'tu>,
    /// インクルードされたファイル
    pub include: File<'tu>,
    /// `#include` ディレクティブの位置
    pub location: SourceLocation<'tu>,
    /// インクルードの深さ。入力ファイルから直接なら 1
    pub depth: u32,
}

unsafe extern "C" fn inclusion_visitor(
    included_file: bindings::CXFile,
    inclusion_stack: *mut bindings::CXSourceLocation,
    include_len: c_uint,
    client_data: bindings::CXClientData,
) {
    // 深さ 0 は入力ファイル自身
    if include_len == 0 || inclusion_stack.is_null() {
        return;
    }
    let includes = unsafe { &mut *(client_data as *mut Vec<FileInclusion<'_>>) };
    let Some(include) = File::from_raw(included_file) else {
        return;
    };
    let location = SourceLocation::from_raw(unsafe { *inclusion_stack });
    let Some(source) = location.file() else {
        return;
    };
    includes.push(FileInclusion {
        source,
        include,
        location,
        depth: include_len,
    });
}
