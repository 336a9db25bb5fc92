//! libclang のトップレベルオブジェクト `CXIndex` のラッパー。
//!
//! `Index` は翻訳単位の読み込み・解析を行うための入口で、作成した翻訳単位より長く生存する必要があります。
//! これは `TranslationUnit<'i>` のライフタイムで保証されます。
use crate::adapter;
use crate::bindings;
use crate::error::{ClangResult, Error};
use crate::handle::Handle;
use crate::marshal;
use crate::options::{IndexOptions, ParseOptions};
use crate::translation_unit::TranslationUnit;
use crate::unsaved::UnsavedFile;
use std::ffi::{c_int, c_void};
use std::path::Path;

native_kind!(
    /// `CXIndex`
    pub IndexKind("CXIndex"): c_void => clang_disposeIndex
);

/// 翻訳単位の集合を管理するインデックス。
#[derive(Debug)]
pub struct Index {
    handle: Handle<IndexKind>,
}

impl Index {
    /// 既定の設定でインデックスを作成します。
    pub fn new() -> ClangResult<Self> {
        Self::with_options(IndexOptions::default())
    }

    pub fn with_options(options: IndexOptions) -> ClangResult<Self> {
        let raw = unsafe {
            bindings::clang_createIndex(
                options.exclude_declarations_from_pch as c_int,
                options.display_diagnostics as c_int,
            )
        };
        let handle = unsafe { Handle::owned(raw) }.ok_or(Error::IndexCreation)?;
        Ok(Self { handle })
    }

    pub(crate) fn raw(&self) -> bindings::CXIndex {
        self.handle.as_ptr()
    }

    pub fn handle(&self) -> &Handle<IndexKind> {
        &self.handle
    }

    /// ソースファイルを解析して翻訳単位を作成します。
    ///
    /// `options` が `None` の場合は `ParseOptions::default_editing()` を使用します。
    /// 解析エラーがあっても翻訳単位は返されるため、診断情報の確認は呼び出し元の責任です。
    pub fn parse<S: AsRef<str>>(
        &self,
        path: impl AsRef<Path>,
        args: &[S],
        unsaved_files: &[UnsavedFile],
        options: Option<ParseOptions>,
    ) -> ClangResult<TranslationUnit<'_>> {
        let path = path.as_ref();
        let options = options.unwrap_or_else(ParseOptions::default_editing);
        adapter::parse_translation_unit(self, Some(path), args, unsaved_files, options)?
            .ok_or_else(|| Error::TranslationUnitLoad(path.display().to_string()))
    }

    /// `-emit-ast` や `TranslationUnit::save` で保存された AST ファイルを読み込みます。
    pub fn read(&self, ast_path: impl AsRef<Path>) -> ClangResult<TranslationUnit<'_>> {
        let ast_path = ast_path.as_ref();
        let c_path = marshal::c_path(ast_path)?;
        let raw = unsafe { bindings::clang_createTranslationUnit(self.raw(), c_path.as_ptr()) };
        unsafe { TranslationUnit::from_raw(raw) }.ok_or_else(|| {
            tracing::debug!(
                path = %ast_path.display(),
                "clang_createTranslationUnit returned null"
            );
            Error::TranslationUnitLoad(ast_path.display().to_string())
        })
    }
}
