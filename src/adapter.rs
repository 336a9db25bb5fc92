//! このモジュールは、C の呼び出し規約をそのまま Rust に持ち込めないエントリポイントの変換を提供します。
//!
//! 各関数は次の三段階だけを行います。
//! 1. Rust の引数をネイティブの引数に変換する (文字列列をポインタ配列に展開するなど)
//! 2. ネイティブ関数を一度だけ呼び出す
//! 3. 出力引数・配列・エラーコードを Rust の値 (タプル、ビュー、`Option`) に変換する
//!
//! ネイティブの失敗 (null やエラーコード) は変換せずにそのまま呼び出し元へ返します。
use crate::bindings;
use crate::compilation_db::CompilationDatabase;
use crate::error::{ClangResult, CompilationDatabaseErrorCode};
use crate::index::Index;
use crate::marshal::{self, CStringArray};
use crate::options::ParseOptions;
use crate::source::{File, SourceLocation, SourceRange};
use crate::token::Tokens;
use crate::translation_unit::TranslationUnit;
use crate::unsaved::{self, UnsavedFile};
use std::ffi::{c_int, c_uint};
use std::path::Path;
use std::ptr;

/// `clang_getInstantiationLocation` の出力引数を (ファイル, 行, 列, オフセット) として返します。
///
/// ファイルは翻訳単位が所有するため借用ハンドルです。null 位置ではファイルは `None` になります。
pub fn instantiation_location<'tu>(
    location: &SourceLocation<'tu>,
) -> (Option<File<'tu>>, u32, u32, u32) {
    let mut file: bindings::CXFile = ptr::null_mut();
    let mut line: c_uint = 0;
    let mut column: c_uint = 0;
    let mut offset: c_uint = 0;
    unsafe {
        bindings::clang_getInstantiationLocation(
            location.raw(),
            &mut file,
            &mut line,
            &mut column,
            &mut offset,
        );
    }
    (File::from_raw(file), line, column, offset)
}

/// `range` 内のトークンを取得します。
///
/// 返される `Tokens` はネイティブが確保した配列をコピーせずに保持し、`tu` を借用します。
pub fn tokenize<'tu>(tu: &'tu TranslationUnit<'_>, range: SourceRange<'tu>) -> Tokens<'tu> {
    let mut tokens: *mut bindings::CXToken = ptr::null_mut();
    let mut count: c_uint = 0;
    unsafe {
        bindings::clang_tokenize(tu.raw(), range.raw(), &mut tokens, &mut count);
        Tokens::from_raw(tu, tokens, count)
    }
}

/// `clang_parseTranslationUnit` を呼び出します。
///
/// `args` はこの呼び出しの間だけ有効なポインタ配列に展開されます。
/// ネイティブが null を返した場合は `Ok(None)` です。`Err` になるのは引数の変換に失敗した場合だけです。
pub fn parse_translation_unit<'i, S: AsRef<str>>(
    index: &'i Index,
    file_name: Option<&Path>,
    args: &[S],
    unsaved_files: &[UnsavedFile],
    options: ParseOptions,
) -> ClangResult<Option<TranslationUnit<'i>>> {
    let c_name = file_name.map(marshal::c_path).transpose()?;
    let c_args = CStringArray::new(args)?;
    let mut raw_unsaved = unsaved::raw_unsaved_files(unsaved_files);

    let raw = unsafe {
        bindings::clang_parseTranslationUnit(
            index.raw(),
            c_name.as_ref().map_or(ptr::null(), |s| s.as_ptr()),
            c_args.as_ptr(),
            c_args.len() as c_int,
            unsaved::unsaved_ptr(&mut raw_unsaved),
            raw_unsaved.len() as c_uint,
            options.bits(),
        )
    };
    let tu = unsafe { TranslationUnit::from_raw(raw) };
    if tu.is_none() {
        tracing::debug!(file = ?file_name, "clang_parseTranslationUnit returned null");
    }
    Ok(tu)
}

/// `clang_CompilationDatabase_fromDirectory` のポインタとエラーコードを組で返します。
///
/// エラーコードが `NoError` の場合にだけ所有ハンドルとして包みます。
/// エラーと同時に非 null が返された場合はその場で解放し、`None` を返します。
pub fn compilation_database_from_directory(
    build_dir: &Path,
) -> ClangResult<(Option<CompilationDatabase>, CompilationDatabaseErrorCode)> {
    let c_dir = marshal::c_path(build_dir)?;
    let mut raw_code: bindings::CXCompilationDatabase_Error =
        bindings::CXCompilationDatabase_NoError;
    let raw =
        unsafe { bindings::clang_CompilationDatabase_fromDirectory(c_dir.as_ptr(), &mut raw_code) };
    let code = CompilationDatabaseErrorCode::from_raw(raw_code);
    let db = unsafe { CompilationDatabase::from_raw(raw) };

    if code.is_success() {
        return Ok((db, code));
    }
    tracing::debug!(dir = %build_dir.display(), ?code, "failed to load compilation database");
    // db はここでドロップされ、非 null であれば解放される
    drop(db);
    Ok((None, code))
}
