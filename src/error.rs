//! このモジュールは、クレート全体で使用するエラー型を定義します。
//!
//! libclang が返すエラーコードは変換・握りつぶしをせず、そのままエラー値に保持します。
use crate::bindings;
use std::path::PathBuf;
use thiserror::Error;

/// `Handle` の操作が所有権規則に反した場合のエラー。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HandleError {
    #[error("{kind} handle has already been released")]
    Released { kind: &'static str },
    #[error("{kind} handle is borrowed and cannot be released")]
    NotOwned { kind: &'static str },
}

/// `BoundedView` の範囲外アクセス。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    #[error("index {index} out of range for view of length {len}")]
    OutOfRange { index: i64, len: usize },
}

/// `clang_saveTranslationUnit` が返すエラー (`CXSaveError`)。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SaveError {
    /// I/O の失敗など原因不明のエラー
    #[error("unknown error while saving translation unit")]
    Unknown,
    /// 翻訳エラーのため保存できなかった。詳細は診断情報を参照
    #[error("translation errors prevented saving")]
    TranslationErrors,
    /// 翻訳単位が無効だった
    #[error("translation unit was invalid")]
    InvalidTranslationUnit,
    #[error("undefined save error code {0}")]
    Undefined(i32),
}

impl SaveError {
    /// ネイティブの戻り値を変換します。`CXSaveError_None` の場合は `None` です。
    pub fn from_code(code: i32) -> Option<Self> {
        match code as bindings::CXSaveError {
            bindings::CXSaveError_None => None,
            bindings::CXSaveError_Unknown => Some(Self::Unknown),
            bindings::CXSaveError_TranslationErrors => Some(Self::TranslationErrors),
            bindings::CXSaveError_InvalidTU => Some(Self::InvalidTranslationUnit),
            _ => Some(Self::Undefined(code)),
        }
    }
}

/// `clang_CompilationDatabase_fromDirectory` が書き込むエラーコード。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilationDatabaseErrorCode {
    NoError,
    CanNotLoadDatabase,
    Unknown(u32),
}

impl CompilationDatabaseErrorCode {
    pub fn from_raw(code: bindings::CXCompilationDatabase_Error) -> Self {
        match code {
            bindings::CXCompilationDatabase_NoError => Self::NoError,
            bindings::CXCompilationDatabase_CanNotLoadDatabase => Self::CanNotLoadDatabase,
            other => Self::Unknown(other as u32),
        }
    }

    pub fn is_success(self) -> bool {
        self == Self::NoError
    }
}

/// コンパイルデータベースの読み込み失敗。
#[derive(Debug, Error, PartialEq, Eq)]
#[error("compilation database loading failed in {dir}: {code:?}")]
pub struct CompilationDatabaseError {
    pub dir: PathBuf,
    pub code: CompilationDatabaseErrorCode,
}

/// クレート全体のエラー型。
#[derive(Debug, Error)]
pub enum Error {
    #[error("string contains an interior NUL byte: {0:?}")]
    InteriorNul(String),
    #[error("path cannot be passed to libclang: {0}")]
    InvalidPath(PathBuf),
    #[error("failed to create index")]
    IndexCreation,
    #[error("error parsing translation unit {0}")]
    TranslationUnitLoad(String),
    #[error("failed to reparse translation unit (code {0})")]
    Reparse(i32),
    #[error(transparent)]
    Save(#[from] SaveError),
    #[error(transparent)]
    CompilationDatabase(#[from] CompilationDatabaseError),
    #[error(transparent)]
    Handle(#[from] HandleError),
    #[error(transparent)]
    View(#[from] ViewError),
}

/// libclang 操作の結果を示す型エイリアス。
pub type ClangResult<T> = Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_error_codes_map_verbatim() {
        assert_eq!(SaveError::from_code(0), None);
        assert_eq!(SaveError::from_code(1), Some(SaveError::Unknown));
        assert_eq!(SaveError::from_code(2), Some(SaveError::TranslationErrors));
        assert_eq!(SaveError::from_code(3), Some(SaveError::InvalidTranslationUnit));
        assert_eq!(SaveError::from_code(9), Some(SaveError::Undefined(9)));
    }

    #[test]
    fn compilation_database_codes() {
        let ok = CompilationDatabaseErrorCode::from_raw(bindings::CXCompilationDatabase_NoError);
        assert!(ok.is_success());
        let failed = CompilationDatabaseErrorCode::from_raw(
            bindings::CXCompilationDatabase_CanNotLoadDatabase,
        );
        assert_eq!(failed, CompilationDatabaseErrorCode::CanNotLoadDatabase);
        assert!(!failed.is_success());
    }
}
