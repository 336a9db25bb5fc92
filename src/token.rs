//! このモジュールは、`clang_tokenize` が確保するトークン配列のラッパーを提供します。
//!
//! トークンは一括で確保され、一括で解放 (`clang_disposeTokens`) する必要があります。
//! `Tokens` は配列全体を所有し、個々の `Token` は `Tokens` を借用します。
use crate::bindings;
use crate::cursor::Cursor;
use crate::error::ViewError;
use crate::source::{SourceLocation, SourceRange};
use crate::string;
use crate::translation_unit::TranslationUnit;
use crate::view::BoundedView;
use std::ffi::c_uint;
use std::fmt;

/// トークンの種類 (`CXTokenKind`)。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Punctuation,
    Keyword,
    Identifier,
    Literal,
    Comment,
    Unknown(u32),
}

impl TokenKind {
    pub fn from_raw(raw: bindings::CXTokenKind) -> Self {
        match raw {
            bindings::CXToken_Punctuation => Self::Punctuation,
            bindings::CXToken_Keyword => Self::Keyword,
            bindings::CXToken_Identifier => Self::Identifier,
            bindings::CXToken_Literal => Self::Literal,
            bindings::CXToken_Comment => Self::Comment,
            other => Self::Unknown(other as u32),
        }
    }
}

/// `clang_tokenize` が返したトークン配列。
pub struct Tokens<'tu> {
    tu: &'tu TranslationUnit<'tu>,
    // 同じ呼び出しの (ポインタ, 個数) から一度だけ作られる
    tokens: BoundedView<'tu, bindings::CXToken>,
    // 確保時の個数。解放時にそのまま渡す
    n: c_uint,
}

impl<'tu> Tokens<'tu> {
    /// # Safety
    /// `tokens` と `count` は `tu` に対する一回の `clang_tokenize` の出力でなければなりません。
    pub(crate) unsafe fn from_raw(
        tu: &'tu TranslationUnit<'tu>,
        tokens: *mut bindings::CXToken,
        count: c_uint,
    ) -> Self {
        Self {
            tu,
            tokens: unsafe { BoundedView::from_raw_parts(tokens, count as usize) },
            n: count,
        }
    }

    /// ネイティブが報告したトークン数。
    pub fn n(&self) -> u32 {
        self.n
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// 生の `CXToken` 配列へのビュー。
    pub fn view(&self) -> BoundedView<'_, bindings::CXToken> {
        self.tokens
    }

    /// `index` のトークン。`[0, n)` の外は `ViewError::OutOfRange` です。
    pub fn at(&self, index: i64) -> Result<Token<'_>, ViewError> {
        let raw = self.view().at(index)?;
        Ok(Token { tu: self.tu, raw })
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = Token<'_>> + '_ {
        let tu = self.tu;
        self.view().iter().map(move |raw| Token { tu, raw })
    }
}

impl Drop for Tokens<'_> {
    fn drop(&mut self) {
        // トークンが 0 個の場合は何も確保されていない
        if self.tokens.is_empty() {
            return;
        }
        tracing::trace!(count = self.n, "disposing tokens");
        unsafe {
            bindings::clang_disposeTokens(
                self.tu.raw(),
                self.tokens.as_ptr() as *mut bindings::CXToken,
                self.n,
            );
        }
    }
}

impl fmt::Debug for Tokens<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// プリプロセッサのトークン一つ。
#[derive(Clone, Copy)]
pub struct Token<'a> {
    tu: &'a TranslationUnit<'a>,
    raw: &'a bindings::CXToken,
}

impl<'a> Token<'a> {
    pub fn raw(&self) -> &'a bindings::CXToken {
        self.raw
    }

    pub fn kind(&self) -> TokenKind {
        TokenKind::from_raw(unsafe { bindings::clang_getTokenKind(*self.raw) })
    }

    /// ソース上の文字列表現。
    pub fn spelling(&self) -> String {
        string::take(unsafe { bindings::clang_getTokenSpelling(self.tu.raw(), *self.raw) })
    }

    pub fn location(&self) -> SourceLocation<'a> {
        SourceLocation::from_raw(unsafe {
            bindings::clang_getTokenLocation(self.tu.raw(), *self.raw)
        })
    }

    pub fn extent(&self) -> SourceRange<'a> {
        SourceRange::from_raw(unsafe {
            bindings::clang_getTokenExtent(self.tu.raw(), *self.raw)
        })
    }

    /// このトークンに対応するカーソル (`clang_annotateTokens`)。
    pub fn cursor(&self) -> Cursor<'a> {
        let mut token = *self.raw;
        let mut cursor = unsafe { bindings::clang_getNullCursor() };
        unsafe {
            bindings::clang_annotateTokens(self.tu.raw(), &mut token, 1, &mut cursor);
        }
        Cursor::from_raw(self.tu, cursor)
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("kind", &self.kind())
            .field("spelling", &self.spelling())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_kinds_map_from_raw_values() {
        assert_eq!(TokenKind::from_raw(bindings::CXToken_Punctuation), TokenKind::Punctuation);
        assert_eq!(TokenKind::from_raw(bindings::CXToken_Keyword), TokenKind::Keyword);
        assert_eq!(TokenKind::from_raw(bindings::CXToken_Identifier), TokenKind::Identifier);
        assert_eq!(TokenKind::from_raw(bindings::CXToken_Literal), TokenKind::Literal);
        assert_eq!(TokenKind::from_raw(bindings::CXToken_Comment), TokenKind::Comment);
        assert_eq!(TokenKind::from_raw(42), TokenKind::Unknown(42));
    }
}
