//! libclang の呼び出しに渡すオプションのビットマスク。
use crate::bindings;
use std::ops::{BitOr, BitOrAssign};

macro_rules! option_bits {
    ($(#[$meta:meta])* $name:ident { $($(#[$cmeta:meta])* $konst:ident = $value:expr;)* }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name(u32);

        impl $name {
            $(
                $(#[$cmeta])*
                pub const $konst: Self = Self($value as u32);
            )*

            pub const fn from_bits(bits: u32) -> Self {
                Self(bits)
            }

            pub const fn bits(self) -> u32 {
                self.0
            }

            pub const fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }
        }

        impl BitOr for $name {
            type Output = Self;
            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }
    };
}

option_bits! {
    /// `clang_parseTranslationUnit` に渡す `CXTranslationUnit_Flags`。
    ParseOptions {
        NONE = bindings::CXTranslationUnit_None;
        /// 通常は保持されないメタデータを含む詳細なプリプロセス記録を作成する
        DETAILED_PREPROCESSING_RECORD = bindings::CXTranslationUnit_DetailedPreprocessingRecord;
        /// ヘッダーの解析などで、翻訳単位が不完全であることを示す
        INCOMPLETE = bindings::CXTranslationUnit_Incomplete;
        PRECOMPILED_PREAMBLE = bindings::CXTranslationUnit_PrecompiledPreamble;
        CACHE_COMPLETION_RESULTS = bindings::CXTranslationUnit_CacheCompletionResults;
        /// 関数本体を解析しない
        SKIP_FUNCTION_BODIES = bindings::CXTranslationUnit_SkipFunctionBodies;
        INCLUDE_BRIEF_COMMENTS_IN_CODE_COMPLETION =
            bindings::CXTranslationUnit_IncludeBriefCommentsInCodeCompletion;
    }
}

impl ParseOptions {
    /// エディタ用途に推奨される既定値 (`clang_defaultEditingTranslationUnitOptions`)。
    pub fn default_editing() -> Self {
        Self(unsafe { bindings::clang_defaultEditingTranslationUnitOptions() })
    }
}

option_bits! {
    /// `clang_codeCompleteAt` に渡す `CXCodeComplete_Flags`。
    CompleteOptions {
        INCLUDE_MACROS = bindings::CXCodeComplete_IncludeMacros;
        INCLUDE_CODE_PATTERNS = bindings::CXCodeComplete_IncludeCodePatterns;
        INCLUDE_BRIEF_COMMENTS = bindings::CXCodeComplete_IncludeBriefComments;
    }
}

impl CompleteOptions {
    pub fn default_options() -> Self {
        Self(unsafe { bindings::clang_defaultCodeCompleteOptions() })
    }
}

/// `clang_createIndex` の設定。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexOptions {
    /// PCH 由来の宣言を翻訳単位から除外する
    pub exclude_declarations_from_pch: bool,
    /// 診断を標準エラーに出力する
    pub display_diagnostics: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_flags_match_libclang_values() {
        assert_eq!(ParseOptions::NONE.bits(), 0);
        assert_eq!(ParseOptions::DETAILED_PREPROCESSING_RECORD.bits(), 1);
        assert_eq!(ParseOptions::SKIP_FUNCTION_BODIES.bits(), 0x40);
        assert_eq!(
            ParseOptions::INCLUDE_BRIEF_COMMENTS_IN_CODE_COMPLETION.bits(),
            0x80
        );
    }

    #[test]
    fn flags_combine() {
        let mut opts = ParseOptions::INCOMPLETE | ParseOptions::SKIP_FUNCTION_BODIES;
        assert!(opts.contains(ParseOptions::INCOMPLETE));
        assert!(!opts.contains(ParseOptions::PRECOMPILED_PREAMBLE));
        opts |= ParseOptions::PRECOMPILED_PREAMBLE;
        assert_eq!(opts.bits(), 2 | 0x40 | 4);

        let complete = CompleteOptions::INCLUDE_MACROS | CompleteOptions::INCLUDE_BRIEF_COMMENTS;
        assert_eq!(complete.bits(), 1 | 4);
        assert_eq!(CompleteOptions::default().bits(), 0);
    }
}
