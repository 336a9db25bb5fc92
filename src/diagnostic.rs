//! このモジュールは、libclang の診断情報 (`CXDiagnostic`) をRustで扱うための型を提供します。
use crate::bindings;
use crate::handle::Handle;
use crate::source::{SourceLocation, SourceRange};
use crate::string::{self, ClangString};
use std::ffi::c_void;
use std::fmt;
use std::marker::PhantomData;

native_kind!(
    /// `CXDiagnostic`
    pub DiagnosticKind("CXDiagnostic"): c_void => clang_disposeDiagnostic
);

/// 診断の重大度。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Ignored,
    Note,
    Warning,
    Error,
    Fatal,
    /// このバージョンのヘッダーが知らない値
    Unknown(u32),
}

impl Severity {
    pub fn from_raw(raw: bindings::CXDiagnosticSeverity) -> Self {
        match raw {
            bindings::CXDiagnostic_Ignored => Self::Ignored,
            bindings::CXDiagnostic_Note => Self::Note,
            bindings::CXDiagnostic_Warning => Self::Warning,
            bindings::CXDiagnostic_Error => Self::Error,
            bindings::CXDiagnostic_Fatal => Self::Fatal,
            other => Self::Unknown(other as u32),
        }
    }
}

/// ソースの修正候補。`range` を `value` で置き換えることで適用します。
#[derive(Debug)]
pub struct FixIt<'tu> {
    pub range: SourceRange<'tu>,
    pub value: String,
}

/// 診断情報一つ。重大度・メッセージ・位置に加え、関連する範囲と修正候補を持ちます。
pub struct Diagnostic<'tu> {
    handle: Handle<DiagnosticKind>,
    _tu: PhantomData<&'tu ()>,
}

impl<'tu> Diagnostic<'tu> {
    /// # Safety
    /// `raw` は `'tu` の翻訳単位 (または補完結果) から取得した、未解放の診断でなければなりません。
    pub(crate) unsafe fn from_raw(raw: bindings::CXDiagnostic) -> Option<Self> {
        let handle = unsafe { Handle::owned(raw) }?;
        Some(Self {
            handle,
            _tu: PhantomData,
        })
    }

    /// 親の診断が所有する子の診断。解放は親に任せます。
    unsafe fn borrowed(raw: bindings::CXDiagnostic) -> Option<Self> {
        let handle = unsafe { Handle::borrowed(raw) }?;
        Some(Self {
            handle,
            _tu: PhantomData,
        })
    }

    pub fn handle(&self) -> &Handle<DiagnosticKind> {
        &self.handle
    }

    fn raw(&self) -> bindings::CXDiagnostic {
        self.handle.as_ptr()
    }

    pub fn severity(&self) -> Severity {
        Severity::from_raw(unsafe { bindings::clang_getDiagnosticSeverity(self.raw()) })
    }

    pub fn spelling(&self) -> String {
        string::take(unsafe { bindings::clang_getDiagnosticSpelling(self.raw()) })
    }

    pub fn location(&self) -> SourceLocation<'tu> {
        SourceLocation::from_raw(unsafe { bindings::clang_getDiagnosticLocation(self.raw()) })
    }

    pub fn ranges(&self) -> Vec<SourceRange<'tu>> {
        let n = unsafe { bindings::clang_getDiagnosticNumRanges(self.raw()) };
        (0..n)
            .map(|i| {
                SourceRange::from_raw(unsafe { bindings::clang_getDiagnosticRange(self.raw(), i) })
            })
            .collect()
    }

    /// 修正候補。置き換え範囲は出力引数として受け取ります。
    pub fn fixits(&self) -> Vec<FixIt<'tu>> {
        let n = unsafe { bindings::clang_getDiagnosticNumFixIts(self.raw()) };
        (0..n)
            .map(|i| {
                let mut range = unsafe { bindings::clang_getNullRange() };
                let value = string::take(unsafe {
                    bindings::clang_getDiagnosticFixIt(self.raw(), i, &mut range)
                });
                FixIt {
                    range: SourceRange::from_raw(range),
                    value,
                }
            })
            .collect()
    }

    /// この診断を有効にするコマンドラインオプションと、無効にするオプションの組。
    pub fn option(&self) -> (String, String) {
        let mut disable = bindings::CXString::default();
        let enable = string::take(unsafe {
            bindings::clang_getDiagnosticOption(self.raw(), &mut disable)
        });
        let disable = unsafe { ClangString::from_raw(disable) }.into_string();
        (enable, disable)
    }

    /// 無効にするオプションだけを取り出します。
    pub fn disable_option(&self) -> String {
        self.option().1
    }

    /// 診断のカテゴリ番号。0 はカテゴリなし。
    pub fn category_number(&self) -> u32 {
        unsafe { bindings::clang_getDiagnosticCategory(self.raw()) }
    }

    pub fn category_name(&self) -> String {
        string::take(unsafe { bindings::clang_getDiagnosticCategoryText(self.raw()) })
    }

    /// この診断に付随するノートなどの子診断。
    pub fn children(&self) -> Vec<Diagnostic<'_>> {
        let set = unsafe { bindings::clang_getChildDiagnostics(self.raw()) };
        if set.is_null() {
            return Vec::new();
        }
        let n = unsafe { bindings::clang_getNumDiagnosticsInSet(set) };
        (0..n)
            .filter_map(|i| unsafe {
                Diagnostic::borrowed(bindings::clang_getDiagnosticInSet(set, i))
            })
            .collect()
    }

    /// clang のコマンドラインと同じ形式で整形します。`options` は `CXDiagnosticDisplayOptions` です。
    pub fn format(&self, options: u32) -> String {
        string::take(unsafe { bindings::clang_formatDiagnostic(self.raw(), options) })
    }
}

impl fmt::Display for Diagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let options = unsafe { bindings::clang_defaultDiagnosticDisplayOptions() };
        f.write_str(&self.format(options))
    }
}

impl fmt::Debug for Diagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostic")
            .field("severity", &self.severity())
            .field("location", &self.location())
            .field("spelling", &self.spelling())
            .finish()
    }
}
