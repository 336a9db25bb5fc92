//! このモジュールは、コード補完の結果 (`CXCodeCompleteResults`) のラッパーを提供します。
//!
//! 結果配列は構造体に埋め込まれた `Results` と `NumResults` の組で表されます。
//! `CodeCompleteResults` は両者を同じ構造体から一度だけ読み出してビューを作るため、
//! 添字の検証は常にネイティブが報告した個数に対して行われます。
use crate::bindings;
use crate::cursor::CursorKind;
use crate::diagnostic::Diagnostic;
use crate::handle::Handle;
use crate::string;
use crate::view::BoundedView;
use std::ffi::c_void;
use std::fmt;
use std::marker::PhantomData;

native_kind!(
    /// `CXCodeCompleteResults *`
    pub CodeCompleteResultsKind("CXCodeCompleteResults"): bindings::CXCodeCompleteResults
        => clang_disposeCodeCompleteResults
);

native_kind!(
    /// `CXCompletionString`。補完結果が所有するため借用のみ
    pub CompletionStringKind("CXCompletionString"): c_void
);

/// `clang_codeCompleteAt` の結果。作成元の翻訳単位を借用します。
pub struct CodeCompleteResults<'tu> {
    handle: Handle<CodeCompleteResultsKind>,
    _tu: PhantomData<&'tu ()>,
}

impl<'tu> CodeCompleteResults<'tu> {
    /// # Safety
    /// `raw` は `'tu` の翻訳単位に対する `clang_codeCompleteAt` の戻り値でなければなりません。
    pub(crate) unsafe fn from_raw(raw: *mut bindings::CXCodeCompleteResults) -> Option<Self> {
        let handle = unsafe { Handle::owned(raw) }?;
        Some(Self {
            handle,
            _tu: PhantomData,
        })
    }

    fn raw(&self) -> *mut bindings::CXCodeCompleteResults {
        self.handle.as_ptr()
    }

    pub fn handle(&self) -> &Handle<CodeCompleteResultsKind> {
        &self.handle
    }

    /// ネイティブが報告した結果の個数 (`NumResults`)。
    pub fn len(&self) -> usize {
        self.results().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(Results, NumResults)` から作った結果配列のビュー。
    pub fn results(&self) -> BoundedView<'_, bindings::CXCompletionResult> {
        let raw = self.raw();
        if raw.is_null() {
            return unsafe { BoundedView::from_raw_parts(std::ptr::null(), 0) };
        }
        unsafe {
            let results = &*raw;
            BoundedView::from_raw_parts(results.Results, results.NumResults as usize)
        }
    }

    pub fn get(&self, index: usize) -> Option<CompletionResult<'_>> {
        self.results().get(index).map(CompletionResult)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = CompletionResult<'_>> + '_ {
        self.results().iter().map(CompletionResult)
    }

    /// 個数を検証せずに結果を参照します。
    ///
    /// # Safety
    /// `index < self.len()` でなければなりません。
    pub unsafe fn at_unchecked(&self, index: usize) -> &bindings::CXCompletionResult {
        unsafe { self.results().at_unchecked(index) }
    }

    /// 結果をアルファベット順に並べ替えます。
    pub fn sort(&mut self) {
        let results = self.results();
        if results.is_empty() {
            return;
        }
        unsafe {
            bindings::clang_sortCodeCompletionResults(
                results.as_ptr() as *mut bindings::CXCompletionResult,
                results.len() as u32,
            );
        }
    }

    pub fn num_diagnostics(&self) -> u32 {
        unsafe { bindings::clang_codeCompleteGetNumDiagnostics(self.raw()) }
    }

    pub fn diagnostic(&self, index: u32) -> Option<Diagnostic<'_>> {
        if index >= self.num_diagnostics() {
            return None;
        }
        let raw = unsafe { bindings::clang_codeCompleteGetDiagnostic(self.raw(), index) };
        unsafe { Diagnostic::from_raw(raw) }
    }
}

impl fmt::Debug for CodeCompleteResults<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeCompleteResults")
            .field("len", &self.len())
            .field("handle", &self.handle)
            .finish()
    }
}

/// 補完候補一つ。
#[derive(Clone, Copy)]
pub struct CompletionResult<'a>(&'a bindings::CXCompletionResult);

impl<'a> CompletionResult<'a> {
    pub fn raw(&self) -> &'a bindings::CXCompletionResult {
        self.0
    }

    pub fn cursor_kind(&self) -> CursorKind {
        CursorKind::from_raw(self.0.CursorKind)
    }

    pub fn completion_string(&self) -> Option<CompletionString<'a>> {
        CompletionString::from_raw(self.0.CompletionString)
    }
}

impl fmt::Debug for CompletionResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionResult")
            .field("cursor_kind", &self.cursor_kind())
            .field("completion_string", &self.completion_string())
            .finish()
    }
}

/// 補完候補の本体。チャンクの列として表されます。
pub struct CompletionString<'a> {
    handle: Handle<CompletionStringKind>,
    _results: PhantomData<&'a ()>,
}

impl<'a> CompletionString<'a> {
    fn from_raw(raw: bindings::CXCompletionString) -> Option<Self> {
        let handle = unsafe { Handle::borrowed(raw) }?;
        Some(Self {
            handle,
            _results: PhantomData,
        })
    }

    fn raw(&self) -> bindings::CXCompletionString {
        self.handle.as_ptr()
    }

    pub fn num_chunks(&self) -> u32 {
        unsafe { bindings::clang_getNumCompletionChunks(self.raw()) }
    }

    pub fn chunk(&self, index: u32) -> Option<CompletionChunk> {
        if index >= self.num_chunks() {
            return None;
        }
        let kind = ChunkKind(unsafe { bindings::clang_getCompletionChunkKind(self.raw(), index) });
        let text =
            string::take(unsafe { bindings::clang_getCompletionChunkText(self.raw(), index) });
        Some(CompletionChunk { kind, text })
    }

    pub fn chunks(&self) -> Vec<CompletionChunk> {
        (0..self.num_chunks()).filter_map(|i| self.chunk(i)).collect()
    }

    /// 値が小さいほど有力な候補です。
    pub fn priority(&self) -> u32 {
        unsafe { bindings::clang_getCompletionPriority(self.raw()) }
    }

    pub fn availability(&self) -> Availability {
        Availability::from_raw(unsafe { bindings::clang_getCompletionAvailability(self.raw()) })
    }

    pub fn brief_comment(&self) -> String {
        string::take(unsafe { bindings::clang_getCompletionBriefComment(self.raw()) })
    }

    /// `TypedText` チャンクのテキスト。
    pub fn typed_text(&self) -> Option<String> {
        self.chunks()
            .into_iter()
            .find(|c| c.kind == ChunkKind::TYPED_TEXT)
            .map(|c| c.text)
    }
}

impl fmt::Debug for CompletionString<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionString")
            .field("chunks", &self.chunks())
            .field("priority", &self.priority())
            .field("availability", &self.availability())
            .finish()
    }
}

/// チャンクの種類 (`CXCompletionChunkKind`)。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkKind(bindings::CXCompletionChunkKind);

impl ChunkKind {
    pub const OPTIONAL: Self = Self(bindings::CXCompletionChunk_Optional);
    pub const TYPED_TEXT: Self = Self(bindings::CXCompletionChunk_TypedText);
    pub const TEXT: Self = Self(bindings::CXCompletionChunk_Text);
    pub const PLACEHOLDER: Self = Self(bindings::CXCompletionChunk_Placeholder);
    pub const INFORMATIVE: Self = Self(bindings::CXCompletionChunk_Informative);
    pub const LEFT_PAREN: Self = Self(bindings::CXCompletionChunk_LeftParen);
    pub const RIGHT_PAREN: Self = Self(bindings::CXCompletionChunk_RightParen);
    pub const RESULT_TYPE: Self = Self(bindings::CXCompletionChunk_ResultType);

    pub fn raw(self) -> bindings::CXCompletionChunkKind {
        self.0
    }
}

/// 補完候補の一部分。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionChunk {
    pub kind: ChunkKind,
    pub text: String,
}

/// 候補の利用可否 (`CXAvailabilityKind`)。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Availability {
    Available,
    Deprecated,
    NotAvailable,
    NotAccessible,
    Unknown(u32),
}

impl Availability {
    pub fn from_raw(raw: bindings::CXAvailabilityKind) -> Self {
        match raw {
            bindings::CXAvailability_Deprecated => Self::Deprecated,
            bindings::CXAvailability_NotAvailable => Self::NotAvailable,
            bindings::CXAvailability_Available => Self::Available,
            bindings::CXAvailability_NotAccessible => Self::NotAccessible,
            other => Self::Unknown(other as u32),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn availability_maps_from_raw_values() {
        assert_eq!(
            Availability::from_raw(bindings::CXAvailability_Available),
            Availability::Available
        );
        assert_eq!(
            Availability::from_raw(bindings::CXAvailability_NotAccessible),
            Availability::NotAccessible
        );
        assert_eq!(Availability::from_raw(42), Availability::Unknown(42));
    }

    #[test]
    fn null_completion_string_is_absent() {
        assert!(CompletionString::from_raw(std::ptr::null_mut()).is_none());
    }
}
