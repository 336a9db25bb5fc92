//! AST のノードを指す `CXCursor` のラッパー。
use crate::adapter;
use crate::bindings;
use crate::source::{SourceLocation, SourceRange};
use crate::string;
use crate::token::Tokens;
use crate::translation_unit::TranslationUnit;
use std::ffi::c_void;
use std::fmt;
use std::marker::PhantomData;

/// カーソルが指す実体の種類 (`CXCursorKind`)。
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CursorKind(bindings::CXCursorKind);

impl CursorKind {
    pub const TRANSLATION_UNIT: Self = Self(bindings::CXCursor_TranslationUnit);
    pub const FUNCTION_DECL: Self = Self(bindings::CXCursor_FunctionDecl);
    pub const VAR_DECL: Self = Self(bindings::CXCursor_VarDecl);
    pub const STRUCT_DECL: Self = Self(bindings::CXCursor_StructDecl);
    pub const CLASS_DECL: Self = Self(bindings::CXCursor_ClassDecl);
    pub const CXX_METHOD: Self = Self(bindings::CXCursor_CXXMethod);
    pub const TYPEDEF_DECL: Self = Self(bindings::CXCursor_TypedefDecl);
    pub const PARM_DECL: Self = Self(bindings::CXCursor_ParmDecl);
    pub const CALL_EXPR: Self = Self(bindings::CXCursor_CallExpr);

    pub fn from_raw(raw: bindings::CXCursorKind) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> bindings::CXCursorKind {
        self.0
    }

    pub fn is_declaration(self) -> bool {
        unsafe { bindings::clang_isDeclaration(self.0) != 0 }
    }

    pub fn is_reference(self) -> bool {
        unsafe { bindings::clang_isReference(self.0) != 0 }
    }

    pub fn is_expression(self) -> bool {
        unsafe { bindings::clang_isExpression(self.0) != 0 }
    }

    pub fn is_statement(self) -> bool {
        unsafe { bindings::clang_isStatement(self.0) != 0 }
    }

    pub fn is_invalid(self) -> bool {
        unsafe { bindings::clang_isInvalid(self.0) != 0 }
    }

    pub fn spelling(self) -> String {
        string::take(unsafe { bindings::clang_getCursorKindSpelling(self.0) })
    }
}

impl fmt::Debug for CursorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CursorKind({})", self.spelling())
    }
}

/// AST 上のノード。所属する翻訳単位を借用します。
#[derive(Clone, Copy)]
pub struct Cursor<'tu> {
    raw: bindings::CXCursor,
    tu: &'tu TranslationUnit<'tu>,
}

impl<'tu> Cursor<'tu> {
    pub(crate) fn from_raw(tu: &'tu TranslationUnit<'tu>, raw: bindings::CXCursor) -> Self {
        Self { raw, tu }
    }

    /// null カーソルを `None` にします。
    fn non_null(tu: &'tu TranslationUnit<'tu>, raw: bindings::CXCursor) -> Option<Self> {
        let cursor = Self::from_raw(tu, raw);
        (!cursor.is_null()).then_some(cursor)
    }

    pub fn raw(&self) -> bindings::CXCursor {
        self.raw
    }

    /// このカーソルが属する翻訳単位。
    pub fn translation_unit(&self) -> &'tu TranslationUnit<'tu> {
        self.tu
    }

    pub fn is_null(&self) -> bool {
        unsafe { bindings::clang_Cursor_isNull(self.raw) != 0 }
    }

    pub fn kind(&self) -> CursorKind {
        CursorKind(unsafe { bindings::clang_getCursorKind(self.raw) })
    }

    pub fn spelling(&self) -> String {
        string::take(unsafe { bindings::clang_getCursorSpelling(self.raw) })
    }

    /// 関数の引数などを含む表示用の名前。
    pub fn display_name(&self) -> String {
        string::take(unsafe { bindings::clang_getCursorDisplayName(self.raw) })
    }

    /// 翻訳単位をまたいで実体を識別する USR (Unified Symbol Resolution)。
    pub fn usr(&self) -> String {
        string::take(unsafe { bindings::clang_getCursorUSR(self.raw) })
    }

    pub fn location(&self) -> SourceLocation<'tu> {
        SourceLocation::from_raw(unsafe { bindings::clang_getCursorLocation(self.raw) })
    }

    pub fn extent(&self) -> SourceRange<'tu> {
        SourceRange::from_raw(unsafe { bindings::clang_getCursorExtent(self.raw) })
    }

    pub fn cursor_type(&self) -> Type<'tu> {
        Type::from_raw(unsafe { bindings::clang_getCursorType(self.raw) })
    }

    /// 参照先の実体。参照や呼び出し式でない場合は `None` です。
    pub fn referenced(&self) -> Option<Cursor<'tu>> {
        Self::non_null(self.tu, unsafe { bindings::clang_getCursorReferenced(self.raw) })
    }

    /// 実体の定義。定義がこの翻訳単位にない場合は `None` です。
    pub fn definition(&self) -> Option<Cursor<'tu>> {
        Self::non_null(self.tu, unsafe { bindings::clang_getCursorDefinition(self.raw) })
    }

    /// 意味上の親 (例えばクラス外で定義されたメソッドのクラス)。
    pub fn semantic_parent(&self) -> Option<Cursor<'tu>> {
        Self::non_null(self.tu, unsafe { bindings::clang_getCursorSemanticParent(self.raw) })
    }

    /// ソース上で囲んでいる親。
    pub fn lexical_parent(&self) -> Option<Cursor<'tu>> {
        Self::non_null(self.tu, unsafe { bindings::clang_getCursorLexicalParent(self.raw) })
    }

    /// このカーソルの範囲に含まれるトークン。
    pub fn tokens(&self) -> Tokens<'tu> {
        adapter::tokenize(self.tu, self.extent())
    }

    /// 直下の子ノード。
    pub fn children(&self) -> Vec<Cursor<'tu>> {
        self.visit(false)
    }

    /// 自身を先頭に、すべての子孫を深さ優先の行きがけ順で返します。
    pub fn walk_preorder(&self) -> Vec<Cursor<'tu>> {
        let mut cursors = vec![*self];
        cursors.extend(self.visit(true));
        cursors
    }

    fn visit(&self, recurse: bool) -> Vec<Cursor<'tu>> {
        let mut collector = Collector {
            tu: self.tu,
            cursors: Vec::new(),
            recurse,
        };
        unsafe {
            bindings::clang_visitChildren(
                self.raw,
                Some(children_visitor),
                &mut collector as *mut Collector<'tu> as *mut c_void,
            );
        }
        collector.cursors
    }
}

impl PartialEq for Cursor<'_> {
    fn eq(&self, other: &Self) -> bool {
        unsafe { bindings::clang_equalCursors(self.raw, other.raw) != 0 }
    }
}

impl fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("kind", &self.kind())
            .field("spelling", &self.spelling())
            .finish()
    }
}

struct Collector<'tu> {
    tu: &'tu TranslationUnit<'tu>,
    cursors: Vec<Cursor<'tu>>,
    recurse: bool,
}

unsafe extern "C" fn children_visitor(
    cursor: bindings::CXCursor,
    _parent: bindings::CXCursor,
    client_data: bindings::CXClientData,
) -> bindings::CXChildVisitResult {
    let collector = unsafe { &mut *(client_data as *mut Collector<'_>) };
    collector.cursors.push(Cursor::from_raw(collector.tu, cursor));
    if collector.recurse {
        bindings::CXChildVisit_Recurse
    } else {
        bindings::CXChildVisit_Continue
    }
}

/// カーソルや式の型 (`CXType`)。
#[derive(Clone, Copy)]
pub struct Type<'tu> {
    raw: bindings::CXType,
    _tu: PhantomData<&'tu ()>,
}

impl<'tu> Type<'tu> {
    fn from_raw(raw: bindings::CXType) -> Self {
        Self {
            raw,
            _tu: PhantomData,
        }
    }

    pub fn raw(&self) -> bindings::CXType {
        self.raw
    }

    /// `const char *` のようなソース上の表記。
    pub fn spelling(&self) -> String {
        string::take(unsafe { bindings::clang_getTypeSpelling(self.raw) })
    }

    /// 型の種類の名前 (`Int`, `Pointer` など)。
    pub fn kind_spelling(&self) -> String {
        string::take(unsafe { bindings::clang_getTypeKindSpelling(self.raw.kind) })
    }

    /// typedef などを取り除いた正規の型。
    pub fn canonical(&self) -> Type<'tu> {
        Type::from_raw(unsafe { bindings::clang_getCanonicalType(self.raw) })
    }

    pub fn is_const_qualified(&self) -> bool {
        unsafe { bindings::clang_isConstQualifiedType(self.raw) != 0 }
    }
}

impl PartialEq for Type<'_> {
    fn eq(&self, other: &Self) -> bool {
        unsafe { bindings::clang_equalTypes(self.raw, other.raw) != 0 }
    }
}

impl fmt::Debug for Type<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type({})", self.spelling())
    }
}
