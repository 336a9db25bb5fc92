use cindex_system::{
    CompilationDatabase, CompilationDatabaseErrorCode, CompleteOptions, Cursor, CursorKind, Error,
    Index, Ownership, ParseOptions, Severity, SourceLocation, SourceRange, TokenKind,
    TranslationUnit, UnsavedFile, ViewError, adapter,
};
use std::fs;
use std::path::Path;

const NO_ARGS: &[&str] = &[];

fn parse_source<'i>(
    index: &'i Index,
    name: &str,
    source: &str,
    args: &[&str],
) -> TranslationUnit<'i> {
    let unsaved = [UnsavedFile::new(name, source).unwrap()];
    index
        .parse(name, args, &unsaved, Some(ParseOptions::NONE))
        .unwrap()
}

#[test]
fn tokenize_returns_native_token_array() {
    let index = Index::new().unwrap();
    let tu = parse_source(&index, "t.c", "int i = 5;", NO_ARGS);
    let file = tu.file("t.c").unwrap().unwrap();
    let tokens = tu.tokenize(tu.extent(&file, 0, 9));

    assert_eq!(tokens.n(), 4);
    assert_eq!(tokens.len(), 4);
    let spellings: Vec<String> = tokens.iter().map(|t| t.spelling()).collect();
    assert_eq!(spellings, ["int", "i", "=", "5"]);
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind()).collect();
    assert_eq!(
        kinds,
        [
            TokenKind::Keyword,
            TokenKind::Identifier,
            TokenKind::Punctuation,
            TokenKind::Literal
        ]
    );

    assert_eq!(tokens.at(3).unwrap().spelling(), "5");
    assert_eq!(tokens.at(4).unwrap_err(), ViewError::OutOfRange { index: 4, len: 4 });
    assert_eq!(tokens.at(-1).unwrap_err(), ViewError::OutOfRange { index: -1, len: 4 });

    let ident = tokens.at(1).unwrap();
    assert_eq!(ident.cursor().kind(), CursorKind::VAR_DECL);
    assert_eq!(ident.cursor(), tokens.at(2).unwrap().cursor());
}

#[test]
fn tokenize_null_range_yields_nothing() {
    let index = Index::new().unwrap();
    let tu = parse_source(&index, "t.c", "int i = 5;", NO_ARGS);
    let null = SourceRange::new(SourceLocation::null(), SourceLocation::null());
    assert!(null.is_null());
    let tokens = tu.tokenize(null);
    assert!(tokens.is_empty());
    assert_eq!(tokens.iter().count(), 0);
}

#[test]
fn instantiation_location_unpacks_out_parameters() {
    let index = Index::new().unwrap();
    let tu = parse_source(&index, "t.c", "int i = 5;", NO_ARGS);
    let file = tu.file("t.c").unwrap().unwrap();
    let location = tu.location_for_offset(&file, 4);

    let (loc_file, line, column, offset) = adapter::instantiation_location(&location);
    assert_eq!(loc_file.unwrap().name(), "t.c");
    assert_eq!((line, column, offset), (1, 5, 4));
    assert_eq!(location, tu.location(&file, 1, 5));

    let (null_file, ..) = SourceLocation::null().instantiation();
    assert!(null_file.is_none());
}

#[test]
fn range_contains_locations_between_its_ends() {
    let index = Index::new().unwrap();
    let tu = parse_source(&index, "t.c", "int a;\nint b;\nint c;\n", NO_ARGS);
    let file = tu.file("t.c").unwrap().unwrap();
    let range = tu.extent(&file, 7, 13);

    assert!(range.contains(&tu.location(&file, 2, 3)));
    assert!(!range.contains(&tu.location(&file, 1, 1)));
    assert!(!range.contains(&tu.location(&file, 3, 1)));
    assert!(!range.is_null());
}

#[test]
fn parse_adapter_returns_owning_unit() {
    let index = Index::new().unwrap();
    let unsaved = [UnsavedFile::new("t.c", "int x;").unwrap()];
    let tu = adapter::parse_translation_unit(
        &index,
        Some(Path::new("t.c")),
        &["-std=c99"],
        &unsaved,
        ParseOptions::NONE,
    )
    .unwrap()
    .unwrap();
    assert_eq!(tu.handle().ownership(), Ownership::Owning);
    assert_eq!(tu.handle().kind(), "CXTranslationUnit");
    assert_eq!(tu.spelling(), "t.c");
    assert_eq!(index.handle().ownership(), Ownership::Owning);
}

#[test]
fn argument_with_nul_is_rejected_before_the_call() {
    let index = Index::new().unwrap();
    let unsaved = [UnsavedFile::new("t.c", "int x;").unwrap()];
    let err = index
        .parse("t.c", &["-DX\0Y"], &unsaved, None)
        .unwrap_err();
    assert!(matches!(err, Error::InteriorNul(_)));
}

#[test]
fn missing_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let index = Index::new().unwrap();
    let missing = dir.path().join("missing.c");

    let raw = adapter::parse_translation_unit(
        &index,
        Some(missing.as_path()),
        NO_ARGS,
        &[],
        ParseOptions::NONE,
    )
    .unwrap();
    assert!(raw.is_none());

    match index.parse(&missing, NO_ARGS, &[], None) {
        Err(Error::TranslationUnitLoad(path)) => assert!(path.ends_with("missing.c")),
        other => panic!("expected a load failure, got {other:?}"),
    }
}

#[test]
fn cursor_children_are_top_level_declarations() {
    let index = Index::new().unwrap();
    let tu = parse_source(&index, "t.c", "int x; int y;", NO_ARGS);
    let root = tu.cursor();
    assert_eq!(root.kind(), CursorKind::TRANSLATION_UNIT);

    let vars: Vec<String> = root
        .children()
        .into_iter()
        .filter(|c| c.kind() == CursorKind::VAR_DECL)
        .map(|c| c.spelling())
        .collect();
    assert_eq!(vars, ["x", "y"]);
    assert!(CursorKind::VAR_DECL.is_declaration());
}

#[test]
fn reparse_picks_up_new_contents() {
    let index = Index::new().unwrap();
    let tu = parse_source(&index, "t.c", "int x;", NO_ARGS);
    let count_vars = |tu: &TranslationUnit<'_>| {
        tu.cursor()
            .children()
            .into_iter()
            .filter(|c| c.kind() == CursorKind::VAR_DECL)
            .count()
    };
    assert_eq!(count_vars(&tu), 1);

    let tu = tu
        .reparse(&[UnsavedFile::new("t.c", "int x; int y;").unwrap()])
        .unwrap();
    assert_eq!(count_vars(&tu), 2);
}

#[test]
fn failed_reparse_consumes_the_unit() {
    let dir = tempfile::tempdir().unwrap();
    let ast = dir.path().join("t.ast");
    let index = Index::new().unwrap();
    parse_source(&index, "t.c", "int x;", NO_ARGS).save(&ast).unwrap();

    // AST ファイルから読み込んだ翻訳単位はコンパイル引数を持たないため再解析できない
    let loaded = index.read(&ast).unwrap();
    match loaded.reparse(&[]) {
        Err(Error::Reparse(code)) => assert_ne!(code, 0),
        other => panic!("expected a reparse failure, got {other:?}"),
    }
}

#[test]
fn diagnostics_carry_severity_and_location() {
    let index = Index::new().unwrap();
    let tu = parse_source(&index, "t.c", "int f(void) { return undeclared; }", NO_ARGS);
    assert_eq!(tu.num_diagnostics(), 1);
    let d = tu.diagnostic(0).unwrap();
    assert_eq!(d.severity(), Severity::Error);
    assert!(d.spelling().contains("undeclared"));
    assert_eq!(d.location().line(), 1);
    assert!(d.to_string().contains("undeclared"));
    assert!(tu.diagnostic(1).is_none());
}

#[test]
fn diagnostic_fixit_uses_replacement_range() {
    let index = Index::new().unwrap();
    let tu = parse_source(&index, "t.c", "struct { int f0; } x = { f0 : 1 };", NO_ARGS);
    let diagnostics = tu.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    let d = &diagnostics[0];
    assert_eq!(d.severity(), Severity::Warning);

    let fixits = d.fixits();
    assert_eq!(fixits.len(), 1);
    assert_eq!(fixits[0].range.start().line(), 1);
    assert_eq!(fixits[0].range.start().column(), 26);
    assert_eq!(fixits[0].value, ".f0 = ");
}

#[test]
fn diagnostic_option_returns_enable_and_disable() {
    let index = Index::new().unwrap();
    let tu = parse_source(&index, "t.c", "void f(int x) {}", &["-Wunused-parameter"]);
    let d = tu.diagnostic(0).unwrap();
    assert_eq!(
        d.option(),
        (
            "-Wunused-parameter".to_string(),
            "-Wno-unused-parameter".to_string()
        )
    );
}

#[test]
fn diagnostic_children_are_notes() {
    let index = Index::new().unwrap();
    let tu = parse_source(&index, "t.c", "void f(int x) {} void g() { f(); }", NO_ARGS);
    let d = tu.diagnostic(0).unwrap();
    assert_eq!(d.severity(), Severity::Error);

    let children = d.children();
    assert_eq!(children.len(), 1);
    let note = &children[0];
    assert_eq!(note.severity(), Severity::Note);
    assert!(note.spelling().ends_with("declared here"));
    assert_eq!(note.location().line(), 1);
    assert_eq!(note.location().column(), 6);
    assert_eq!(note.handle().ownership(), Ownership::Borrowed);
}

#[test]
fn diagnostic_category_is_reported() {
    let index = Index::new().unwrap();
    let tu = parse_source(
        &index,
        "t.c",
        "int f(int i) { return 7; }",
        &["-Wall", "-Wextra"],
    );
    let d = tu.diagnostic(0).unwrap();
    assert_eq!(d.severity(), Severity::Warning);
    assert_eq!(d.location().line(), 1);
    assert_eq!(d.location().column(), 11);
    assert_eq!(d.category_number(), 2);
    assert_eq!(d.category_name(), "Semantic Issue");
    assert_eq!(d.disable_option(), "-Wno-unused-parameter");
}

fn find_cursors<'tu>(tu: &'tu TranslationUnit<'_>, spelling: &str) -> Vec<Cursor<'tu>> {
    tu.cursor()
        .walk_preorder()
        .into_iter()
        .filter(|c| c.spelling() == spelling)
        .collect()
}

#[test]
fn cursor_tokens_cover_its_extent() {
    let index = Index::new().unwrap();
    let tu = parse_source(&index, "t.c", "int foo(int i);", NO_ARGS);
    let foo = find_cursors(&tu, "foo")[0];
    let tokens = foo.tokens();
    let spellings: Vec<String> = tokens.iter().map(|t| t.spelling()).collect();
    assert_eq!(spellings, ["int", "foo", "(", "int", "i", ")"]);
}

#[test]
fn walk_preorder_starts_at_the_cursor_and_finds_references() {
    let index = Index::new().unwrap();
    let tu = parse_source(&index, "t.c", "void foo(); void bar() { foo(); }", NO_ARGS);
    let root = tu.cursor();
    let all = root.walk_preorder();
    assert_eq!(all[0], root);

    let foo = find_cursors(&tu, "foo")[0];
    assert_eq!(foo.kind(), CursorKind::FUNCTION_DECL);
    let bar = find_cursors(&tu, "bar")[0];
    let calls: Vec<_> = bar
        .walk_preorder()
        .into_iter()
        .filter(|c| c.kind() == CursorKind::CALL_EXPR)
        .collect();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].referenced().unwrap().spelling(), foo.spelling());
    assert!(root.referenced().is_none());
}

#[test]
fn declaration_finds_its_definition() {
    let index = Index::new().unwrap();
    let tu = parse_source(
        &index,
        "t.c",
        "int f(void);\nint f(void) { return 0; }\n",
        NO_ARGS,
    );
    let decls = find_cursors(&tu, "f");
    assert_eq!(decls.len(), 2);
    let definition = decls[0].definition().unwrap();
    assert_eq!(definition, decls[1]);
    assert_eq!(definition.location().line(), 2);
}

const PARENT_SOURCE: &str = "
class C {
    void f();
};

void C::f() { }
";

#[test]
fn semantic_and_lexical_parents_differ_out_of_line() {
    let index = Index::new().unwrap();
    let tu = parse_source(&index, "t.cpp", PARENT_SOURCE, NO_ARGS);
    let methods = find_cursors(&tu, "f");
    assert_eq!(methods.len(), 2);
    let class = find_cursors(&tu, "C")
        .into_iter()
        .find(|c| c.kind() == CursorKind::CLASS_DECL)
        .unwrap();

    assert_eq!(methods[0].semantic_parent(), methods[1].semantic_parent());
    assert_eq!(methods[0].semantic_parent(), Some(class));
    assert_ne!(methods[0].lexical_parent(), methods[1].lexical_parent());
    assert_eq!(methods[0].lexical_parent(), Some(class));
    assert_eq!(methods[1].lexical_parent(), Some(tu.cursor()));
}

#[test]
fn cursor_reports_usr_type_and_unit() {
    let index = Index::new().unwrap();
    let tu = parse_source(&index, "t.c", "int foo(void);\nconst char *s;\n", NO_ARGS);
    let foo = find_cursors(&tu, "foo")[0];
    assert_eq!(foo.usr(), "c:@F@foo");
    assert_eq!(foo.translation_unit().spelling(), "t.c");

    let s = find_cursors(&tu, "s")[0];
    let ty = s.cursor_type();
    assert_eq!(ty.spelling(), "const char *");
    assert!(!ty.is_const_qualified());
    assert_eq!(ty.kind_spelling(), "Pointer");
    assert_eq!(ty.canonical(), ty);
}

const COMPLETION_SOURCE: &str = "
/// Aaa.
int test1;

/// Bbb.
void test2(void);

void f() {

}
";

#[test]
fn code_completion_results_are_indexable() {
    let index = Index::new().unwrap();
    let unsaved = [UnsavedFile::new("fake.c", COMPLETION_SOURCE).unwrap()];
    let tu = index
        .parse(
            "fake.c",
            &["-std=c99"],
            &unsaved,
            Some(ParseOptions::INCLUDE_BRIEF_COMMENTS_IN_CODE_COMPLETION),
        )
        .unwrap();
    let mut results = tu
        .code_complete(
            "fake.c",
            9,
            1,
            &unsaved,
            CompleteOptions::default_options() | CompleteOptions::INCLUDE_BRIEF_COMMENTS,
        )
        .unwrap()
        .unwrap();
    results.sort();

    assert!(!results.is_empty());
    assert_eq!(results.len(), results.results().len());
    assert_eq!(results.iter().count(), results.len());
    let first = unsafe { results.at_unchecked(0) };
    assert!(std::ptr::eq(first, results.results().get(0).unwrap()));
    assert!(results.get(results.len()).is_none());

    let test1 = results
        .iter()
        .filter_map(|r| r.completion_string())
        .find(|s| s.typed_text().as_deref() == Some("test1"))
        .unwrap();
    assert_eq!(test1.brief_comment(), "Aaa.");
    assert!(test1.chunks().iter().any(|c| c.text == "int"));
    assert_eq!(test1.chunk(test1.num_chunks()), None);
}

#[test]
fn includes_skip_the_input_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.h"), "int a;\n").unwrap();
    let main = dir.path().join("main.c");
    fs::write(&main, "#include \"a.h\"\nint b;\n").unwrap();

    let index = Index::new().unwrap();
    let tu = index
        .parse(&main, NO_ARGS, &[], Some(ParseOptions::NONE))
        .unwrap();
    let includes = tu.includes();

    assert_eq!(includes.len(), 1);
    assert!(includes[0].include.name().ends_with("a.h"));
    assert!(includes[0].source.name().ends_with("main.c"));
    assert_eq!(includes[0].location.line(), 1);
    assert_eq!(includes[0].depth, 1);
}

#[test]
fn saved_unit_can_be_read_back() {
    let dir = tempfile::tempdir().unwrap();
    let ast = dir.path().join("t.ast");

    let index = Index::new().unwrap();
    let tu = parse_source(&index, "t.c", "int x;", NO_ARGS);
    tu.save(&ast).unwrap();
    assert!(ast.exists());

    let loaded = index.read(&ast).unwrap();
    assert_eq!(loaded.spelling(), tu.spelling());
}

#[test]
fn reading_a_missing_ast_fails() {
    let dir = tempfile::tempdir().unwrap();
    let index = Index::new().unwrap();
    let err = index.read(dir.path().join("none.ast")).unwrap_err();
    assert!(matches!(err, Error::TranslationUnitLoad(_)));
}

#[test]
fn compilation_database_missing_reports_error_code() {
    let dir = tempfile::tempdir().unwrap();
    let (db, code) = adapter::compilation_database_from_directory(dir.path()).unwrap();
    assert!(db.is_none());
    assert_eq!(code, CompilationDatabaseErrorCode::CanNotLoadDatabase);

    match CompilationDatabase::from_directory(dir.path()) {
        Err(Error::CompilationDatabase(err)) => {
            assert_eq!(err.code, CompilationDatabaseErrorCode::CanNotLoadDatabase);
            assert_eq!(err.dir, dir.path());
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn compilation_database_lists_commands() {
    let dir = tempfile::tempdir().unwrap();
    let dir_str = dir.path().to_str().unwrap();
    let source = dir.path().join("test.c");
    fs::write(&source, "int main(void) { return 0; }\n").unwrap();
    let json = format!(
        r#"[{{"directory": "{dir_str}", "command": "clang -c -DFOO test.c", "file": "{}"}}]"#,
        source.display()
    );
    fs::write(dir.path().join("compile_commands.json"), json).unwrap();

    let (db, code) = adapter::compilation_database_from_directory(dir.path()).unwrap();
    assert_eq!(code, CompilationDatabaseErrorCode::NoError);
    let db = db.unwrap();
    assert_eq!(db.handle().ownership(), Ownership::Owning);

    let commands = db.compile_commands(&source).unwrap().unwrap();
    assert_eq!(commands.len(), 1);
    let command = commands.get(0).unwrap();
    assert_eq!(command.directory(), dir_str);
    let args = command.arguments();
    assert_eq!(args[0], "clang");
    assert!(args.iter().any(|a| a == "-DFOO"));
    assert!(commands.get(1).is_none());

    let all = db.all_compile_commands().unwrap();
    assert_eq!(all.iter().count(), 1);
}
