//! `compile_commands.json` などのコンパイルデータベースのラッパー。
use crate::adapter;
use crate::bindings;
use crate::error::{ClangResult, CompilationDatabaseError};
use crate::handle::Handle;
use crate::marshal;
use crate::string;
use std::ffi::{c_uint, c_void};
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

native_kind!(
    /// `CXCompilationDatabase`
    pub CompilationDatabaseKind("CXCompilationDatabase"): c_void
        => clang_CompilationDatabase_dispose
);

native_kind!(
    /// `CXCompileCommands`
    pub CompileCommandsKind("CXCompileCommands"): c_void => clang_CompileCommands_dispose
);

/// ビルドディレクトリから読み込んだコンパイルデータベース。
#[derive(Debug)]
pub struct CompilationDatabase {
    handle: Handle<CompilationDatabaseKind>,
}

impl CompilationDatabase {
    /// # Safety
    /// `raw` は `clang_CompilationDatabase_fromDirectory` の戻り値で、他の誰も解放しないものでなければなりません。
    pub(crate) unsafe fn from_raw(raw: bindings::CXCompilationDatabase) -> Option<Self> {
        let handle = unsafe { Handle::owned(raw) }?;
        Some(Self { handle })
    }

    /// `build_dir` にあるデータベースを読み込みます。
    ///
    /// 読み込みに失敗した場合は、ネイティブのエラーコードをそのまま持つ
    /// `CompilationDatabaseError` を返します。
    pub fn from_directory(build_dir: impl AsRef<Path>) -> ClangResult<Self> {
        let build_dir = build_dir.as_ref();
        match adapter::compilation_database_from_directory(build_dir)? {
            (Some(db), _) => Ok(db),
            (None, code) => Err(CompilationDatabaseError {
                dir: build_dir.to_path_buf(),
                code,
            }
            .into()),
        }
    }

    fn raw(&self) -> bindings::CXCompilationDatabase {
        self.handle.as_ptr()
    }

    pub fn handle(&self) -> &Handle<CompilationDatabaseKind> {
        &self.handle
    }

    /// `file` のコンパイルコマンド。データベースに存在しない場合は `None` です。
    pub fn compile_commands(
        &self,
        file: impl AsRef<Path>,
    ) -> ClangResult<Option<CompileCommands<'_>>> {
        let c_file = marshal::c_path(file.as_ref())?;
        let raw = unsafe {
            bindings::clang_CompilationDatabase_getCompileCommands(self.raw(), c_file.as_ptr())
        };
        Ok(unsafe { CompileCommands::from_raw(raw) })
    }

    /// データベース内のすべてのコンパイルコマンド。
    pub fn all_compile_commands(&self) -> Option<CompileCommands<'_>> {
        let raw = unsafe { bindings::clang_CompilationDatabase_getAllCompileCommands(self.raw()) };
        unsafe { CompileCommands::from_raw(raw) }
    }
}

/// コンパイルコマンドの集合。
pub struct CompileCommands<'db> {
    handle: Handle<CompileCommandsKind>,
    _db: PhantomData<&'db CompilationDatabase>,
}

impl<'db> CompileCommands<'db> {
    unsafe fn from_raw(raw: bindings::CXCompileCommands) -> Option<Self> {
        let handle = unsafe { Handle::owned(raw) }?;
        Some(Self {
            handle,
            _db: PhantomData,
        })
    }

    fn raw(&self) -> bindings::CXCompileCommands {
        self.handle.as_ptr()
    }

    pub fn len(&self) -> usize {
        unsafe { bindings::clang_CompileCommands_getSize(self.raw()) as usize }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<CompileCommand<'_>> {
        if index >= self.len() {
            return None;
        }
        let raw =
            unsafe { bindings::clang_CompileCommands_getCommand(self.raw(), index as c_uint) };
        if raw.is_null() {
            return None;
        }
        Some(CompileCommand {
            raw,
            _commands: PhantomData,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = CompileCommand<'_>> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }
}

impl fmt::Debug for CompileCommands<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// コンパイルコマンド一つ。所有する `CompileCommands` より長くは生存できません。
#[derive(Clone, Copy)]
pub struct CompileCommand<'a> {
    raw: bindings::CXCompileCommand,
    _commands: PhantomData<&'a ()>,
}

impl CompileCommand<'_> {
    /// コマンドを実行する作業ディレクトリ。
    pub fn directory(&self) -> String {
        string::take(unsafe { bindings::clang_CompileCommand_getDirectory(self.raw) })
    }

    pub fn filename(&self) -> String {
        string::take(unsafe { bindings::clang_CompileCommand_getFilename(self.raw) })
    }

    /// コンパイラ自身を先頭に含む引数列。
    pub fn arguments(&self) -> Vec<String> {
        let n = unsafe { bindings::clang_CompileCommand_getNumArgs(self.raw) };
        (0..n)
            .map(|i| string::take(unsafe { bindings::clang_CompileCommand_getArg(self.raw, i) }))
            .collect()
    }
}

impl fmt::Debug for CompileCommand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompileCommand")
            .field("directory", &self.directory())
            .field("filename", &self.filename())
            .field("arguments", &self.arguments())
            .finish()
    }
}
