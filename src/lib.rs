//! `cindex-system` は libclang (clang の C インターフェース) を Rust から利用するためのライブラリです。
//!
//! このクレートは、libclang の C API への安全なラッパーを提供し、
//! ソースの解析・トークン化・診断・コード補完・コンパイルデータベースを Rust から扱えるようにします。
//!
//! 主な機能:
//! - 所有/借用を区別する不透明ハンドル (`Handle`) と、ちょうど一度だけの解放。
//! - ネイティブ配列をコピーせずに参照する境界チェック付きビュー (`BoundedView`)。
//! - ネイティブ構造体から参照される文字列バッファ (`StringHolder`, `UnsavedFile`)。
//! - 出力引数や (ポインタ, 個数) の組を返すエントリポイントの変換 (`adapter`)。
//! - `Index` / `TranslationUnit` を起点とする高水準の API。
//!
//! ```no_run
//! use cindex_system::{Index, UnsavedFile};
//!
//! let index = Index::new()?;
//! let source = UnsavedFile::new("t.c", "int i = 5;")?;
//! let tu = index.parse("t.c", &[] as &[&str], &[source], None)?;
//! for d in tu.diagnostics() {
//!     eprintln!("{d}");
//! }
//! # Ok::<(), cindex_system::Error>(())
//! ```
#[macro_use]
mod macros;

pub mod adapter;
mod compilation_db;
mod completion;
mod cursor;
mod diagnostic;
mod error;
mod handle;
mod holder;
mod index;
mod marshal;
mod options;
mod source;
mod string;
mod token;
mod translation_unit;
mod unsaved;
mod view;

pub use compilation_db::*;
pub use completion::*;
pub use cursor::*;
pub use diagnostic::*;
pub use error::*;
pub use handle::*;
pub use holder::*;
pub use index::*;
pub use options::*;
pub use source::*;
pub use string::ClangString;
pub use token::*;
pub use translation_unit::*;
pub use unsaved::*;
pub use view::*;

/// libclang の C API への FFI バインディングが含まれています。`build.rs` によって生成されます。
#[doc(hidden)]
pub mod bindings;
