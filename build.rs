//! `cindex-system` のビルドスクリプト。
//!
//! `bindgen` を使用して libclang のヘッダーファイル (`clang-c/Index.h`,
//! `clang-c/CXCompilationDatabase.h`) から Rust の FFI バインディングを生成し、
//! `libclang` 共有ライブラリへのリンク指定を出力します。
//!
//! 探索順序:
//! - ヘッダー: `LIBCLANG_INCLUDE_DIR` → `llvm-config --includedir` → `/usr/lib/llvm-*/include` などの標準パス
//! - ライブラリ: `LIBCLANG_PATH` → `llvm-config --libdir` → `/usr/lib/llvm-*/lib` などの標準パス
//!
//! 見つからない場合はインストール方法を示してエラーを発生させます。
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn main() {
    let wrapper_path = Path::new("lib/wrapper.h");
    if !wrapper_path.exists() {
        panic!("couldn't found wrapper file!");
    }
    println!("cargo:rerun-if-changed={}", wrapper_path.display());
    println!("cargo:rerun-if-env-changed=LIBCLANG_PATH");
    println!("cargo:rerun-if-env-changed=LIBCLANG_INCLUDE_DIR");
    println!("cargo:rerun-if-env-changed=LLVM_CONFIG_PATH");

    let llvm_config = env::var("LLVM_CONFIG_PATH").unwrap_or_else(|_| "llvm-config".to_string());

    // clang-c ヘッダーの探索
    let include_dir = env::var("LIBCLANG_INCLUDE_DIR")
        .ok()
        .map(PathBuf::from)
        .or_else(|| llvm_config_dir(&llvm_config, "--includedir"))
        .filter(|dir| dir.join("clang-c/Index.h").exists())
        .or_else(|| {
            find_in_candidates(
                |dir| dir.join("include/clang-c/Index.h").exists(),
                "include",
            )
        });

    // 明示的なエラーハンドリング: libclang-dev パッケージがインストールされているかを確認
    let Some(include_dir) = include_dir else {
        panic!(
            "\n\n[cindex-system ERROR]: clang-c headers not found!\n\
            Please install them using: sudo apt install libclang-dev\n\
            or point LIBCLANG_INCLUDE_DIR at the directory containing clang-c/Index.h\n"
        );
    };

    let lib_dir = env::var("LIBCLANG_PATH")
        .ok()
        .map(PathBuf::from)
        .or_else(|| llvm_config_dir(&llvm_config, "--libdir"))
        .filter(|dir| libclang_name(dir).is_some())
        .or_else(|| find_in_candidates(|dir| libclang_name(&dir.join("lib")).is_some(), "lib"));

    let Some(lib_dir) = lib_dir else {
        panic!(
            "\n\n[cindex-system ERROR]: libclang shared library not found!\n\
            Please install it using: sudo apt install libclang-dev\n\
            or point LIBCLANG_PATH at the directory containing libclang\n"
        );
    };

    // リンク指定
    println!("cargo:rustc-link-search=native={}", lib_dir.display());
    match libclang_name(&lib_dir) {
        Some(LibName::Plain) => println!("cargo:rustc-link-lib=dylib=clang"),
        Some(LibName::Versioned(file)) => {
            println!("cargo:rustc-link-lib=dylib:+verbatim={}", file)
        }
        None => unreachable!("lib_dir was filtered on libclang_name"),
    }
    if cfg!(any(target_os = "linux", target_os = "macos")) {
        println!("cargo:rustc-link-arg=-Wl,-rpath,{}", lib_dir.display());
    }

    let builder = bindgen::Builder::default()
        .header(wrapper_path.display().to_string())
        .clang_arg(format!("-I{}", include_dir.display()))
        .derive_default(true)
        .derive_debug(true)
        .layout_tests(false)
        // enum 定数は `CXError_Success` のように C と同じ名前で公開する
        .prepend_enum_name(false)
        .allowlist_function("clang_.*")
        .allowlist_type("CX.*")
        .allowlist_var("CX.*");

    // バインディング生成
    let bindings = builder
        .generate()
        .expect("Unable to generate bindings. Check if libclang is installed.");

    let out_path = PathBuf::from(env::var("OUT_DIR").unwrap());
    bindings
        .write_to_file(out_path.join("bindings.rs"))
        .expect("Couldn't write bindings!");
}

/// リンク対象となる libclang のファイル名の種類。
enum LibName {
    /// `libclang.so` / `libclang.dylib` / `libclang.lib` が存在し `-lclang` で解決できる
    Plain,
    /// 開発用シンボリックリンクがなく `libclang.so.1` のような実体のみが存在する
    Versioned(String),
}

fn libclang_name(dir: &Path) -> Option<LibName> {
    if ["libclang.so", "libclang.dylib", "libclang.lib"]
        .iter()
        .any(|name| dir.join(name).exists())
    {
        return Some(LibName::Plain);
    }
    let entries = fs::read_dir(dir).ok()?;
    let mut versioned: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|name| {
            (name.starts_with("libclang.so.") || name.starts_with("libclang-"))
                && !name.starts_with("libclang-cpp")
                && name.contains(".so")
        })
        .collect();
    versioned.sort();
    versioned.pop().map(LibName::Versioned)
}

fn llvm_config_dir(llvm_config: &str, flag: &str) -> Option<PathBuf> {
    let output = Command::new(llvm_config).arg(flag).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let dir = String::from_utf8(output.stdout).ok()?;
    Some(PathBuf::from(dir.trim()))
}

/// Debian/Ubuntu の `/usr/lib/llvm-N` や Homebrew の標準パスから候補を探す。
/// 新しいバージョンを優先する。
fn find_in_candidates(accept: impl Fn(&Path) -> bool, leaf: &str) -> Option<PathBuf> {
    let mut roots: Vec<PathBuf> = fs::read_dir("/usr/lib")
        .into_iter()
        .flatten()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("llvm-"))
        })
        .collect();
    roots.sort_by_key(|p| {
        p.file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.trim_start_matches("llvm-").parse::<u32>().ok())
            .unwrap_or(0)
    });
    roots.reverse();
    roots.extend(
        [
            "/usr/local/opt/llvm",
            "/opt/homebrew/opt/llvm",
            "/usr/local",
            "/usr",
        ]
        .iter()
        .map(PathBuf::from),
    );
    roots
        .into_iter()
        .find(|root| accept(root))
        .map(|root| root.join(leaf))
}
