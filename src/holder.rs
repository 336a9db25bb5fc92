//! このモジュールは、ネイティブ構造体のフィールドに渡すテキストバッファを保持する
//! `StringHolder` を提供します。
//!
//! libclang の構造体 (`CXUnsavedFile` など) は文字列を生ポインタで参照するだけで、
//! 所有はしません。`StringHolder` はそのバッファを Rust 側で所有し、
//! 構造体が使われている間は移動・再確保されないポインタを提供します。
use std::ffi::c_char;
use std::fmt;
use std::str::Utf8Error;

/// NUL 終端されたテキストバッファ。
///
/// バッファ内容は途中に NUL を含んでも構いません (長さは `len()` で別途渡します)。
#[derive(Clone, PartialEq, Eq)]
pub struct StringHolder {
    // 常に末尾に NUL を 1 バイト持つ
    buf: Vec<u8>,
}

impl StringHolder {
    /// 空のバッファを作成します。
    pub fn new() -> Self {
        Self { buf: vec![0] }
    }

    pub fn with_text(text: impl AsRef<[u8]>) -> Self {
        let mut holder = Self::new();
        holder.set_text(text);
        holder
    }

    /// 内容を置き換えます。
    ///
    /// バッファが再確保される可能性があるため、以前に `as_ptr` で取得したポインタは無効になります。
    pub fn set_text(&mut self, text: impl AsRef<[u8]>) {
        let text = text.as_ref();
        self.buf.clear();
        self.buf.reserve(text.len() + 1);
        self.buf.extend_from_slice(text);
        self.buf.push(0);
    }

    /// NUL 終端されたバッファの先頭ポインタ。
    ///
    /// 次に `set_text` を呼ぶか、このホルダーがドロップされるまで同じアドレスを返します。
    pub fn as_ptr(&self) -> *const c_char {
        self.buf.as_ptr() as *const c_char
    }

    /// 末尾の NUL を除いた内容。
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.buf.len() - 1]
    }

    pub fn to_str(&self) -> Result<&str, Utf8Error> {
        std::str::from_utf8(self.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.buf.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn has_interior_nul(&self) -> bool {
        self.as_bytes().contains(&0)
    }
}

impl Default for StringHolder {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for StringHolder {
    fn from(text: &str) -> Self {
        Self::with_text(text)
    }
}

impl From<String> for StringHolder {
    fn from(text: String) -> Self {
        let mut buf = text.into_bytes();
        buf.push(0);
        Self { buf }
    }
}

impl fmt::Debug for StringHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StringHolder")
            .field(&String::from_utf8_lossy(self.as_bytes()))
            .finish()
    }
}
