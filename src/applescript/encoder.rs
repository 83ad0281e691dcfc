// src/applescript/encoder.rs

//! Turning arbitrary text into AppleScript string expressions.
//!
//! AppleScript source cannot carry arbitrary characters (the interpreter
//! reads Mac OS Roman) and chokes on long literals. Text is therefore either
//! quoted directly, when it is short and made of harmless characters, or
//! hex-encoded as a `«data utxt…» as Unicode text` expression, whose payload
//! is the UTF-16BE representation with four uppercase hex digits per code
//! unit. Long text is split into chunks on character boundaries so each
//! chunk can be assigned by its own statement.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::errors::{BridgeError, Result};

const UTXT_PREFIX: &str = "«data utxt";
const UTXT_SUFFIX: &str = "» as Unicode text";

/// Characters that may appear inside a directly quoted literal.
///
/// `0`..`~` minus the backslash, which starts an escape sequence inside
/// AppleScript strings.
static SAFE_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A[0-\[\]-~]*\z").expect("static regex"));

/// Length thresholds for literal encoding.
///
/// The defaults were tuned against InDesign's AppleScript engine, whose
/// literal length limit is undocumented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingOptions {
    /// Safe text shorter than this is quoted directly.
    pub literal_max_len: usize,
    /// Text up to this length is emitted as a single `«data utxt»` literal.
    pub single_literal_max_len: usize,
    /// Characters per chunk when splitting longer text.
    pub chunk_size: usize,
}

impl Default for EncodingOptions {
    fn default() -> Self {
        Self {
            literal_max_len: 60,
            single_literal_max_len: 40,
            chunk_size: 40,
        }
    }
}

/// A piece of text in one of its two AppleScript spellings.
///
/// Holds the decoded text; rendering produces the source expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedLiteral {
    /// `"text"`; only constructed for text that passes [`is_safe_literal`].
    Quoted(String),
    /// `«data utxt004100420043» as Unicode text`.
    Utxt(String),
}

impl EncodedLiteral {
    /// The text this literal evaluates to.
    pub fn text(&self) -> &str {
        match self {
            EncodedLiteral::Quoted(text) | EncodedLiteral::Utxt(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            EncodedLiteral::Quoted(text) | EncodedLiteral::Utxt(text) => text,
        }
    }

    pub fn is_quoted(&self) -> bool {
        matches!(self, EncodedLiteral::Quoted(_))
    }

    /// Parse an expression previously rendered by this module.
    pub fn parse(expr: &str) -> Result<Self> {
        let expr = expr.trim();
        if let Some(hex) = expr
            .strip_prefix(UTXT_PREFIX)
            .and_then(|rest| rest.strip_suffix(UTXT_SUFFIX))
        {
            return decode_utxt(hex).map(EncodedLiteral::Utxt);
        }
        if let Some(inner) = expr
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
        {
            return Ok(EncodedLiteral::Quoted(unquote(inner)?));
        }
        Err(BridgeError::Protocol(format!(
            "not an AppleScript string literal: {expr}"
        )))
    }
}

impl fmt::Display for EncodedLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodedLiteral::Quoted(text) => write!(f, "\"{text}\""),
            EncodedLiteral::Utxt(text) => f.write_str(&to_utxt(text)),
        }
    }
}

/// True if `text` may be embedded between double quotes unchanged.
pub fn is_safe_literal(text: &str) -> bool {
    SAFE_LITERAL.is_match(text)
}

/// Encode `text` for embedding in a script, quoting it directly when it is
/// safe and shorter than `literal_max_len`.
pub fn encode_literal(text: &str, literal_max_len: usize) -> EncodedLiteral {
    if is_safe_literal(text) && text.chars().count() < literal_max_len {
        EncodedLiteral::Quoted(text.to_string())
    } else {
        EncodedLiteral::Utxt(text.to_string())
    }
}

/// Split `text` into chunks of at most `chunk_size` characters, each
/// hex-encoded on its own.
///
/// Empty text yields a single empty chunk. A `chunk_size` of zero is treated
/// as one.
pub fn split_into_chunks(text: &str, chunk_size: usize) -> Vec<EncodedLiteral> {
    let chunk_size = chunk_size.max(1);
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return vec![EncodedLiteral::Utxt(String::new())];
    }
    chars
        .chunks(chunk_size)
        .map(|chunk| EncodedLiteral::Utxt(chunk.iter().collect()))
        .collect()
}

/// Join the decoded text of `chunks` in order.
pub fn join_chunks(chunks: &[EncodedLiteral]) -> String {
    chunks.iter().map(EncodedLiteral::text).collect()
}

/// Render `text` as a `«data utxt…» as Unicode text` expression.
pub fn to_utxt(text: &str) -> String {
    let bytes: Vec<u8> = text.encode_utf16().flat_map(u16::to_be_bytes).collect();
    format!("{UTXT_PREFIX}{}{UTXT_SUFFIX}", hex::encode_upper(bytes))
}

/// Decode the hex payload of a `«data utxt…»` expression.
pub fn decode_utxt(hex_digits: &str) -> Result<String> {
    let bytes = hex::decode(hex_digits)
        .map_err(|e| BridgeError::Protocol(format!("bad utxt payload: {e}")))?;
    if bytes.len() % 2 != 0 {
        return Err(BridgeError::Protocol(
            "utxt payload is not a whole number of UTF-16 code units".to_string(),
        ));
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units)
        .map_err(|e| BridgeError::Protocol(format!("bad utxt payload: {e}")))
}

/// Quote arbitrary text as an AppleScript string, escaping `\` and `"`.
///
/// Used for application names and file paths, which are not hex-encoded.
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

fn unquote(inner: &str) -> Result<String> {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => {
                return Err(BridgeError::Protocol(
                    "dangling backslash in string literal".to_string(),
                ));
            }
        }
    }
    Ok(out)
}
