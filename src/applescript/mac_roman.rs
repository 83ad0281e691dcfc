// src/applescript/mac_roman.rs

//! Mac OS Roman, the single-byte encoding `osascript` expects on stdin.
//!
//! Payload strings never need more than ASCII plus `«` and `»` because the
//! builder hex-encodes anything else; application names and file paths are
//! passed through as-is and may use the full upper half.

use encoding_rs::{EncoderResult, MACINTOSH};

use crate::errors::{BridgeError, Result};

/// Encode `text` as Mac OS Roman bytes.
pub fn encode(text: &str) -> Result<Vec<u8>> {
    let mut encoder = MACINTOSH.new_encoder();
    // Single-byte encoding: never more bytes out than UTF-8 bytes in.
    let mut out = Vec::with_capacity(text.len());
    let mut pos = 0;
    loop {
        let (result, read) =
            encoder.encode_from_utf8_to_vec_without_replacement(&text[pos..], &mut out, true);
        pos += read;
        match result {
            EncoderResult::InputEmpty => return Ok(out),
            EncoderResult::Unmappable(c) => return Err(BridgeError::Encoding(c)),
            EncoderResult::OutputFull => out.reserve(text.len() - pos + 1),
        }
    }
}

/// Decode Mac OS Roman bytes. Every byte maps to a character.
pub fn decode(bytes: &[u8]) -> String {
    MACINTOSH.decode_without_bom_handling(bytes).0.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guillemets_map_to_their_roman_bytes() {
        assert_eq!(encode("«»").unwrap(), vec![0xC7, 0xC8]);
    }

    #[test]
    fn ascii_passes_through() {
        let bytes = encode("tell application \"Finder\"\n").unwrap();
        assert_eq!(bytes, b"tell application \"Finder\"\n".to_vec());
    }

    #[test]
    fn umlauts_round_trip() {
        let text = "/Volumes/Jobs/Größe Ä.indd";
        assert_eq!(decode(&encode(text).unwrap()), text);
    }

    #[test]
    fn upper_half_matches_apple_assignments() {
        assert_eq!(encode("\u{20AC}\u{F8FF}\u{2122}").unwrap(), vec![0xDB, 0xF0, 0xAA]);
        assert_eq!(decode(&[0x80, 0xA5, 0xFF]), "\u{00C4}\u{2022}\u{02C7}");
    }

    #[test]
    fn unmappable_character_is_an_error() {
        match encode("snow ☃") {
            Err(BridgeError::Encoding(c)) => assert_eq!(c, '☃'),
            other => panic!("expected Encoding error, got {other:?}"),
        }
    }
}
