use proptest::prelude::*;

use adobe_bridge::applescript::encoder::{EncodedLiteral, encode_literal, join_chunks, split_into_chunks};
use adobe_bridge::applescript::{EncodingOptions, ScriptBuilder, mac_roman};
use adobe_bridge_test_utils::parse_script;

fn decode(literal: &EncodedLiteral) -> String {
    EncodedLiteral::parse(&literal.to_string())
        .expect("rendered literal parses back")
        .into_text()
}

proptest! {
    #[test]
    fn rendered_literal_decodes_to_the_input(text in any::<String>()) {
        let literal = encode_literal(&text, EncodingOptions::default().literal_max_len);
        prop_assert_eq!(decode(&literal), text);
    }

    #[test]
    fn chunks_rejoin_and_have_the_expected_count(
        text in "(?s).{0,300}",
        chunk_size in 1usize..64,
    ) {
        let chunks = split_into_chunks(&text, chunk_size);
        let len = text.chars().count();

        let expected = if len <= chunk_size { 1 } else { len.div_ceil(chunk_size) };
        prop_assert_eq!(chunks.len(), expected);

        let rendered: String = chunks.iter().map(decode).collect();
        prop_assert_eq!(&rendered, &text);
        prop_assert_eq!(join_chunks(&chunks), text);

        for chunk in &chunks[..chunks.len() - 1] {
            prop_assert_eq!(chunk.text().chars().count(), chunk_size);
        }
    }

    #[test]
    fn assigned_value_is_rebuilt_from_the_script(text in any::<String>(), chunk_size in 1usize..50) {
        let options = EncodingOptions { chunk_size, ..EncodingOptions::default() };
        let script = ScriptBuilder::new()
            .with_encoding(options)
            .tell("Adobe InDesign CC 2014")
            .assign("scriptArgs", &text)
            .run_payload("/tmp/p.jsx", &["scriptArgs"])
            .render();

        // Only ASCII and guillemets reach the interpreter.
        prop_assert!(mac_roman::encode(&script).is_ok());

        let call = parse_script(&script).expect("script parses");
        prop_assert_eq!(call.function.as_deref(), Some(text.as_str()));
    }

    #[test]
    fn scopes_close_in_reverse_order(seconds in 1u32..100_000, app in "[A-Za-z ]{1,30}") {
        let script = ScriptBuilder::new().tell(&app).timeout(seconds).render();
        let lines: Vec<&str> = script.lines().collect();
        prop_assert_eq!(lines.len(), 4);
        prop_assert_eq!(lines[2], "end timeout");
        prop_assert_eq!(lines[3], "end tell");
    }
}
