#![allow(dead_code)]

use adobe_bridge::Application;
use adobe_bridge::payload::BRIDGE_TEST;
use adobe_bridge_test_utils::FakeInterpreter;

pub const INDESIGN: &str = "Adobe InDesign CC 2014";
pub const ILLUSTRATOR: &str = "Adobe Illustrator";

/// InDesign running `bridge_test.jsx` through `fake`, staged in a fresh
/// temporary directory per call.
pub fn indesign(fake: &FakeInterpreter) -> Application<FakeInterpreter> {
    Application::new(INDESIGN)
        .payload(BRIDGE_TEST)
        .runner(fake.clone())
}

/// A string of `len` characters mixing ASCII, escapes, accents, CJK and
/// characters outside the Basic Multilingual Plane.
pub fn mixed_text(len: usize) -> String {
    const PIECES: &[char] = &['a', 'Z', '7', ' ', '"', '\\', '\n', 'é', 'ß', '€', '漢', '字', '😀', '\u{7f}'];
    PIECES.iter().cycle().take(len).collect()
}
