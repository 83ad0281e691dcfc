// src/types.rs

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// How the synthesized AppleScript hands control to the payload file.
///
/// - `DoScript`: `do script (POSIX file "...") language javascript ...`,
///   understood by InDesign.
/// - `EvalFile`: `do javascript "$.evalFile('...')" ...`, for applications
///   that only expose `do javascript` (Illustrator, Photoshop).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationStyle {
    DoScript,
    EvalFile,
}

impl InvocationStyle {
    /// Pick the style an application supports, keyed off its name.
    pub fn for_application(name: &str) -> Self {
        if name.contains("InDesign") {
            InvocationStyle::DoScript
        } else {
            InvocationStyle::EvalFile
        }
    }
}

impl Default for InvocationStyle {
    fn default() -> Self {
        InvocationStyle::EvalFile
    }
}

impl FromStr for InvocationStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "do_script" => Ok(InvocationStyle::DoScript),
            "eval_file" => Ok(InvocationStyle::EvalFile),
            other => Err(format!(
                "invalid invocation style: {other} (expected \"do_script\" or \"eval_file\")"
            )),
        }
    }
}

/// Where the dispatcher sends log calls made by payload functions.
///
/// The mode travels to the dispatcher as a plain marker string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogMode {
    /// Collect entries into the response envelope's `log` array.
    Array,
    /// Drop log calls.
    Discard,
}

impl LogMode {
    pub fn marker(self) -> &'static str {
        match self {
            LogMode::Array => "array",
            LogMode::Discard => "none",
        }
    }
}

impl Default for LogMode {
    fn default() -> Self {
        LogMode::Array
    }
}

impl FromStr for LogMode {
    type Err = String;

    /// Anything other than `"array"` discards, matching the dispatcher.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "array" => Ok(LogMode::Array),
            _ => Ok(LogMode::Discard),
        }
    }
}

impl fmt::Display for LogMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indesign_uses_do_script() {
        assert_eq!(
            InvocationStyle::for_application("Adobe InDesign CC 2014"),
            InvocationStyle::DoScript
        );
        assert_eq!(
            InvocationStyle::for_application("Adobe Illustrator"),
            InvocationStyle::EvalFile
        );
    }

    #[test]
    fn invocation_style_parses_both_spellings() {
        assert_eq!("eval-file".parse(), Ok(InvocationStyle::EvalFile));
        assert_eq!("DO_SCRIPT".parse(), Ok(InvocationStyle::DoScript));
        assert!("run".parse::<InvocationStyle>().is_err());
    }

    #[test]
    fn unknown_log_marker_discards() {
        assert_eq!("array".parse(), Ok(LogMode::Array));
        assert_eq!("file".parse(), Ok(LogMode::Discard));
    }
}
