// src/applescript/mod.rs

//! AppleScript synthesis.
//!
//! - [`encoder`] turns text into quoted or `«data utxt»` literals and splits
//!   long text into chunks.
//! - [`builder`] assembles the statements of a script with properly nested
//!   `tell` / `with timeout` blocks.
//! - [`mac_roman`] encodes the finished script for the interpreter's stdin.

pub mod builder;
pub mod encoder;
pub mod mac_roman;

pub use builder::{AssignValue, ScriptBuilder, ScriptStatement};
pub use encoder::{EncodedLiteral, EncodingOptions, encode_literal, split_into_chunks};
