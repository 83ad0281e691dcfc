// src/payload/mod.rs

//! Payload scripts and where they are staged.
//!
//! - [`collection`] gathers scripts by name: the embedded dispatcher and
//!   test payload, plus any directory of `.jsx` files.
//! - [`staging`] writes a collection into the directory the target
//!   application loads files from.

pub mod collection;
pub mod staging;

pub use collection::{BRIDGE_TEST, DISPATCHER, ScriptCollection};
pub use staging::ScriptDir;
