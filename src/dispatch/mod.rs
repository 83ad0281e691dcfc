// src/dispatch/mod.rs

//! The dispatcher that runs inside the target application.
//!
//! The real dispatcher is ExtendScript (`payload/dispatcher.jsx`, embedded
//! in [`crate::payload`]) and is loaded by every payload file. This module
//! implements the same contract natively so payload functions can be hosted
//! in Rust, which is how the bridge is exercised without an Adobe
//! application:
//!
//! - unknown primary function: fatal;
//! - `autoInit` / `autoExit`: run only when present;
//! - every log call is collected, in order, with its severity;
//! - the first error stops the pipeline (no `autoExit`) and becomes the
//!   envelope's exception;
//! - exactly one envelope per request.

pub mod dispatcher;
pub mod logger;

pub use dispatcher::{AUTO_EXIT, AUTO_INIT, DispatchStage, Dispatcher, ScriptFunction};
pub use logger::ScriptLogger;
