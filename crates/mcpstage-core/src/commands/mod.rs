//! High-level commands for mcpstage operations.
//!
//! These are the entry points frontends call; they tie the config, merge,
//! script, and proxy modules together.

pub mod compile;

pub use compile::{CompileCommand, compile_config};
