#![forbid(unsafe_code)]

//! Headless driver for the rpart partition editor.
//!
//! Replays JSON event scripts against an [`rpart_tree::Editor`], renders tree
//! snapshots as text, and evaluates snap policies. Logs go to stderr through
//! `tracing-subscriber`; command output goes to stdout.

pub mod cli;
pub mod error;
pub mod render;
pub mod script;
pub mod settings;

pub use cli::run_from_env;
pub use error::{CliError, Result};
