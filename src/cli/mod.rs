//! CLI module containing argument parsing and demo script handling

pub mod args;
pub mod script;

pub use args::Args;
pub use script::{ScriptError, Step};
