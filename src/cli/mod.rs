//! CLI module for askdata
//!
//! Handles command-line argument parsing and terminal output.

pub mod args;
pub mod render;

pub use args::{Args, Commands, ConfigCommand, QueryArgs, Verbosity};
pub use render::{render_fragment, render_object};
