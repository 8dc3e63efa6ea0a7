//! CLI commands

pub mod parser;

pub use parser::Cli;
