//! pnpm-guard library
//!
//! Walks the process tree of the current process and decides whether an
//! approved package-manager wrapper is among its ancestors.

pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod guard;
pub mod platform;
pub mod report;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::allow_list::AllowList;
pub use crate::core::command_line::{binary_name_of, extract_binary_name, tokenize};
pub use crate::core::models::*;
pub use crate::core::process_tree::{
    CommandRunner, PosixWalker, ProcessTreeError, ProcessTreeWalker, WindowsWalker,
};
pub use error::{GuardError, GuardResult};
pub use guard::Guard;
