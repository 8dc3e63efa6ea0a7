//! Core guard logic
//!
//! Command line resolution, process tree walking and allow-list evaluation.

pub mod allow_list;
pub mod command_line;
pub mod models;
pub mod process_tree;
