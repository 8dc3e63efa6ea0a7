//! Command line interface definition
//!
//! The guard takes no required arguments. Every flag is diagnostic.

use crate::report::ReportFormat;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = "pnpm-guard",
    version,
    about = "Exit non-zero unless an approved wrapper (aikido-pnpm, sfw) is an ancestor of this process"
)]
pub struct Cli {
    /// Print every ancestor with its resolved program name
    #[arg(long)]
    pub explain: bool,

    /// Format of the --explain report
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Tracing filter directive, overrides RUST_LOG (e.g. debug, pnpm_guard=trace)
    #[arg(long = "log-level", value_name = "FILTER")]
    pub log_level: Option<String>,

    /// Also append logs to this file
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,
}

impl Cli {
    pub fn parse_command() -> Self {
        Self::parse()
    }

    pub fn try_parse_command_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(args)
    }
}
