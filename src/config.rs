//! Compile-time configuration for the wrapper guard.
//!
//! Nothing here is read from disk or the environment: the allow-list is part
//! of the build.

/// Logical program names that count as an approved wrapper.
pub const DEFAULT_ALLOWED_BINARIES: &[&str] = &["aikido-pnpm", "sfw"];

/// Suffixes dropped from a basename before comparison (matched case-insensitively).
pub const SCRIPT_EXTENSIONS: &[&str] = &["exe", "cmd", "js", "cjs", "mjs"];

/// Runtime whose second argument is treated as the real program.
pub const NODE_INTERPRETER: &str = "node";

/// The POSIX walk stops once the current pid is at or below this value.
pub const POSIX_ROOT_PID: u32 = 1;

/// Backstop on walk steps. Parent cycles are caught separately by pid.
pub const MAX_WALK_DEPTH: usize = 4096;

/// Default tracing filter when neither `--log-level` nor `RUST_LOG` is set.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Approved invocation forms shown in the error banner.
pub const APPROVED_INVOCATIONS: &[&str] = &["aikido-pnpm install", "sfw pnpm install"];

pub const BANNER_HEADLINE: &str = "ERROR: Direct package manager usage is not allowed!";
pub const BANNER_HINT: &str = "Please use one of the following instead:";

/// Inner width of the banner box, in columns.
pub const BANNER_WIDTH: usize = 65;
