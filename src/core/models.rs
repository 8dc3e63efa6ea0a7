//! Data models shared by the walker, the evaluator and the reporter

use crate::core::process_tree::ProcessTreeError;
use serde::Serialize;

/// One inspection step: what the OS tool reported for a single pid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessRecord {
    pub parent_pid: u32,
    pub command_line: String,
}

impl ProcessRecord {
    pub fn new(parent_pid: u32, command_line: impl Into<String>) -> Self {
        Self {
            parent_pid,
            command_line: command_line.into(),
        }
    }
}

/// How a walk ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WalkOutcome {
    /// The root of the tree was reached.
    Completed,
    /// Inspection of `pid` failed; everything collected before it is kept.
    Interrupted { pid: u32, reason: ProcessTreeError },
}

/// Result of walking from the current process towards the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AncestryWalk {
    /// Raw command lines, current process first, oldest ancestor last.
    pub command_lines: Vec<String>,
    pub outcome: WalkOutcome,
}

impl AncestryWalk {
    pub fn completed(command_lines: Vec<String>) -> Self {
        Self {
            command_lines,
            outcome: WalkOutcome::Completed,
        }
    }

    pub fn interrupted(command_lines: Vec<String>, pid: u32, reason: ProcessTreeError) -> Self {
        Self {
            command_lines,
            outcome: WalkOutcome::Interrupted { pid, reason },
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.outcome, WalkOutcome::Completed)
    }

    pub fn depth(&self) -> usize {
        self.command_lines.len()
    }
}

/// Decision for one run of the guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// An ancestor resolved to an allow-listed name.
    Allowed { wrapper: String, command_line: String },
    Denied,
}

impl Verdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Verdict::Allowed { .. })
    }

    /// Process exit status for this verdict.
    pub fn exit_status(&self) -> u8 {
        match self {
            Verdict::Allowed { .. } => 0,
            Verdict::Denied => 1,
        }
    }
}

/// One line of the `--explain` report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AncestorEntry {
    pub command_line: String,
    pub binary_name: String,
    pub allowed: bool,
}

/// Everything `--explain` shows about a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AncestryReport {
    pub ancestors: Vec<AncestorEntry>,
    pub outcome: WalkOutcome,
    #[serde(flatten)]
    pub verdict: Verdict,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_maps_to_exit_status() {
        let allowed = Verdict::Allowed {
            wrapper: "sfw".to_string(),
            command_line: "sfw pnpm install".to_string(),
        };
        assert!(allowed.is_allowed());
        assert_eq!(allowed.exit_status(), 0);
        assert!(!Verdict::Denied.is_allowed());
        assert_eq!(Verdict::Denied.exit_status(), 1);
    }

    #[test]
    fn walk_constructors_set_outcome() {
        let walk = AncestryWalk::completed(vec!["bash".to_string()]);
        assert!(walk.is_complete());
        assert_eq!(walk.depth(), 1);

        let walk = AncestryWalk::interrupted(
            Vec::new(),
            42,
            ProcessTreeError::ProcessNotFound { pid: 42 },
        );
        assert!(!walk.is_complete());
        assert_eq!(walk.depth(), 0);
    }

    #[test]
    fn verdict_serializes_with_tag() {
        let json = serde_json::to_value(Verdict::Denied).unwrap();
        assert_eq!(json, serde_json::json!({ "verdict": "denied" }));
    }
}
