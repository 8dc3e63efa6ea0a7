//! Allow-list evaluation over a walked ancestry

use crate::config::DEFAULT_ALLOWED_BINARIES;
use crate::core::command_line::binary_name_of;
use crate::core::models::{AncestorEntry, AncestryReport, AncestryWalk, Verdict};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// An ancestor that resolved to an approved wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapperMatch<'a> {
    pub name: String,
    pub command_line: &'a str,
}

/// Immutable set of logical program names that count as an approved wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    names: BTreeSet<String>,
}

impl Default for AllowList {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_BINARIES.iter().copied())
    }
}

impl AllowList {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// First command line whose logical program name is allowed.
    pub fn find_wrapper<'a, I>(&self, command_lines: I) -> Option<WrapperMatch<'a>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        command_lines.into_iter().find_map(|command_line| {
            let name = binary_name_of(command_line);
            debug!(%name, %command_line, "resolved ancestor");
            self.contains(&name).then(|| WrapperMatch { name, command_line })
        })
    }

    /// Whether any command line resolves to an allowed name.
    pub fn permits<'a, I>(&self, command_lines: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.find_wrapper(command_lines).is_some()
    }

    pub fn evaluate(&self, walk: &AncestryWalk) -> Verdict {
        let lines = walk.command_lines.iter().map(String::as_str);
        match self.find_wrapper(lines) {
            Some(found) => {
                info!(wrapper = %found.name, command_line = %found.command_line, "approved wrapper found");
                Verdict::Allowed {
                    wrapper: found.name,
                    command_line: found.command_line.to_string(),
                }
            }
            None => {
                info!(
                    ancestors = walk.depth(),
                    complete = walk.is_complete(),
                    "no approved wrapper in ancestry"
                );
                Verdict::Denied
            }
        }
    }

    /// Resolve every ancestor, for `--explain`.
    pub fn report(&self, walk: &AncestryWalk) -> AncestryReport {
        let ancestors = walk
            .command_lines
            .iter()
            .map(|command_line| {
                let binary_name = binary_name_of(command_line);
                AncestorEntry {
                    allowed: self.contains(&binary_name),
                    command_line: command_line.clone(),
                    binary_name,
                }
            })
            .collect();

        AncestryReport {
            ancestors,
            outcome: walk.outcome.clone(),
            verdict: self.evaluate(walk),
        }
    }
}
