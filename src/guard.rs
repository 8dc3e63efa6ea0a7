//! Ties the walker and the allow-list together

use crate::core::allow_list::AllowList;
use crate::core::models::{AncestryReport, AncestryWalk, Verdict};
use crate::core::process_tree::ProcessTreeWalker;
use crate::platform::current_walker;
use tracing::debug;

pub struct Guard {
    walker: Box<dyn ProcessTreeWalker>,
    allow_list: AllowList,
}

impl Guard {
    pub fn new(walker: Box<dyn ProcessTreeWalker>, allow_list: AllowList) -> Self {
        Self { walker, allow_list }
    }

    /// Platform walker with the built-in allow-list.
    pub fn for_current_platform() -> Self {
        Self::new(current_walker(), AllowList::default())
    }

    pub fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    pub fn walk_from(&self, pid: u32) -> AncestryWalk {
        debug!(walker = self.walker.name(), pid, "walking process tree");
        self.walker.walk(pid)
    }

    pub fn check_from(&self, pid: u32) -> Verdict {
        self.allow_list.evaluate(&self.walk_from(pid))
    }

    /// Verdict for the running process.
    pub fn check(&self) -> Verdict {
        self.check_from(std::process::id())
    }

    /// Full per-ancestor report for the running process.
    pub fn explain(&self) -> AncestryReport {
        self.allow_list.report(&self.walk_from(std::process::id()))
    }
}
