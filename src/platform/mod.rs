//! Platform selection for process tree inspection

use crate::core::process_tree::{
    PosixWalker, ProcessTreeWalker, SystemCommandRunner, WindowsWalker,
};

/// Walker for the platform this binary was built for.
pub fn current_walker() -> Box<dyn ProcessTreeWalker> {
    if cfg!(windows) {
        Box::new(WindowsWalker::<SystemCommandRunner>::default())
    } else {
        Box::new(PosixWalker::<SystemCommandRunner>::default())
    }
}
