//! Process-wide log controls.
//!
//! The severity filter itself is the [`log`] crate's global
//! [`max_level`](log::max_level); this module adds the *quiet bifurcation*
//! switch on top of it. When the switch is on, entering a bifurcation drops
//! the level to [`LevelFilter::Off`] for the duration of the case split and
//! restores it afterwards, so the log describes the puzzle actually being
//! solved rather than every explored branch.
//!
//! Both pieces of state are process-wide. Saving and restoring the level is
//! not atomic with respect to other threads, so concurrent solves with quiet
//! bifurcation enabled will interleave their level changes; the engine is
//! single-threaded by design and this is accepted.

use std::sync::atomic::{AtomicBool, Ordering};

use log::LevelFilter;

static QUIET_BIFURCATION: AtomicBool = AtomicBool::new(false);

/// Enables or disables quiet bifurcation for the whole process.
pub fn set_quiet_bifurcation(on: bool) {
    QUIET_BIFURCATION.store(on, Ordering::Relaxed);
}

/// Returns whether quiet bifurcation is enabled.
#[must_use]
pub fn quiet_bifurcation() -> bool {
    QUIET_BIFURCATION.load(Ordering::Relaxed)
}

/// Silences the log for the lifetime of the returned guard if quiet
/// bifurcation is enabled; otherwise does nothing.
#[must_use]
pub fn quiet_scope() -> Option<QuietGuard> {
    quiet_bifurcation().then(|| {
        let saved = log::max_level();
        log::set_max_level(LevelFilter::Off);
        QuietGuard { saved }
    })
}

/// Restores the saved log level when dropped.
#[derive(Debug)]
pub struct QuietGuard {
    saved: LevelFilter,
}

impl Drop for QuietGuard {
    fn drop(&mut self) {
        log::set_max_level(self.saved);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_scope_saves_and_restores_level() {
        log::set_max_level(LevelFilter::Debug);

        set_quiet_bifurcation(false);
        assert!(quiet_scope().is_none());
        assert_eq!(log::max_level(), LevelFilter::Debug);

        set_quiet_bifurcation(true);
        {
            let guard = quiet_scope();
            assert!(guard.is_some());
            assert_eq!(log::max_level(), LevelFilter::Off);
        }
        assert_eq!(log::max_level(), LevelFilter::Debug);
        set_quiet_bifurcation(false);
    }
}
