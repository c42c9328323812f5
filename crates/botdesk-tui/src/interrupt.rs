//! Ctrl+C handling outside the key loop.
//!
//! In raw mode Ctrl+C arrives as a key event, so the signal handler only
//! fires before the terminal is set up or when the loop is stuck. A second
//! signal restores the terminal and exits.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);
static INSTALLED: AtomicBool = AtomicBool::new(false);
static RESTORE_HOOK: OnceLock<Box<dyn Fn() + Send + Sync>> = OnceLock::new();

/// Exit status used when a second Ctrl+C forces the process down.
pub const FORCED_EXIT_CODE: i32 = 130;

/// Installs the Ctrl+C handler once per process.
///
/// # Errors
/// Returns an error if the handler cannot be registered.
pub fn init() -> Result<()> {
    if INSTALLED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }
    ctrlc::set_handler(trigger_ctrl_c).context("Failed to set Ctrl+C handler")
}

fn trigger_ctrl_c() {
    if INTERRUPTED.swap(true, Ordering::SeqCst) {
        // process::exit skips Drop, so the terminal is restored here.
        if let Some(hook) = RESTORE_HOOK.get() {
            hook();
        }
        std::process::exit(FORCED_EXIT_CODE);
    }
}

pub fn is_interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

pub fn reset() {
    INTERRUPTED.store(false, Ordering::SeqCst);
}

/// Registers the hook run on the second Ctrl+C before exiting.
pub fn set_restore_hook<F>(hook: F)
where
    F: Fn() + Send + Sync + 'static,
{
    let _ = RESTORE_HOOK.set(Box::new(hook));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_interrupt_only_sets_flag() {
        reset();
        assert!(!is_interrupted());
        trigger_ctrl_c();
        assert!(is_interrupted());
        reset();
        assert!(!is_interrupted());
    }
}
