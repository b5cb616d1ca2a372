//! Panic hook that restores the terminal before the report is printed.

use super::setup::emergency_restore;
use std::panic;

/// Chain a terminal restore in front of the current panic hook.
///
/// Call after `color_eyre::install()` so its report still prints, and before
/// creating the [`TerminalManager`](super::TerminalManager).
pub fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        emergency_restore();
        original_hook(panic_info);
    }));
}
