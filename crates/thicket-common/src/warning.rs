//! Parser warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Used by the DOM, tokenizer, tree constructor and parse driver to report
//! aborted parses, lifecycle misuse and unsupported fragment contexts.
//! Ordinary parse errors are not warnings; they are collected as data.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// When false, warnings are still recorded for deduplication but not printed.
static ENABLED: AtomicBool = AtomicBool::new(true);

/// Warn about a noteworthy condition (prints once per unique message)
///
/// Returns `true` if this is the first time the message was seen.
///
/// # Example
/// ```
/// use thicket_common::warning::{clear_warnings, set_warnings_enabled, warn_once};
///
/// set_warnings_enabled(false);
/// assert!(warn_once("Driver", "chunk() called before begin()"));
/// assert!(!warn_once("Driver", "chunk() called before begin()"));
/// clear_warnings();
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let first_time = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if first_time && ENABLED.load(Ordering::Relaxed) {
        eprintln!(
            "{}",
            format!("[Thicket {component}] ⚠ {message}").yellow()
        );
    }
    first_time
}

/// Turn printing of warnings on or off (deduplication still applies).
pub fn set_warnings_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

/// Clear all recorded warnings (call when starting an unrelated parse)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
