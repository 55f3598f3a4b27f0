//! Process-wide identifier allocation
//!
//! Element ids must be unique across independent render calls (two
//! fragments may end up on the same page), so they come from a single
//! atomic counter rather than from session state.

use std::sync::atomic::{AtomicU64, Ordering};

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Prefix of every generated identifier.
pub const PREFIX: &str = "$repr$";

/// Next identifier, e.g. `$repr$0`, `$repr$1`, ...
pub fn next_id() -> String {
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{PREFIX}{n}")
}

/// Reset the counter to zero.
///
/// Only meant for tests that compare generated markup. Ids produced
/// before and after a reset may collide.
pub fn reset_for_testing() {
    COUNTER.store(0, Ordering::Relaxed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_distinct() {
        let a = next_id();
        let b = next_id();
        assert_ne!(a, b);
        assert!(a.starts_with(PREFIX));
        assert!(b.starts_with(PREFIX));
    }
}
