// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the crate. Constants are organized by category.
//!
//! # Categories
//!
//! - **Expiry**: Auto-dismiss duration applied when a caller gives none
//! - **Diagnostics**: Capacity of the lifecycle event log

// ==========================================================================
// Expiry Defaults
// ==========================================================================

/// Auto-dismiss duration used when `notify` is called without one.
pub const DEFAULT_DURATION_MS: u64 = 5000;

/// Shortest configurable default duration.
pub const MIN_DEFAULT_DURATION_MS: u64 = 1000;

/// Longest configurable default duration.
pub const MAX_DEFAULT_DURATION_MS: u64 = 60_000;

/// Duration value that disables auto-expiry for a single entry.
pub const PERSISTENT_DURATION_MS: u64 = 0;

// ==========================================================================
// Diagnostics Defaults
// ==========================================================================

/// Default number of lifecycle events kept in memory.
pub const DEFAULT_DIAGNOSTICS_CAPACITY: usize = 256;

/// Minimum lifecycle event log capacity.
pub const MIN_DIAGNOSTICS_CAPACITY: usize = 16;

/// Maximum lifecycle event log capacity.
pub const MAX_DIAGNOSTICS_CAPACITY: usize = 4096;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(MIN_DEFAULT_DURATION_MS > PERSISTENT_DURATION_MS);
    assert!(MAX_DEFAULT_DURATION_MS >= MIN_DEFAULT_DURATION_MS);
    assert!(DEFAULT_DURATION_MS >= MIN_DEFAULT_DURATION_MS);
    assert!(DEFAULT_DURATION_MS <= MAX_DEFAULT_DURATION_MS);

    assert!(MIN_DIAGNOSTICS_CAPACITY > 0);
    assert!(MAX_DIAGNOSTICS_CAPACITY >= MIN_DIAGNOSTICS_CAPACITY);
    assert!(DEFAULT_DIAGNOSTICS_CAPACITY >= MIN_DIAGNOSTICS_CAPACITY);
    assert!(DEFAULT_DIAGNOSTICS_CAPACITY <= MAX_DIAGNOSTICS_CAPACITY);
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_defaults_are_valid() {
        assert_eq!(DEFAULT_DURATION_MS, 5000);
        assert!(DEFAULT_DURATION_MS >= MIN_DEFAULT_DURATION_MS);
        assert!(DEFAULT_DURATION_MS <= MAX_DEFAULT_DURATION_MS);
    }

    #[test]
    fn persistent_marker_is_zero() {
        assert_eq!(PERSISTENT_DURATION_MS, 0);
    }

    #[test]
    fn diagnostics_defaults_are_valid() {
        assert_eq!(DEFAULT_DIAGNOSTICS_CAPACITY, 256);
        assert!(DEFAULT_DIAGNOSTICS_CAPACITY >= MIN_DIAGNOSTICS_CAPACITY);
        assert!(DEFAULT_DIAGNOSTICS_CAPACITY <= MAX_DIAGNOSTICS_CAPACITY);
    }
}
