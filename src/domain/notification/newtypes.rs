// SPDX-License-Identifier: MPL-2.0
//! Default auto-dismiss duration.

use crate::config::{DEFAULT_DURATION_MS, MAX_DEFAULT_DURATION_MS, MIN_DEFAULT_DURATION_MS};
use std::time::Duration;

/// Default auto-dismiss delay in milliseconds.
///
/// This newtype enforces validity at the type level, ensuring the value
/// is always within the valid range (1–60 seconds). A zero default would
/// silently make every toast persistent, so it is clamped like any other
/// out-of-range value.
///
/// # Example
///
/// ```
/// use toast_queue::domain::notification::DefaultDuration;
///
/// let duration = DefaultDuration::new(3000);
/// assert_eq!(duration.value(), 3000);
///
/// // Values outside range are clamped
/// assert_eq!(DefaultDuration::new(0).value(), 1000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultDuration(u64);

impl DefaultDuration {
    /// Creates a new default duration, clamping to valid range.
    #[must_use]
    pub fn new(millis: u64) -> Self {
        Self(millis.clamp(MIN_DEFAULT_DURATION_MS, MAX_DEFAULT_DURATION_MS))
    }

    /// Returns the value in milliseconds.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl Default for DefaultDuration {
    fn default() -> Self {
        Self(DEFAULT_DURATION_MS)
    }
}
