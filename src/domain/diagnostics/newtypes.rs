// SPDX-License-Identifier: MPL-2.0
//! Diagnostics newtypes.

use crate::config::{
    DEFAULT_DIAGNOSTICS_CAPACITY, MAX_DIAGNOSTICS_CAPACITY, MIN_DIAGNOSTICS_CAPACITY,
};

/// Number of lifecycle events the diagnostics log retains.
///
/// Always within 16–4096; out-of-range values are clamped.
///
/// # Example
///
/// ```
/// use toast_queue::domain::diagnostics::BufferCapacity;
///
/// assert_eq!(BufferCapacity::new(100).value(), 100);
/// assert_eq!(BufferCapacity::new(1).value(), 16);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferCapacity(usize);

impl BufferCapacity {
    /// Creates a new buffer capacity, clamping to valid range.
    #[must_use]
    pub fn new(value: usize) -> Self {
        Self(value.clamp(MIN_DIAGNOSTICS_CAPACITY, MAX_DIAGNOSTICS_CAPACITY))
    }

    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }
}

impl Default for BufferCapacity {
    fn default() -> Self {
        Self(DEFAULT_DIAGNOSTICS_CAPACITY)
    }
}
