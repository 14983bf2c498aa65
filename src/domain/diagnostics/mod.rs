// SPDX-License-Identifier: MPL-2.0
//! Diagnostics domain types.
//!
//! This module provides pure domain types for diagnostics:
//! - [`BufferCapacity`]: Capacity for the lifecycle event log

mod newtypes;

pub use newtypes::BufferCapacity;
