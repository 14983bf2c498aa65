// SPDX-License-Identifier: MPL-2.0
//! Notification domain types.
//!
//! - [`DefaultDuration`]: Auto-dismiss delay applied when an entry sets none

mod newtypes;

pub use newtypes::DefaultDuration;
