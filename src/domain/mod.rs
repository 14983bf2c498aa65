// SPDX-License-Identifier: MPL-2.0
//! Domain layer - validated value types shared by the queue and its config.
//!
//! # Modules
//!
//! - [`diagnostics`]: Diagnostics types ([`BufferCapacity`](diagnostics::BufferCapacity))
//! - [`notification`]: Notification types ([`DefaultDuration`](notification::DefaultDuration))

pub mod diagnostics;
pub mod notification;
