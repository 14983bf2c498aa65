// SPDX-License-Identifier: MPL-2.0
//! `toast_queue` is the notification layer of a marketing dashboard.
//!
//! It keeps an ordered queue of toast notifications, expires them on
//! per-entry timers, and lets render surfaces subscribe to the queue.

pub mod config;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod notifications;
