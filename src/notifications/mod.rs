// SPDX-License-Identifier: MPL-2.0
//! Toast notification queue for user feedback.
//!
//! Screens report the outcome of an operation (platform connected, upload
//! failed, draft saved) through a shared [`Dispatcher`]. Entries sit in an
//! ordered queue until their expiry timer fires, the user dismisses them, or
//! the queue is cleared.
//!
//! # Components
//!
//! - [`notification`] - Immutable `Notification` entry, `Kind`, `NotifyOptions`
//! - [`store`] - Ordered `Store` with add / remove / clear and listeners
//! - [`expiry`] - `ExpiryScheduler`, one cancellable tokio timer per entry
//! - [`dispatcher`] - `Dispatcher`, the public API tying them together
//!
//! # Usage
//!
//! ```no_run
//! use toast_queue::notifications::{Dispatcher, NotifyOptions};
//!
//! # async fn run() -> toast_queue::error::Result<()> {
//! let toasts = Dispatcher::create()?;
//! let _surface = toasts.subscribe(|entries| println!("{} active", entries.len()));
//!
//! let id = toasts.error("Invalid credentials", NotifyOptions::new().persistent());
//! toasts.dismiss(id);
//! toasts.shutdown();
//! # Ok(())
//! # }
//! ```
//!
//! # Expiry
//!
//! - No duration given: the dispatcher default applies (5 s unless configured)
//! - Duration `0`: the entry stays until dismissed or cleared
//! - Any other duration: removed once it elapses, unless dismissed first

pub mod dispatcher;
pub mod expiry;
pub mod notification;
pub mod store;

pub use dispatcher::{Dispatcher, Subscription};
pub use notification::{Action, Expiry, Kind, Notification, NotificationId, NotifyOptions};
pub use store::{Publication, Store};
