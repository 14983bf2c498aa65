// SPDX-License-Identifier: MPL-2.0
//! Notification lifecycle management.
//!
//! The `Dispatcher` is the one entry point screens use to report outcomes.
//! It owns the [`Store`] and the [`ExpiryScheduler`] behind a single lock, so
//! an expiry firing and a dismiss arriving at the same moment are serialized
//! and exactly one of them removes the entry.
//!
//! Every transition finishes its bookkeeping (store, timer, diagnostics)
//! under the lock and only then hands a [`Publication`] to the listeners,
//! with the lock released. Listeners may therefore call back into the
//! dispatcher, and a panicking listener cannot leave an entry without its
//! timer.

use super::expiry::{ExpiryScheduler, Generation};
use super::notification::{Expiry, Kind, Notification, NotificationId, NotifyOptions};
use super::store::{ListenerId, Publication, Store};
use crate::config::DispatcherSettings;
use crate::diagnostics::{DiagnosticsHandle, LifecycleEvent};
use crate::error::{Error, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::runtime::Handle;

#[derive(Debug)]
struct State {
    store: Store,
    timers: ExpiryScheduler,
    diagnostics: Option<DiagnosticsHandle>,
    shut_down: bool,
}

impl State {
    fn record(&self, event: LifecycleEvent) {
        if let Some(handle) = &self.diagnostics {
            handle.record(event);
        }
    }
}

#[derive(Debug)]
struct Inner {
    state: Mutex<State>,
    settings: DispatcherSettings,
    /// Highest store revision handed to listeners so far.
    delivered: AtomicU64,
}

/// Shared handle to the application's notification queue.
///
/// Cloning is cheap; every clone drives the same queue. Create one per
/// running application with [`Dispatcher::create`] and call
/// [`Dispatcher::shutdown`] on the way out.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    inner: Arc<Inner>,
}

impl Dispatcher {
    /// Creates a dispatcher with the default settings (5 s auto-dismiss).
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRuntime`] when called outside a tokio runtime.
    pub fn create() -> Result<Self> {
        Self::with_settings(DispatcherSettings::default())
    }

    /// Creates a dispatcher whose timers run on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRuntime`] when called outside a tokio runtime.
    pub fn with_settings(settings: DispatcherSettings) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| Error::NoRuntime)?;
        let state = State {
            store: Store::new(),
            timers: ExpiryScheduler::new(runtime),
            diagnostics: None,
            shut_down: false,
        };
        Ok(Self {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                settings,
                delivered: AtomicU64::new(0),
            }),
        })
    }

    /// Attaches a diagnostics log that records every lifecycle transition.
    pub fn set_diagnostics(&self, handle: DiagnosticsHandle) {
        self.lock().diagnostics = Some(handle);
    }

    #[must_use]
    pub fn settings(&self) -> DispatcherSettings {
        self.inner.settings
    }

    /// Enqueues a notification and returns its id.
    ///
    /// Unless the resolved duration is zero, an expiry timer is started that
    /// removes the entry when it elapses. After [`shutdown`](Self::shutdown)
    /// the call is ignored and the returned id never becomes active.
    pub fn notify(
        &self,
        kind: Kind,
        message: impl Into<String>,
        options: NotifyOptions,
    ) -> NotificationId {
        let default = self.inner.settings.default_duration;
        let entry = Notification::new(kind, message, options, default);
        let id = entry.id();
        let expiry = entry.expiry();

        let mut state = self.lock();
        if state.shut_down {
            tracing::debug!(%id, %kind, "notify after shutdown ignored");
            return id;
        }

        if let Err(err) = state.store.add(entry) {
            tracing::warn!(%id, %err, "notification rejected");
            state.record(LifecycleEvent::DuplicateRejected { id });
            return id;
        }

        let duration_ms = expiry
            .duration()
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));
        tracing::debug!(%id, %kind, ?duration_ms, "notification enqueued");
        state.record(LifecycleEvent::Enqueued {
            id,
            kind,
            duration_ms,
        });

        if let Expiry::After(after) = expiry {
            let weak = Arc::downgrade(&self.inner);
            state
                .timers
                .schedule(id, after, move |generation| expire(&weak, id, generation));
        }

        let publication = state.store.publication();
        drop(state);
        publish(&self.inner, publication);
        id
    }

    pub fn success(&self, message: impl Into<String>, options: NotifyOptions) -> NotificationId {
        self.notify(Kind::Success, message, options)
    }

    pub fn error(&self, message: impl Into<String>, options: NotifyOptions) -> NotificationId {
        self.notify(Kind::Error, message, options)
    }

    pub fn warning(&self, message: impl Into<String>, options: NotifyOptions) -> NotificationId {
        self.notify(Kind::Warning, message, options)
    }

    pub fn info(&self, message: impl Into<String>, options: NotifyOptions) -> NotificationId {
        self.notify(Kind::Info, message, options)
    }

    /// Removes a notification early and cancels its timer.
    ///
    /// Unknown or already removed ids are ignored.
    pub fn dismiss(&self, id: NotificationId) {
        let mut state = self.lock();
        state.timers.cancel(id);
        if state.store.remove_by_id(id).is_none() {
            tracing::trace!(%id, "dismiss of inactive notification ignored");
            return;
        }
        tracing::debug!(%id, "notification dismissed");
        state.record(LifecycleEvent::Dismissed { id });

        let publication = state.store.publication();
        drop(state);
        publish(&self.inner, publication);
    }

    /// Removes every notification and cancels all pending timers.
    pub fn clear_all(&self) {
        let mut state = self.lock();
        let publication = clear_locked(&mut state);
        drop(state);
        if let Some(publication) = publication {
            publish(&self.inner, publication);
        }
    }

    /// Clears the queue and stops accepting new notifications. Idempotent.
    pub fn shutdown(&self) {
        let mut state = self.lock();
        if state.shut_down {
            return;
        }
        let publication = clear_locked(&mut state);
        state.shut_down = true;
        drop(state);
        tracing::debug!("notification dispatcher shut down");
        if let Some(publication) = publication {
            publish(&self.inner, publication);
        }
    }

    /// Registers a render surface.
    ///
    /// The listener is called with the active entries, oldest first, after
    /// every change to the queue. It runs after the queue lock is released,
    /// so it may dismiss or enqueue entries itself. When a listener changes
    /// the queue, the newer frame replaces the one still being delivered:
    /// later listeners skip the stale frame and only see the newer one.
    #[must_use = "dropping the subscription unsubscribes the listener"]
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&[Notification]) + Send + Sync + 'static,
    {
        let id = self.lock().store.subscribe(Arc::new(listener));
        Subscription {
            dispatcher: Arc::downgrade(&self.inner),
            id: Some(id),
        }
    }

    /// Returns the active entries, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Notification> {
        self.lock().store.entries().to_vec()
    }

    #[must_use]
    pub fn contains(&self, id: NotificationId) -> bool {
        self.lock().store.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().store.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().store.is_empty()
    }

    /// Number of expiry timers still waiting to fire.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.lock().timers.len()
    }

    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.lock().shut_down
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        lock_state(&self.inner)
    }
}

fn lock_state(inner: &Inner) -> MutexGuard<'_, State> {
    inner.state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Returns the frame to publish, or `None` when the queue was already empty.
fn clear_locked(state: &mut State) -> Option<Publication> {
    let cancelled = state.timers.cancel_all();
    let count = state.store.clear_all();
    if count == 0 && cancelled == 0 {
        tracing::trace!("clear of empty queue ignored");
        return None;
    }
    tracing::debug!(count, cancelled, "notifications cleared");
    state.record(LifecycleEvent::Cleared { count });
    (count > 0).then(|| state.store.publication())
}

/// Hands a frame to the listeners. Must be called without the state lock.
///
/// Frames older than one already delivered are dropped, and a frame stops
/// mid-delivery as soon as a newer one has started.
fn publish(inner: &Inner, publication: Publication) {
    let revision = publication.revision();
    if inner.delivered.fetch_max(revision, Ordering::AcqRel) >= revision {
        tracing::trace!(revision, "superseded frame dropped");
        return;
    }
    publication.deliver_while(|| inner.delivered.load(Ordering::Acquire) <= revision);
}

/// Timer callback. Holds only the id and a weak reference, so a pending timer
/// never keeps the dispatcher alive.
fn expire(inner: &Weak<Inner>, id: NotificationId, generation: Generation) {
    let Some(inner) = inner.upgrade() else {
        return;
    };
    let mut state = lock_state(&inner);
    if !state.timers.settle(id, generation) {
        tracing::trace!(%id, ?generation, "stale expiry ignored");
        return;
    }
    if state.store.remove_by_id(id).is_none() {
        return;
    }
    tracing::debug!(%id, "notification expired");
    state.record(LifecycleEvent::Expired { id });

    let publication = state.store.publication();
    drop(state);
    publish(&inner, publication);
}

/// Keeps a listener registered. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    dispatcher: Weak<Inner>,
    id: Option<ListenerId>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.detach_listener();
    }

    fn detach_listener(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };
        if let Some(inner) = self.dispatcher.upgrade() {
            lock_state(&inner).store.unsubscribe(id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach_listener();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::diagnostics::BufferCapacity;
    use crate::notifications::Action;
    use std::collections::{HashMap, HashSet};
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::atomic::AtomicBool;
    use std::time::Duration;
    use tokio::time::sleep;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn with_diagnostics() -> (Dispatcher, DiagnosticsHandle) {
        let dispatcher = Dispatcher::create().expect("runtime available");
        let diagnostics = DiagnosticsHandle::default();
        dispatcher.set_diagnostics(diagnostics.clone());
        (dispatcher, diagnostics)
    }

    fn expired_count(diagnostics: &DiagnosticsHandle) -> usize {
        diagnostics
            .events()
            .iter()
            .filter(|e| matches!(e.event, LifecycleEvent::Expired { .. }))
            .count()
    }

    #[test]
    fn create_outside_runtime_fails() {
        assert_eq!(Dispatcher::create().unwrap_err(), Error::NoRuntime);
    }

    #[tokio::test(start_paused = true)]
    async fn success_expires_after_default_duration() {
        let dispatcher = Dispatcher::create().unwrap();
        let id = dispatcher.success("Platform connected", NotifyOptions::new());

        let entries = dispatcher.snapshot();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id(), id);
        assert_eq!(entries[0].kind(), Kind::Success);

        sleep(ms(4999)).await;
        assert!(dispatcher.contains(id));

        sleep(ms(2)).await;
        assert!(dispatcher.is_empty());
        assert_eq!(dispatcher.pending_timers(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn persistent_entry_stays_until_dismissed() {
        let dispatcher = Dispatcher::create().unwrap();
        let id = dispatcher.error("Invalid credentials", NotifyOptions::new().persistent());
        assert_eq!(dispatcher.pending_timers(), 0);

        sleep(ms(100)).await;
        assert!(dispatcher.contains(id));
        dispatcher.dismiss(id);
        assert!(dispatcher.is_empty());

        let kept = dispatcher.error("Invalid credentials", NotifyOptions::new().persistent());
        sleep(Duration::from_secs(3600)).await;
        assert!(dispatcher.contains(kept));
    }

    #[tokio::test(start_paused = true)]
    async fn early_dismiss_defuses_expiry() {
        let (dispatcher, diagnostics) = with_diagnostics();
        let id = dispatcher.notify(
            Kind::Warning,
            "Rate limit near",
            NotifyOptions::new().with_duration_ms(2000),
        );

        sleep(ms(500)).await;
        dispatcher.dismiss(id);
        assert!(dispatcher.is_empty());
        assert_eq!(dispatcher.pending_timers(), 0);

        let later = dispatcher.info("Queued later", NotifyOptions::new().persistent());
        sleep(ms(2000)).await;

        assert!(dispatcher.contains(later));
        assert_eq!(expired_count(&diagnostics), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_all_empties_queue_in_call_order() {
        let (dispatcher, diagnostics) = with_diagnostics();
        let ids: Vec<_> = ["one", "two", "three"]
            .into_iter()
            .map(|m| dispatcher.success(m, NotifyOptions::new()))
            .collect();

        let order: Vec<_> = dispatcher.snapshot().iter().map(Notification::id).collect();
        assert_eq!(order, ids);

        dispatcher.clear_all();
        assert!(dispatcher.is_empty());
        assert_eq!(dispatcher.pending_timers(), 0);

        sleep(Duration::from_secs(10)).await;
        assert_eq!(expired_count(&diagnostics), 0);
        assert!(diagnostics
            .events()
            .iter()
            .any(|e| e.event == LifecycleEvent::Cleared { count: 3 }));
    }

    #[tokio::test(start_paused = true)]
    async fn double_dismiss_is_a_no_op() {
        let (dispatcher, diagnostics) = with_diagnostics();
        let keep = dispatcher.info("keep", NotifyOptions::new());
        let id = dispatcher.info("drop", NotifyOptions::new());

        dispatcher.dismiss(id);
        let after_first = diagnostics.len();
        dispatcher.dismiss(id);
        dispatcher.dismiss(NotificationId::from_raw(u64::MAX));

        assert_eq!(diagnostics.len(), after_first);
        assert_eq!(dispatcher.len(), 1);
        assert!(dispatcher.contains(keep));
    }

    #[tokio::test(start_paused = true)]
    async fn ids_are_unique_across_calls() {
        let dispatcher = Dispatcher::create().unwrap();
        let ids: HashSet<_> = (0..50)
            .map(|i| dispatcher.info(format!("n-{i}"), NotifyOptions::new()))
            .collect();
        assert_eq!(ids.len(), 50);
        assert_eq!(dispatcher.len(), 50);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_generation_does_not_remove_entry() {
        let dispatcher = Dispatcher::create().unwrap();
        let id = dispatcher.info("still here", NotifyOptions::new());

        expire(&Arc::downgrade(&dispatcher.inner), id, Generation::stale());

        assert!(dispatcher.contains(id));
        assert_eq!(dispatcher.pending_timers(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn listeners_follow_the_queue() {
        let dispatcher = Dispatcher::create().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let subscription = dispatcher.subscribe(move |entries| {
            sink.lock().unwrap().push(entries.len());
        });

        dispatcher.success("a", NotifyOptions::new().with_duration_ms(100));
        dispatcher.success("b", NotifyOptions::new().persistent());
        sleep(ms(150)).await;
        dispatcher.clear_all();

        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 1, 0]);

        subscription.unsubscribe();
        dispatcher.success("c", NotifyOptions::new());
        assert_eq!(seen.lock().unwrap().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_timers_and_ignores_new_entries() {
        let (dispatcher, diagnostics) = with_diagnostics();
        dispatcher.success("pending", NotifyOptions::new());

        dispatcher.shutdown();
        dispatcher.shutdown();
        assert!(dispatcher.is_shut_down());
        assert_eq!(dispatcher.pending_timers(), 0);

        let id = dispatcher.success("too late", NotifyOptions::new());
        assert!(!dispatcher.contains(id));

        sleep(Duration::from_secs(10)).await;
        assert_eq!(expired_count(&diagnostics), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_dispatcher_leaves_no_live_timers() {
        let diagnostics = DiagnosticsHandle::default();
        {
            let dispatcher = Dispatcher::create().unwrap();
            dispatcher.set_diagnostics(diagnostics.clone());
            dispatcher.success("orphan", NotifyOptions::new());
        }

        sleep(Duration::from_secs(10)).await;
        assert_eq!(expired_count(&diagnostics), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn entries_keep_title_and_action() {
        let dispatcher = Dispatcher::create().unwrap();
        dispatcher.error(
            "Upload failed",
            NotifyOptions::new()
                .with_title("Media library")
                .with_action(Action::new("Retry", || {})),
        );

        let entry = &dispatcher.snapshot()[0];
        assert_eq!(entry.title(), Some("Media library"));
        assert_eq!(entry.action().map(Action::label), Some("Retry"));
    }

    #[tokio::test(start_paused = true)]
    async fn custom_default_duration_is_applied() {
        let dispatcher = Dispatcher::with_settings(DispatcherSettings {
            default_duration: ms(1000),
        })
        .unwrap();
        dispatcher.success("quick", NotifyOptions::new());

        sleep(ms(1001)).await;
        assert!(dispatcher.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn listener_may_dismiss_from_inside_a_frame() {
        let dispatcher = Dispatcher::create().unwrap();
        let remote = dispatcher.clone();
        let _trimmer = dispatcher.subscribe(move |entries| {
            if entries.len() > 1 {
                remote.dismiss(entries[0].id());
            }
        });
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _counter = dispatcher.subscribe(move |entries| {
            sink.lock().unwrap().push(entries.len());
        });

        dispatcher.info("first", NotifyOptions::new());
        let second = dispatcher.info("second", NotifyOptions::new());

        let ids: Vec<_> = dispatcher.snapshot().iter().map(Notification::id).collect();
        assert_eq!(ids, vec![second]);
        assert_eq!(seen.lock().unwrap().last(), Some(&1));
        assert!(seen.lock().unwrap().iter().all(|&len| len <= 1));
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_listener_does_not_strand_the_entry() {
        let dispatcher = Dispatcher::create().unwrap();
        let tripped = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&tripped);
        let _faulty = dispatcher.subscribe(move |_| {
            if !flag.swap(true, Ordering::SeqCst) {
                panic!("render surface crashed");
            }
        });

        let outcome =
            panic::catch_unwind(AssertUnwindSafe(|| dispatcher.success("x", NotifyOptions::new())));
        assert!(outcome.is_err());
        assert_eq!(dispatcher.len(), 1);
        assert_eq!(dispatcher.pending_timers(), 1);

        sleep(Duration::from_secs(60)).await;
        assert!(dispatcher.is_empty());
        assert_eq!(dispatcher.pending_timers(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_an_empty_queue_records_nothing() {
        let (dispatcher, diagnostics) = with_diagnostics();
        let seen = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&seen);
        let _surface = dispatcher.subscribe(move |_| *sink.lock().unwrap() += 1);

        dispatcher.clear_all();
        dispatcher.shutdown();

        assert!(diagnostics.is_empty());
        assert_eq!(*seen.lock().unwrap(), 0);
        assert!(dispatcher.is_shut_down());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn dismiss_racing_expiry_settles_each_entry_once() {
        let dispatcher = Dispatcher::create().unwrap();
        let diagnostics = DiagnosticsHandle::new(BufferCapacity::new(4096));
        dispatcher.set_diagnostics(diagnostics.clone());

        let ids: Vec<_> = (0..200)
            .map(|i| dispatcher.info(format!("n-{i}"), NotifyOptions::new().with_duration_ms(1)))
            .collect();

        let tasks: Vec<_> = ids
            .iter()
            .enumerate()
            .map(|(i, &id)| {
                let dispatcher = dispatcher.clone();
                tokio::spawn(async move {
                    if i % 2 == 0 {
                        sleep(ms(1)).await;
                    }
                    dispatcher.dismiss(id);
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }
        sleep(ms(50)).await;

        assert!(dispatcher.is_empty());
        assert_eq!(dispatcher.pending_timers(), 0);

        let mut settled: HashMap<NotificationId, usize> = HashMap::new();
        for event in diagnostics.events() {
            match event.event {
                LifecycleEvent::Dismissed { id } | LifecycleEvent::Expired { id } => {
                    *settled.entry(id).or_default() += 1;
                }
                _ => {}
            }
        }
        assert_eq!(settled.len(), ids.len());
        assert!(ids.iter().all(|id| settled.get(id) == Some(&1)));
    }
}
