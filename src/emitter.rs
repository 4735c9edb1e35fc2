//! The emitter and its registry
//!
//! This module holds the core of the crate: [`Emitter`], which routes
//! emitted events synchronously to the listeners registered for that event,
//! and [`Subscription`], the handle that removes exactly one listener again.
//!
//! Dispatch is snapshot-based: `emit` clones the listener list for the event
//! under the registry lock, releases the lock, then invokes the callbacks.
//! One pass is therefore deterministic: a listener added during dispatch is
//! not invoked until the next pass, and a listener unsubscribed during
//! dispatch is still invoked in the current one. Because the lock is never
//! held while a callback runs, listeners may re-enter `on`, `emit` and
//! `unsubscribe` freely.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::event::Event;

/// Identifies one registration within a registry.
///
/// Every `on` call gets a fresh id, so registering the same closure twice
/// produces two independent listeners (and two invocations per emit). Rust
/// closures have no identity to deduplicate on; this sequence behavior is
/// deliberate and covered by tests.
type ListenerId = u64;

/// Shared-ownership callback for an event with argument shape `A`.
type Callback<A> = Arc<dyn Fn(&A) + Send + Sync>;

/// One registered listener. The callback is type-erased so listeners for
/// events with different argument shapes can live in one map; it is only
/// ever downcast back to `Callback<E::Args>` under the `TypeId` of `E`.
struct Entry {
    id: ListenerId,
    callback: Box<dyn Any + Send + Sync>,
}

/// Event-keyed listener storage, behind the emitter's mutex.
struct Registry {
    listeners: HashMap<TypeId, Vec<Entry>>,
    next_id: ListenerId,
}

impl Registry {
    fn new() -> Self {
        Self {
            listeners: HashMap::new(),
            next_id: 1,
        }
    }

    fn remove(&mut self, event: TypeId, id: ListenerId) {
        if let Some(entries) = self.listeners.get_mut(&event) {
            entries.retain(|entry| entry.id != id);
        }
    }
}

/// A minimal typed synchronous event emitter.
///
/// Each event is a marker type implementing [`Event`]; its `Args` associated
/// type fixes the argument shape listeners receive. Listeners are invoked in
/// registration order, on the calling thread, before `emit` returns.
///
/// Cloning an `Emitter` is cheap and yields a handle onto the same registry;
/// independent registries come from separate [`Emitter::new`] calls.
///
/// ```
/// use tinyevents::{events, Emitter};
///
/// events! {
///     pub Tick => (u64, &'static str);
/// }
///
/// let bus = Emitter::new();
/// let sub = bus.on(Tick, |&(count, label)| {
///     println!("tick {count} ({label})");
/// });
/// bus.emit(Tick, (5, "x"));
/// sub.unsubscribe();
/// bus.emit(Tick, (6, "y")); // no listeners left, safe no-op
/// ```
#[derive(Clone)]
pub struct Emitter {
    registry: Arc<Mutex<Registry>>,
}

impl Emitter {
    /// Create a new emitter with no registered listeners.
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry::new())),
        }
    }

    /// Register `callback` as a listener for `E`.
    ///
    /// The callback is appended to `E`'s listener list, so listeners run in
    /// registration order. Registration never fails, and the same closure
    /// may be registered more than once (each registration is invoked).
    ///
    /// The returned [`Subscription`] removes exactly this listener from
    /// exactly this event. Dropping it without calling
    /// [`unsubscribe`](Subscription::unsubscribe) leaves the listener
    /// registered for the life of the emitter.
    pub fn on<E, F>(&self, _event: E, callback: F) -> Subscription
    where
        E: Event,
        F: Fn(&E::Args) + Send + Sync + 'static,
    {
        let callback: Callback<E::Args> = Arc::new(callback);
        let event = TypeId::of::<E>();

        let id = {
            let mut registry = self.registry.lock();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.listeners.entry(event).or_default().push(Entry {
                id,
                callback: Box::new(callback),
            });
            id
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(event = std::any::type_name::<E>(), id, "listener registered");

        Subscription {
            registry: Arc::downgrade(&self.registry),
            event,
            id,
        }
    }

    /// Invoke every listener currently registered for `E` with `&args`.
    ///
    /// Listeners run synchronously on the calling thread, in registration
    /// order, over a snapshot taken when the pass begins. With no listeners
    /// registered this is a no-op. A panicking listener propagates out of
    /// `emit` and the remainder of the pass is skipped; the emitter itself
    /// stays usable.
    pub fn emit<E: Event>(&self, _event: E, args: E::Args) {
        // Snapshot under the lock (Arc clones only), release before calling
        // out so listeners can re-enter the emitter.
        let snapshot: Vec<Callback<E::Args>> = {
            let registry = self.registry.lock();
            match registry.listeners.get(&TypeId::of::<E>()) {
                Some(entries) => entries
                    .iter()
                    .filter_map(|entry| entry.callback.downcast_ref::<Callback<E::Args>>())
                    .map(Arc::clone)
                    .collect(),
                None => return,
            }
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(
            event = std::any::type_name::<E>(),
            listeners = snapshot.len(),
            "dispatching"
        );

        for callback in &snapshot {
            callback(&args);
        }
    }

    /// Number of listeners currently registered for `E`.
    pub fn listener_count<E: Event>(&self) -> usize {
        self.registry
            .lock()
            .listeners
            .get(&TypeId::of::<E>())
            .map_or(0, Vec::len)
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Emitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.registry.lock();
        let listeners: usize = registry.listeners.values().map(Vec::len).sum();
        f.debug_struct("Emitter")
            .field("events", &registry.listeners.len())
            .field("listeners", &listeners)
            .finish()
    }
}

/// Handle for removing one listener from one event.
///
/// Returned by [`Emitter::on`]. [`unsubscribe`](Self::unsubscribe) is
/// idempotent: the second and later calls find nothing to remove and do
/// nothing, and a handle that outlives its emitter is a safe no-op. The
/// handle holds only a weak reference, so keeping it around does not keep
/// the emitter alive.
#[derive(Debug)]
pub struct Subscription {
    registry: Weak<Mutex<Registry>>,
    event: TypeId,
    id: ListenerId,
}

impl Subscription {
    /// Remove the listener this handle was returned for.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.lock().remove(self.event, self.id);

            #[cfg(feature = "tracing")]
            tracing::trace!(id = self.id, "listener removed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;

    struct Tick;
    impl Event for Tick {
        type Args = (u64, &'static str);
    }

    struct Other;
    impl Event for Other {
        type Args = u64;
    }

    #[test]
    fn test_emit_without_listeners_is_noop() {
        let bus = Emitter::new();
        bus.emit(Tick, (1, "a"));
        assert_eq!(bus.listener_count::<Tick>(), 0);
    }

    #[test]
    fn test_listener_receives_exact_args_once() {
        let bus = Emitter::new();
        let seen = Arc::new(StdMutex::new(Vec::new()));

        let seen_by_cb = Arc::clone(&seen);
        bus.on(Tick, move |&(count, label)| {
            seen_by_cb.lock().unwrap().push((count, label));
        });

        bus.emit(Tick, (5, "x"));
        assert_eq!(*seen.lock().unwrap(), vec![(5, "x")]);
    }

    #[test]
    fn test_registration_order_is_dispatch_order() {
        let bus = Emitter::new();
        let order = Arc::new(StdMutex::new(Vec::new()));

        for name in ["f", "g", "h"] {
            let order = Arc::clone(&order);
            bus.on(Tick, move |_| order.lock().unwrap().push(name));
        }

        bus.emit(Tick, (0, ""));
        assert_eq!(*order.lock().unwrap(), vec!["f", "g", "h"]);
    }

    #[test]
    fn test_events_are_isolated() {
        let bus = Emitter::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let calls_by_cb = Arc::clone(&calls);
        bus.on(Tick, move |_| {
            calls_by_cb.fetch_add(1, Ordering::SeqCst);
        });

        bus.emit(Other, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        bus.emit(Tick, (1, "a"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let bus = Emitter::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let calls_f = Arc::clone(&calls);
        let sub = bus.on(Tick, move |_| {
            calls_f.fetch_add(1, Ordering::SeqCst);
        });
        let calls_g = Arc::clone(&calls);
        bus.on(Tick, move |_| {
            calls_g.fetch_add(1, Ordering::SeqCst);
        });

        sub.unsubscribe();
        sub.unsubscribe();

        bus.emit(Tick, (1, "a"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(bus.listener_count::<Tick>(), 1);
    }

    #[test]
    fn test_listener_added_during_dispatch_waits_for_next_pass() {
        let bus = Emitter::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let bus_inner = bus.clone();
        let calls_outer = Arc::clone(&calls);
        bus.on(Tick, move |_| {
            let calls_inner = Arc::clone(&calls_outer);
            bus_inner.on(Tick, move |_| {
                calls_inner.fetch_add(1, Ordering::SeqCst);
            });
        });

        bus.emit(Tick, (1, "a"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        bus.emit(Tick, (2, "b"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_listener_removed_during_dispatch_still_runs_this_pass() {
        let bus = Emitter::new();
        let calls = Arc::new(AtomicUsize::new(0));

        // The first listener unsubscribes the second one mid-pass. The
        // snapshot was taken before the pass began, so the second listener
        // still runs this pass and only disappears from the next.
        let slot: Arc<StdMutex<Option<Subscription>>> = Arc::new(StdMutex::new(None));
        let slot_by_cb = Arc::clone(&slot);
        bus.on(Tick, move |_| {
            if let Some(sub) = slot_by_cb.lock().unwrap().as_ref() {
                sub.unsubscribe();
            }
        });

        let calls_late = Arc::clone(&calls);
        let late = bus.on(Tick, move |_| {
            calls_late.fetch_add(1, Ordering::SeqCst);
        });
        *slot.lock().unwrap() = Some(late);

        bus.emit(Tick, (1, "a"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        bus.emit(Tick, (2, "b"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_subscription_survives_emitter_drop() {
        let bus = Emitter::new();
        let sub = bus.on(Tick, |_| {});
        drop(bus);
        sub.unsubscribe();
        sub.unsubscribe();
    }

    #[test]
    fn test_clones_share_the_registry() {
        let bus = Emitter::new();
        let clone = bus.clone();
        let calls = Arc::new(AtomicUsize::new(0));

        let calls_by_cb = Arc::clone(&calls);
        clone.on(Tick, move |_| {
            calls_by_cb.fetch_add(1, Ordering::SeqCst);
        });

        bus.emit(Tick, (1, "a"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(bus.listener_count::<Tick>(), 1);
    }

    #[test]
    fn test_separate_emitters_do_not_crosstalk() {
        let a = Emitter::new();
        let b = Emitter::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let calls_by_cb = Arc::clone(&calls);
        a.on(Tick, move |_| {
            calls_by_cb.fetch_add(1, Ordering::SeqCst);
        });

        b.emit(Tick, (1, "a"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_debug_reports_counts() {
        let bus = Emitter::new();
        bus.on(Tick, |_| {});
        bus.on(Other, |_| {});
        let rendered = format!("{bus:?}");
        assert!(rendered.contains("events: 2"));
        assert!(rendered.contains("listeners: 2"));
    }
}
