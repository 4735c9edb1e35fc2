//! # tinyevents - Minimal Typed Synchronous Event Emitter
//!
//! This crate provides a single small primitive: an [`Emitter`] that routes
//! emitted events synchronously to the listeners registered for that event.
//!
//! - Events are marker types; the [`Event`] trait ties each one to the
//!   argument shape its listeners receive, checked entirely at compile time
//! - Listeners run in registration order, on the calling thread, before
//!   `emit` returns
//! - [`Emitter::on`] returns a [`Subscription`] whose
//!   [`unsubscribe`](Subscription::unsubscribe) removes exactly that
//!   listener and is safe to call more than once
//! - Each `emit` dispatches over a snapshot, so listeners may register and
//!   unsubscribe re-entrantly without affecting the current pass
//!
//! It is deliberately not a message bus: no topics or wildcards, no async
//! delivery, no queuing, and no isolation between listeners (a panicking
//! listener aborts the rest of the pass).
//!
//! ## Module Organization
//!
//! - [`event`] - The compile-time event contract ([`Event`])
//! - [`emitter`] - [`Emitter`] and [`Subscription`]
//! - macros - The [`events!`] declaration macro
//!
//! ## Example
//!
//! ```
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use std::sync::Arc;
//! use tinyevents::{events, Emitter};
//!
//! events! {
//!     /// Fired on every scheduler tick.
//!     pub Tick => (u64, &'static str);
//! }
//!
//! let bus = Emitter::new();
//! let total = Arc::new(AtomicU64::new(0));
//!
//! let total_by_cb = Arc::clone(&total);
//! let sub = bus.on(Tick, move |&(count, _label)| {
//!     total_by_cb.fetch_add(count, Ordering::SeqCst);
//! });
//!
//! bus.emit(Tick, (5, "x"));
//! sub.unsubscribe();
//! bus.emit(Tick, (7, "y")); // listener is gone, nothing runs
//!
//! assert_eq!(total.load(Ordering::SeqCst), 5);
//! ```
//!
//! ## Feature Flags
//!
//! - `tracing` - emit `trace!`-level records on registration, removal and
//!   dispatch via the [`tracing`](https://docs.rs/tracing) crate

#![warn(missing_docs)]

pub use emitter::{Emitter, Subscription};
pub use event::Event;

pub mod emitter;
pub mod event;

mod macros;

/// Convenience re-exports for glob imports.
pub mod prelude {
    pub use crate::emitter::{Emitter, Subscription};
    pub use crate::event::Event;
}
