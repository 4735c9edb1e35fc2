//! Macros for declaring events
//!
//! This module provides the [`events!`](crate::events) macro, which declares
//! marker types and wires up their [`Event`](crate::Event) impls in one
//! block.

/// Declare event marker types and their argument shapes.
///
/// Each line becomes a zero-sized marker struct implementing
/// [`Event`](crate::Event) with the given `Args` type. Doc comments and a
/// visibility qualifier are passed through.
///
/// # Examples
///
/// ```
/// use tinyevents::{events, Emitter};
///
/// events! {
///     /// Fired on every scheduler tick.
///     pub Tick => (u64, &'static str);
///     /// Fired once, just before teardown.
///     pub Shutdown => ();
/// }
///
/// let bus = Emitter::new();
/// bus.on(Shutdown, |_| println!("bye"));
/// bus.emit(Shutdown, ());
/// ```
#[macro_export]
macro_rules! events {
    ($($(#[$meta:meta])* $vis:vis $name:ident => $args:ty;)*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            $vis struct $name;

            impl $crate::Event for $name {
                type Args = $args;
            }
        )*
    };
}
