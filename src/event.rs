//! The compile-time event contract
//!
//! An event name is a marker type implementing [`Event`]. The associated
//! `Args` type is the argument shape every listener for that event receives,
//! so the name→arguments mapping is checked entirely by the compiler and
//! carries no runtime validation.

/// A named event and the argument shape its listeners receive.
///
/// Implementations are usually zero-sized marker structs, most conveniently
/// declared with the [`events!`](crate::events) macro:
///
/// ```
/// use tinyevents::events;
///
/// events! {
///     /// Fired on every scheduler tick.
///     pub Tick => (u64, &'static str);
///     pub Shutdown => ();
/// }
/// ```
///
/// Listeners for `Tick` are `Fn(&(u64, &'static str))`; registering or
/// emitting with a mismatched shape is a compile error.
pub trait Event: 'static {
    /// Arguments delivered (by reference) to each listener on emit.
    type Args: 'static;
}
