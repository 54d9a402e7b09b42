//! Jump-in window: a timed exception to turn order.
//!
//! When three cards of one rank land on top of the pile, any player holding
//! that rank may complete the four-of-a-kind out of turn until the window's
//! deadline. The rules engine opens, consumes, and invalidates windows; the
//! session scheduler owns the deadline timer and calls `expire` with the
//! generation it was armed for.

pub mod window;

pub use window::{close, expire, is_current, open, JumpInWindow};
