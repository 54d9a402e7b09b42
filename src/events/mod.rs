//! Event notifications for the presentation layer.
//!
//! Every accepted transition returns the events it produced, in order. The
//! session forwards them on a broadcast channel; nothing flows back.

pub mod event;

pub use event::{BurnReason, GameEvent, WindowCloseReason};
