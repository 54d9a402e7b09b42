//! Opponent policies.
//!
//! A policy looks at the canonical state and proposes an intent for one
//! seat. It never mutates state: the session submits whatever it proposes
//! through the same `RulesEngine::apply_intent` path as a human.

pub mod policy;

pub use policy::{HeuristicPolicy, OpponentPolicy, UniformOpponent};
