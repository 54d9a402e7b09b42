//! Match identity and published snapshots.

use serde::{Deserialize, Serialize};

use crate::core::GameState;

/// Identifies a match on the transport.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchId(String);

impl MatchId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical state as published by the host.
///
/// `revision` mirrors `state.revision`; participants keep the highest one
/// they have seen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub match_id: MatchId,
    pub revision: u64,
    pub state: GameState,
}

impl Snapshot {
    #[must_use]
    pub fn new(match_id: MatchId, state: GameState) -> Self {
        Self {
            match_id,
            revision: state.revision,
            state,
        }
    }

    /// Is this snapshot newer than `revision`?
    #[must_use]
    pub fn supersedes(&self, revision: Option<u64>) -> bool {
        revision.map_or(true, |seen| self.revision > seen)
    }
}
