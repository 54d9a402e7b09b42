//! Host-authoritative replication.
//!
//! Every participant appends `IntentEnvelope`s to a match-scoped log on
//! the transport. Only the host consumes that log: it drops redeliveries
//! by `IntentId`, applies the rest through its session, and publishes a
//! `Snapshot` after every change. Participants never mutate canonical
//! state; they render the newest snapshot they have seen.

pub mod codec;
pub mod host;
pub mod log;
pub mod participant;
pub mod snapshot;
pub mod transport;

pub use host::{Host, HostHandle};
pub use log::IntentLog;
pub use participant::Participant;
pub use snapshot::{MatchId, Snapshot};
pub use transport::{InMemoryTransport, Transport};
