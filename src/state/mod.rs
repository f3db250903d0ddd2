//! Per-connection state: the lifecycle state, the channel roster and the
//! local identity.
//!
//! [`Session`] is the single piece of mutable protocol state. Handlers
//! receive it through [`Context`](crate::registry::Context) and are the only
//! code that mutates it while a connection is live; the client exposes read
//! access through snapshots.

mod roster;
mod session;

pub use roster::Roster;
pub use session::Session;

use std::fmt;

/// Lifecycle state of a connection.
///
/// States are ordered so that `state >= ConnectionState::Connecting` means
/// the transport is (or is about to be) open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConnectionState {
    /// No transport.
    #[default]
    Offline,
    /// Transport open, registration in progress.
    Connecting,
    /// Registration sent, steady state.
    Connected,
    /// QUIT sent, waiting for teardown.
    Disconnecting,
}

impl ConnectionState {
    /// Returns `true` while the receive loop should keep reading.
    pub fn is_live(self) -> bool {
        self >= ConnectionState::Connecting
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Offline => "offline",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Disconnecting => "disconnecting",
        };
        f.write_str(name)
    }
}
