//! Gateway Module
//!
//! Remote console client: transport, session state machine, and the shared
//! [`Gateway`] handle that front ends call.
//!
//! ## Architecture
//! - `Connector` opens a fresh `Transport` per session
//! - `Session` runs the AUTH handshake and command round trips
//! - `Gateway` owns at most one session behind a mutex

mod transport;
mod session;
mod client;

use serde::{Deserialize, Serialize};

pub use transport::{Connector, TcpConnector, TcpTransport, Transport};
pub use session::{ResponseMode, Session, SessionState};
pub use client::Gateway;

/// JSON envelope for a remote console response: `{"answer": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RconAnswer {
    pub answer: String,
}

impl From<String> for RconAnswer {
    fn from(answer: String) -> Self {
        Self { answer }
    }
}
