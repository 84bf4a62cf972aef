//! Session
//!
//! One authenticated conversation with the remote console.

use crate::error::{GateError, Result};
use crate::protocol::{read_packet, validate_line, write_packet, Packet, PacketType};

use super::transport::{Connector, Transport};

/// Session lifecycle
///
/// ```text
///   Unauthenticated ──auth ok──▶ Authenticated
///          │                          │
///          └──── any failure ───▶ Closed ◀┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
    Closed,
}

/// How the end of a command's response is detected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// Follow the command with a sentinel packet and collect every fragment
    /// until the sentinel's echo arrives
    Reassemble,

    /// Return the first packet answering the command
    Single,
}

/// A connection to the remote console plus its authentication state
pub struct Session {
    transport: Box<dyn Transport>,
    state: SessionState,
    next_id: i32,
    endpoint: String,
}

impl Session {
    /// Open a transport through `connector`; the session starts unauthenticated
    pub fn open(connector: &dyn Connector) -> Result<Self> {
        let transport = connector.connect()?;
        Ok(Self::new(transport, connector.endpoint()))
    }

    /// Wrap an already connected transport
    pub fn new(transport: Box<dyn Transport>, endpoint: impl Into<String>) -> Self {
        Self {
            transport,
            state: SessionState::Unauthenticated,
            next_id: 1,
            endpoint: endpoint.into(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Mark the session unusable; the transport is released on drop
    pub fn close(&mut self) {
        self.state = SessionState::Closed;
    }

    /// Perform the AUTH handshake
    ///
    /// Only valid on an unauthenticated session. A rejected secret closes the
    /// session and yields `AuthenticationRejected`.
    pub fn authenticate(&mut self, password: &str) -> Result<()> {
        if self.state != SessionState::Unauthenticated {
            return Err(GateError::Protocol(format!(
                "cannot authenticate a session in state {:?}",
                self.state
            )));
        }

        let id = self.allocate_id();
        let result = self.handshake(id, password);
        match result {
            Ok(()) => {
                tracing::debug!("Authenticated to {}", self.endpoint);
                self.state = SessionState::Authenticated;
                Ok(())
            }
            Err(e) => {
                self.state = SessionState::Closed;
                Err(e)
            }
        }
    }

    fn handshake(&mut self, id: i32, password: &str) -> Result<()> {
        self.send(&Packet::auth(id, password))?;

        loop {
            let packet = self.recv()?;

            // Some servers send an empty RESPONSE_VALUE ahead of the real answer
            if packet.packet_type == PacketType::ResponseValue {
                tracing::trace!("Skipping RESPONSE_VALUE id={} during auth", packet.id);
                continue;
            }

            if packet.is_auth_failure() {
                tracing::warn!("Remote console at {} rejected the secret", self.endpoint);
                return Err(GateError::AuthenticationRejected);
            }
            if packet.id != id {
                return Err(GateError::Protocol(format!(
                    "auth response id {} does not match request id {}",
                    packet.id, id
                )));
            }
            return Ok(());
        }
    }

    /// Send one command line and return the response text
    ///
    /// Refuses to send anything unless the session is authenticated. Any
    /// transport or framing failure closes the session.
    pub fn execute(&mut self, line: &str, mode: ResponseMode) -> Result<String> {
        if self.state != SessionState::Authenticated {
            return Err(GateError::Protocol(format!(
                "command sent on a session in state {:?}",
                self.state
            )));
        }
        validate_line(line)?;

        let result = self.round_trip(line, mode);
        if let Err(ref e) = result {
            if e.discards_session() {
                self.state = SessionState::Closed;
            }
        }
        result
    }

    fn round_trip(&mut self, line: &str, mode: ResponseMode) -> Result<String> {
        let id = self.allocate_id();
        tracing::trace!("-> [{}] {}", id, line);
        self.send(&Packet::command(id, line))?;

        match mode {
            ResponseMode::Single => loop {
                let packet = self.recv()?;
                if packet.id == id {
                    return Ok(packet.body);
                }
                tracing::trace!("Discarding stale packet id={}", packet.id);
            },
            ResponseMode::Reassemble => {
                let sentinel_id = self.allocate_id();
                self.send(&Packet::sentinel(sentinel_id))?;

                let mut response = String::new();
                loop {
                    let packet = self.recv()?;
                    if packet.id == id {
                        response.push_str(&packet.body);
                    } else if packet.id == sentinel_id {
                        return Ok(response);
                    } else {
                        tracing::trace!("Discarding stale packet id={}", packet.id);
                    }
                }
            }
        }
    }

    /// Next request id; ids stay positive so they never collide with the
    /// auth failure marker
    fn allocate_id(&mut self) -> i32 {
        let id = self.next_id;
        self.next_id = if id == i32::MAX { 1 } else { id + 1 };
        id
    }

    fn send(&mut self, packet: &Packet) -> Result<()> {
        write_packet(&mut self.transport, packet).map_err(|e| match e {
            GateError::Io(io) => GateError::from_transport(io, "sending packet"),
            other => other,
        })
    }

    fn recv(&mut self) -> Result<Packet> {
        read_packet(&mut self.transport).map_err(|e| match e {
            GateError::Io(io) => GateError::from_transport(io, "waiting for response"),
            other => other,
        })
    }
}
