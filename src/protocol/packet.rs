//! Packet definitions
//!
//! A single frame of the remote console protocol.

/// Request id the server answers an AUTH packet with when the secret is wrong
pub const AUTH_FAILED_ID: i32 = -1;

/// Packet types
///
/// The value `2` means EXEC when sent by the client and AUTH_RESPONSE when
/// sent by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum PacketType {
    ResponseValue = 0,
    ExecCommand = 2,
    Auth = 3,
}

impl PacketType {
    /// Server-side name for type `2`
    pub const AUTH_RESPONSE: PacketType = PacketType::ExecCommand;

    /// Parse the wire value
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(PacketType::ResponseValue),
            2 => Some(PacketType::ExecCommand),
            3 => Some(PacketType::Auth),
            _ => None,
        }
    }
}

/// A decoded packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Client-chosen request id, echoed by the server
    pub id: i32,

    /// Packet type
    pub packet_type: PacketType,

    /// Body text without the trailing NUL terminators
    pub body: String,
}

impl Packet {
    /// Create a packet
    pub fn new(id: i32, packet_type: PacketType, body: impl Into<String>) -> Self {
        Self {
            id,
            packet_type,
            body: body.into(),
        }
    }

    /// Create an AUTH packet carrying the shared secret
    pub fn auth(id: i32, password: &str) -> Self {
        Self::new(id, PacketType::Auth, password)
    }

    /// Create an EXEC packet carrying a rendered command line
    pub fn command(id: i32, line: &str) -> Self {
        Self::new(id, PacketType::ExecCommand, line)
    }

    /// Create an empty RESPONSE_VALUE packet used to mark the end of a response
    pub fn sentinel(id: i32) -> Self {
        Self::new(id, PacketType::ResponseValue, "")
    }

    /// True if this is the server's answer to a rejected AUTH
    pub fn is_auth_failure(&self) -> bool {
        self.id == AUTH_FAILED_ID
    }
}
