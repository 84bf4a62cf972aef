//! Protocol Module
//!
//! Defines the remote console (RCON) wire protocol spoken to the game server.
//!
//! ## Packet Format (little-endian)
//! ```text
//! ┌──────────┬──────────┬──────────┬─────────────────────┬───────────┐
//! │ Size (4) │  Id (4)  │ Type (4) │    Body (UTF-8)     │ 0x00 0x00 │
//! └──────────┴──────────┴──────────┴─────────────────────┴───────────┘
//! ```
//! `Size` counts every byte after itself, so an empty body gives `Size = 10`.
//!
//! ### Packet Types
//! - 3: AUTH            - client → server, body is the shared secret
//! - 2: EXEC / AUTH_RESPONSE - direction dependent
//! - 0: RESPONSE_VALUE  - server → client command output
//!
//! ### Session Flow
//! ```text
//!   client                         server
//!     │── AUTH(id=n, secret) ────────▶│
//!     │◀──────── AUTH_RESPONSE(id=n) ──│   (id = -1 on rejection)
//!     │── EXEC(id=m, "difficulty") ──▶│
//!     │── RESPONSE_VALUE(id=m+1, "") ▶│   end-of-response sentinel
//!     │◀──── RESPONSE_VALUE(id=m) ... ─│   one or more fragments
//!     │◀──── RESPONSE_VALUE(id=m+1) ───│   sentinel echo, response complete
//! ```

mod command;
mod packet;
mod codec;

pub use command::{validate_line, Command, MAX_COMMAND_LEN};
pub use packet::{Packet, PacketType, AUTH_FAILED_ID};
pub use codec::{
    decode_packet, encode_packet, read_packet, write_packet, HEADER_SIZE, MAX_PACKET_SIZE,
    MIN_PACKET_SIZE,
};
