//! # craftgate
//!
//! Remote administration core for a running game server:
//! - Remote console (RCON) client with a lazily authenticated, shared session
//! - Classified failures: unreachable, auth rejected, timeout, protocol
//! - `server.properties` store with atomic rewrites and serialized updates
//! - Mods directory management
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Admin front end (CLI / HTTP)                 │
//! │               one core operation per request                 │
//! └──────────────┬──────────────────────┬──────────────┬────────┘
//!                │                      │              │
//!                ▼                      ▼              ▼
//!   ┌──────────────────────┐  ┌──────────────────┐  ┌──────────┐
//!   │       Gateway        │  │  PropertyStore   │  │ ModStore │
//!   │  (Mutex<Session>)    │  │ (per-file Mutex) │  │          │
//!   └──────────┬───────────┘  └────────┬─────────┘  └────┬─────┘
//!              │                       │                 │
//!              ▼                       ▼                 ▼
//!   ┌──────────────────────┐  ┌──────────────────┐  ┌──────────┐
//!   │  Protocol (packets)  │  │ server.properties│  │  mods/   │
//!   │   TCP → game server  │  │ (temp + rename)  │  │          │
//!   └──────────────────────┘  └──────────────────┘  └──────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod gateway;
pub mod properties;
pub mod mods;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{GateError, Result};
pub use config::Config;
pub use gateway::{Gateway, RconAnswer};
pub use properties::{PropertySet, PropertyStore};
pub use mods::ModStore;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of craftgate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
