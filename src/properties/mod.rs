//! Properties Module
//!
//! The game server's flat `key=value` configuration file.
//!
//! ## File Format
//! ```text
//! #Minecraft server properties     <- no '=', ignored
//! motd=A Minecraft Server
//! level-name = world               <- key and value are trimmed
//! generator-settings={"a":"b=c"}   <- split on the first '=' only
//! ```
//!
//! ## Responsibilities
//! - Parse and render [`PropertySet`]s
//! - Atomic rewrite (temp file + rename) on every save
//! - Serialize read-modify-write per file through [`PropertyStore`]

mod set;
mod store;

pub use set::PropertySet;
pub use store::{load, save, PropertyStore};
