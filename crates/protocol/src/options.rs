//! # Adapter Options
//!
//! Immutable settings fixed when an adapter is constructed.
//!
//! ```rust
//! use bancho_protocol::{AdapterOptions, UnsupportedPacketPolicy};
//!
//! let options = AdapterOptions {
//!     unsupported_policy: UnsupportedPacketPolicy::Discard,
//!     ..Default::default()
//! };
//! assert_eq!(options.compression_level, 6);
//! ```

use bancho_core::BanchoError;
use std::str::FromStr;

use crate::compression::DEFAULT_COMPRESSION_LEVEL;

/// Largest declared payload accepted by default (1 MiB)
pub const DEFAULT_MAX_PAYLOAD_SIZE: usize = 1024 * 1024;

/// What `read_packet` does with an inbound packet the version does not support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnsupportedPacketPolicy {
    /// Return immediately after the ID, leaving length and payload unread.
    ///
    /// The stream is misaligned afterwards; the dispatcher is expected to
    /// drop the connection.
    #[default]
    LeaveUnread,

    /// Read and drop the declared payload so the next read stays aligned
    Discard,
}

impl FromStr for UnsupportedPacketPolicy {
    type Err = BanchoError;

    /// Parse a config value (`leave` / `discard`)
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "leave" | "leaveunread" => Ok(Self::LeaveUnread),
            "discard" | "skip" => Ok(Self::Discard),
            _ => Err(BanchoError::Config(format!(
                "unknown unsupported packet policy '{}' (expected leave or discard)",
                value
            ))),
        }
    }
}

impl UnsupportedPacketPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LeaveUnread => "leave",
            Self::Discard => "discard",
        }
    }
}

/// Settings shared by every adapter built from one registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterOptions {
    /// Gzip level for outbound payloads (0-9)
    ///
    /// # Default
    /// 6
    pub compression_level: u32,

    /// Largest declared inbound payload length accepted
    ///
    /// # Default
    /// 1 MiB
    pub max_payload_size: usize,

    /// Handling of unsupported inbound packet IDs
    pub unsupported_policy: UnsupportedPacketPolicy,
}

impl Default for AdapterOptions {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            max_payload_size: DEFAULT_MAX_PAYLOAD_SIZE,
            unsupported_policy: UnsupportedPacketPolicy::default(),
        }
    }
}
