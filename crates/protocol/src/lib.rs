//! # Bancho Protocol Library
//!
//! Translates between the canonical Bancho model and the wire format of
//! individual osu! client builds.
//!
//! ## Architecture
//!
//! ### 1. Codecs ([`codecs`])
//! Little-endian primitives and the legacy string encoding
//! (`0x00` for empty, `0x0b` + ULEB128 length + UTF-8 otherwise).
//!
//! ### 2. Packet IDs ([`packets`])
//! The canonical [`PacketId`] table. Versions that number packets
//! differently translate through a [`PacketIdMap`] ([`remap`]).
//!
//! ### 3. Model ([`packet_types`], [`packet_structures`])
//! Version-independent data the dispatcher works with, and the decoded
//! [`Packet`] returned by reads.
//!
//! ### 4. Framing ([`frame`], [`compression`])
//! `[u16 id][u32 length][gzip payload]` frames over any Tokio stream.
//!
//! ### 5. Adapters ([`io`], [`versions`], [`registry`])
//! [`BanchoIo`] names every operation; each build's adapter implements the
//! subset its clients understand and silently skips the rest.
//!
//! ## Usage Example
//!
//! ```rust
//! use bancho_protocol::{AdapterOptions, BanchoIo, PacketId, ProtocolRegistry};
//!
//! let registry = ProtocolRegistry::with_defaults(AdapterOptions::default());
//! let adapter = registry.resolve(291).unwrap();
//!
//! assert!(adapter.implements(PacketId::BanchoAnnounce));
//! assert!(!adapter.implements(PacketId::BanchoMatchNew));
//! ```

pub mod codecs;
pub mod compression;
pub mod packets;
pub mod packet_types;
pub mod packet_structures;
pub mod remap;
pub mod frame;
pub mod io;
pub mod options;
pub mod registry;
pub mod versions;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used items
pub use compression::{compress, decompress, DEFAULT_COMPRESSION_LEVEL};
pub use packets::*;
pub use packet_types::*;
pub use packet_structures::*;
pub use remap::PacketIdMap;
pub use io::{BanchoIo, BanchoStream, BoxedStream};
pub use options::*;
pub use registry::ProtocolRegistry;
pub use versions::B291;
