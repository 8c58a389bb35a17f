//! # Decoded Packets
//!
//! A [`Packet`] is built fresh by every successful `read_packet` call and has
//! no identity beyond that call.

use serde::{Deserialize, Serialize};
use super::{packet_types::*, packets::PacketId};

/// Decoded payload of an inbound packet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum Payload {
    /// Recognised, but the payload is intentionally not parsed
    None,
    Status(UserStatus),
    Message(Message),
    UserId(u32),
    FrameBundle(ReplayFrameBundle),
    Text(String),
}

/// A complete inbound packet in canonical form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Packet {
    pub id: PacketId,
    pub payload: Payload,
}

impl Packet {
    #[inline]
    pub fn new(id: PacketId, payload: Payload) -> Self {
        Self { id, payload }
    }

    /// Packet that carries no parsed payload
    #[inline]
    pub fn empty(id: PacketId) -> Self {
        Self::new(id, Payload::None)
    }

    pub fn status(&self) -> Option<&UserStatus> {
        match &self.payload {
            Payload::Status(status) => Some(status),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&Message> {
        match &self.payload {
            Payload::Message(message) => Some(message),
            _ => None,
        }
    }

    pub fn frame_bundle(&self) -> Option<&ReplayFrameBundle> {
        match &self.payload {
            Payload::FrameBundle(bundle) => Some(bundle),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let packet = Packet::new(
            PacketId::OsuSendIrcMessage,
            Payload::Message(Message::new("", "hello", DEFAULT_CHANNEL)),
        );
        assert_eq!(packet.message().map(|m| m.content.as_str()), Some("hello"));
        assert!(packet.status().is_none());
        assert!(packet.frame_bundle().is_none());

        let empty = Packet::empty(PacketId::OsuPong);
        assert_eq!(empty.payload, Payload::None);
    }
}
