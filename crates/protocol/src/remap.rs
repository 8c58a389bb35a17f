//! Canonical <-> wire packet ID remapping
//!
//! Legacy clients insert one reserved wire slot for the [`PacketId::IrcJoin`]
//! sentinel. Every canonical ID at or above that slot shifts up by one on the
//! wire. Clients without the slot use the canonical numbering as-is.

use crate::packets::PacketId;

/// Per-version packet ID table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketIdMap {
    /// Wire slot holding the sentinel, if this version has one
    reserved_slot: Option<u16>,
}

impl PacketIdMap {
    /// Canonical numbering with no reserved slot
    pub const fn identity() -> Self {
        Self { reserved_slot: None }
    }

    /// Numbering with the sentinel occupying `slot`
    pub const fn with_reserved_slot(slot: u16) -> Self {
        Self { reserved_slot: Some(slot) }
    }

    pub fn reserved_slot(&self) -> Option<u16> {
        self.reserved_slot
    }

    /// Canonical value -> wire ID
    pub fn to_wire(&self, canonical: u16) -> u16 {
        let Some(slot) = self.reserved_slot else {
            return canonical;
        };
        if canonical == PacketId::IrcJoin.as_u16() {
            slot
        } else if canonical >= slot {
            canonical.wrapping_add(1)
        } else {
            canonical
        }
    }

    /// Wire ID -> canonical value
    pub fn from_wire(&self, wire: u16) -> u16 {
        let Some(slot) = self.reserved_slot else {
            return wire;
        };
        if wire == slot {
            PacketId::IrcJoin.as_u16()
        } else if wire > slot {
            wire - 1
        } else {
            wire
        }
    }

    #[inline]
    pub fn encode(&self, id: PacketId) -> u16 {
        self.to_wire(id.as_u16())
    }

    /// Wire ID -> canonical packet, `None` if nothing is assigned to it
    #[inline]
    pub fn decode(&self, wire: u16) -> Option<PacketId> {
        PacketId::from_u16(self.from_wire(wire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY: PacketIdMap = PacketIdMap::with_reserved_slot(11);

    #[test]
    fn test_sentinel_uses_reserved_slot() {
        assert_eq!(LEGACY.encode(PacketId::IrcJoin), 11);
        assert_eq!(LEGACY.decode(11), Some(PacketId::IrcJoin));
    }

    #[test]
    fn test_ids_below_slot_are_identity() {
        for canonical in 0..11u16 {
            assert_eq!(LEGACY.to_wire(canonical), canonical);
            assert_eq!(LEGACY.from_wire(canonical), canonical);
        }
    }

    #[test]
    fn test_ids_at_and_above_slot_shift() {
        assert_eq!(LEGACY.encode(PacketId::BanchoHandleOsuUpdate), 12);
        assert_eq!(LEGACY.encode(PacketId::BanchoAnnounce), 25);
        assert_eq!(LEGACY.decode(12), Some(PacketId::BanchoHandleOsuUpdate));
        assert_eq!(LEGACY.decode(25), Some(PacketId::BanchoAnnounce));
    }

    #[test]
    fn test_directions_are_inverse() {
        for &id in PacketId::ALL {
            let wire = LEGACY.encode(id);
            assert_eq!(LEGACY.decode(wire), Some(id), "failed for {}", id);
        }
        for wire in 0..=110u16 {
            assert_eq!(LEGACY.to_wire(LEGACY.from_wire(wire)), wire);
        }
    }

    #[test]
    fn test_identity_map() {
        let map = PacketIdMap::identity();
        assert_eq!(map.reserved_slot(), None);
        assert_eq!(map.encode(PacketId::BanchoHandleOsuUpdate), 11);
        assert_eq!(map.decode(11), Some(PacketId::BanchoHandleOsuUpdate));
    }
}
