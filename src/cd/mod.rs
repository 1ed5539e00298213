use std::fmt;

pub mod msf;

/// Size of a raw CD-ROM sector in bytes.
pub const SECTOR_SIZE: usize = 2352;

/// Synchronization pattern opening every data sector.
pub const SYNC_PATTERN: [u8; 12] = [
    0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00,
];

/// Every sector shape the codec can tell apart. The discriminant is the tag
/// byte stored in the packed index, and the ordering is part of the contract:
/// everything from `Mode1` upwards carries the SYNC/MSF framing of a data
/// sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum SectorType {
    /// Sentinel, never written to an index.
    Unknown = 0,
    /// Raw audio, all 2352 bytes are payload.
    Cdda,
    /// Audio sector whose 2352 bytes are all zero.
    CddaGap,
    Mode1,
    /// Mode 1 with a fully zeroed 2048-byte payload.
    Mode1Gap,
    /// Mode 1 layout whose EDC/ECC do not verify. Usually a copy protection
    /// scheme, so the sector is kept byte-exact.
    Mode1Raw,
    /// Mode 2 without the XA sub-header.
    Mode2,
    Mode2Gap,
    /// XA-shaped sector that is fully zeroed after the sub-header, with
    /// EDC/ECC that do not verify. Seen in some games.
    Mode2XaGap,
    /// XA form 1: 8-byte sub-header, 2048 data bytes, EDC and ECC.
    Mode2Xa1,
    Mode2Xa1Gap,
    /// XA form 2: 8-byte sub-header, 2324 data bytes, EDC only.
    Mode2Xa2,
    Mode2Xa2Gap,
    /// Data-shaped sector whose mode byte is neither 1 nor 2. Kept verbatim
    /// after SYNC and MSF.
    ModeX,
}

impl SectorType {
    /// Whether the sector carries the 16-byte data header (SYNC + MSF + mode).
    pub fn is_data(self) -> bool {
        self >= SectorType::Mode1
    }

    /// Tag byte used on the wire.
    pub fn to_tag(self) -> u8 {
        self as u8
    }

    /// Inverse of [`SectorType::to_tag`]. Returns `None` for bytes outside
    /// the known tag range.
    pub fn from_tag(tag: u8) -> Option<Self> {
        let sector_type = match tag {
            0 => SectorType::Unknown,
            1 => SectorType::Cdda,
            2 => SectorType::CddaGap,
            3 => SectorType::Mode1,
            4 => SectorType::Mode1Gap,
            5 => SectorType::Mode1Raw,
            6 => SectorType::Mode2,
            7 => SectorType::Mode2Gap,
            8 => SectorType::Mode2XaGap,
            9 => SectorType::Mode2Xa1,
            10 => SectorType::Mode2Xa1Gap,
            11 => SectorType::Mode2Xa2,
            12 => SectorType::Mode2Xa2Gap,
            13 => SectorType::ModeX,
            _ => return None,
        };

        Some(sector_type)
    }
}

impl fmt::Display for SectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn tag_round_trips_for_every_type() {
        for tag in 0..=13u8 {
            let sector_type = SectorType::from_tag(tag).unwrap();
            assert_eq!(sector_type.to_tag(), tag);
        }
    }

    #[test]
    fn unknown_tags_are_rejected() {
        assert_eq!(SectorType::from_tag(14), None);
        assert_eq!(SectorType::from_tag(0xFF), None);
    }

    #[test]
    fn data_sectors_start_at_mode_1() {
        assert!(!SectorType::Unknown.is_data());
        assert!(!SectorType::Cdda.is_data());
        assert!(!SectorType::CddaGap.is_data());
        assert!(SectorType::Mode1.is_data());
        assert!(SectorType::Mode2XaGap.is_data());
        assert!(SectorType::ModeX.is_data());
    }
}
