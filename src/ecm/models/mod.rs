use binrw::{BinRead, BinWrite};
use bitflags::bitflags;

/// Sectors above this count cannot come from a real disc (an 800 MB CD tops
/// out around 356k sectors), so headers claiming more are rejected.
pub const MAX_IMAGE_SECTORS: u32 = 400_000;

bitflags! {
    /// Per-stream switches controlling which derivable sector fields are
    /// elided from the encoded output. The bit positions are part of the file
    /// format.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Optimizations: u8 {
        /// Drop the 12 sync bytes of data sectors.
        const REMOVE_SYNC = 1;
        /// Drop the three BCD address bytes.
        const REMOVE_MSF = 1 << 1;
        /// Drop the mode byte.
        const REMOVE_MODE = 1 << 2;
        /// Drop the 8 zero bytes between EDC and ECC in Mode 1 sectors.
        const REMOVE_BLANKS = 1 << 3;
        /// Drop the redundant copy of the XA sub-header.
        const REMOVE_REDUNDANT_FLAG = 1 << 4;
        /// Drop the ECC parity bytes.
        const REMOVE_ECC = 1 << 5;
        /// Drop the EDC word.
        const REMOVE_EDC = 1 << 6;
        /// Drop the payload of gap sectors entirely.
        const REMOVE_GAP = 1 << 7;
    }
}

/// On-disk header of an ECM2 file. Written right after the five magic bytes;
/// all integers are little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little, magic = b"ECM2\x01")]
pub struct EcmFileHeader {
    /// Optimization bitset the stream was encoded with.
    pub optimizations: u8,

    /// Number of bytes used for the run count of each packed index record.
    pub index_pack_mode: u8,

    /// Number of records in the packed index.
    pub index_entries: u32,

    /// Number of sectors in the original image.
    pub sectors: u32,
}

/// Serialized size of [`EcmFileHeader`] including the magic bytes.
pub const ECM_FILE_HEADER_SIZE: usize = 15;
