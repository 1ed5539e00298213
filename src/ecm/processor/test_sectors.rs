//! Synthetic sectors for the codec tests, one builder per detectable shape.
//! Checksums are produced with the same engines the codec uses, so every
//! fixture verifies cleanly unless a builder corrupts it on purpose.

use crate::cd::msf::sector_to_msf;
use crate::cd::{SECTOR_SIZE, SYNC_PATTERN};
use crate::ecm::processor::edc::put32lsb;
use crate::ecm::processor::{EcmProcessor, ZERO_ADDRESS};

fn data_header(sector: &mut [u8; SECTOR_SIZE], sector_number: u32, mode: u8) {
    sector[0x000..0x00C].copy_from_slice(&SYNC_PATTERN);
    sector[0x00C..0x00F].copy_from_slice(&sector_to_msf(sector_number));
    sector[0x00F] = mode;
}

fn fill_pattern(region: &mut [u8], fill: u8) {
    for (i, byte) in region.iter_mut().enumerate() {
        *byte = fill.wrapping_add(i as u8);
    }
}

pub(crate) fn cdda_sector(fill: u8) -> [u8; SECTOR_SIZE] {
    let mut sector = [0u8; SECTOR_SIZE];
    fill_pattern(&mut sector, fill);
    sector
}

pub(crate) fn cdda_gap_sector() -> [u8; SECTOR_SIZE] {
    [0u8; SECTOR_SIZE]
}

pub(crate) fn mode1_sector(sector_number: u32, fill: u8) -> [u8; SECTOR_SIZE] {
    let processor = EcmProcessor::new();
    let mut sector = [0u8; SECTOR_SIZE];
    data_header(&mut sector, sector_number, 0x01);
    fill_pattern(&mut sector[0x010..0x810], fill);

    let edc = processor.edc_compute(&sector[..0x810]);
    put32lsb(&mut sector[0x810..0x814], edc);

    let mut address = [0u8; 4];
    address.copy_from_slice(&sector[0x00C..0x010]);
    processor.ecc_write_sector(&address, &mut sector);

    sector
}

pub(crate) fn mode1_gap_sector(sector_number: u32) -> [u8; SECTOR_SIZE] {
    let processor = EcmProcessor::new();
    let mut sector = [0u8; SECTOR_SIZE];
    data_header(&mut sector, sector_number, 0x01);

    let edc = processor.edc_compute(&sector[..0x810]);
    put32lsb(&mut sector[0x810..0x814], edc);

    let mut address = [0u8; 4];
    address.copy_from_slice(&sector[0x00C..0x010]);
    processor.ecc_write_sector(&address, &mut sector);

    sector
}

/// Valid Mode 1 layout with a corrupted EDC word.
pub(crate) fn mode1_raw_sector(sector_number: u32, fill: u8) -> [u8; SECTOR_SIZE] {
    let mut sector = mode1_sector(sector_number, fill);
    sector[0x813] ^= 0x01;
    sector
}

pub(crate) fn mode2_sector(sector_number: u32, fill: u8) -> [u8; SECTOR_SIZE] {
    let mut sector = [0u8; SECTOR_SIZE];
    data_header(&mut sector, sector_number, 0x02);
    fill_pattern(&mut sector[0x010..0x930], fill);
    sector
}

pub(crate) fn mode2_gap_sector(sector_number: u32) -> [u8; SECTOR_SIZE] {
    let mut sector = [0u8; SECTOR_SIZE];
    data_header(&mut sector, sector_number, 0x02);
    sector
}

/// XA-shaped sector with real sub-header flags but a fully zeroed payload and
/// checksum area, as some games master their pregaps.
pub(crate) fn mode2_xa_gap_sector(sector_number: u32) -> [u8; SECTOR_SIZE] {
    let mut sector = [0u8; SECTOR_SIZE];
    data_header(&mut sector, sector_number, 0x02);
    sector[0x010..0x014].copy_from_slice(&[0x00, 0x00, 0x20, 0x00]);
    sector.copy_within(0x010..0x014, 0x014);
    sector
}

pub(crate) fn mode2_xa1_sector(sector_number: u32, fill: u8) -> [u8; SECTOR_SIZE] {
    mode2_xa1_sector_with_subheader(
        sector_number,
        fill,
        [0x00, 0x00, 0x08, 0x00],
        [0x00, 0x00, 0x08, 0x00],
    )
}

/// XA form 1 with independently chosen sub-header copies. The checksums are
/// computed over the actual bytes, so the sector verifies even when the
/// copies differ.
pub(crate) fn mode2_xa1_sector_with_subheader(
    sector_number: u32,
    fill: u8,
    first: [u8; 4],
    second: [u8; 4],
) -> [u8; SECTOR_SIZE] {
    let processor = EcmProcessor::new();
    let mut sector = [0u8; SECTOR_SIZE];
    data_header(&mut sector, sector_number, 0x02);
    sector[0x010..0x014].copy_from_slice(&first);
    sector[0x014..0x018].copy_from_slice(&second);
    fill_pattern(&mut sector[0x018..0x818], fill);

    let edc = processor.edc_compute(&sector[0x010..0x818]);
    put32lsb(&mut sector[0x818..0x81C], edc);
    processor.ecc_write_sector(&ZERO_ADDRESS, &mut sector);

    sector
}

pub(crate) fn mode2_xa1_gap_sector(sector_number: u32) -> [u8; SECTOR_SIZE] {
    let processor = EcmProcessor::new();
    let mut sector = [0u8; SECTOR_SIZE];
    data_header(&mut sector, sector_number, 0x02);
    sector[0x010..0x014].copy_from_slice(&[0x00, 0x00, 0x08, 0x00]);
    sector.copy_within(0x010..0x014, 0x014);

    let edc = processor.edc_compute(&sector[0x010..0x818]);
    put32lsb(&mut sector[0x818..0x81C], edc);
    processor.ecc_write_sector(&ZERO_ADDRESS, &mut sector);

    sector
}

pub(crate) fn mode2_xa2_sector(sector_number: u32, fill: u8) -> [u8; SECTOR_SIZE] {
    let processor = EcmProcessor::new();
    let mut sector = [0u8; SECTOR_SIZE];
    data_header(&mut sector, sector_number, 0x02);
    sector[0x010..0x014].copy_from_slice(&[0x00, 0x00, 0x20, 0x00]);
    sector.copy_within(0x010..0x014, 0x014);
    fill_pattern(&mut sector[0x018..0x92C], fill);

    let edc = processor.edc_compute(&sector[0x010..0x92C]);
    put32lsb(&mut sector[0x92C..0x930], edc);

    sector
}

pub(crate) fn mode2_xa2_gap_sector(sector_number: u32) -> [u8; SECTOR_SIZE] {
    let processor = EcmProcessor::new();
    let mut sector = [0u8; SECTOR_SIZE];
    data_header(&mut sector, sector_number, 0x02);
    sector[0x010..0x014].copy_from_slice(&[0x00, 0x00, 0x20, 0x00]);
    sector.copy_within(0x010..0x014, 0x014);

    let edc = processor.edc_compute(&sector[0x010..0x92C]);
    put32lsb(&mut sector[0x92C..0x930], edc);

    sector
}

pub(crate) fn modex_sector(sector_number: u32, mode: u8, fill: u8) -> [u8; SECTOR_SIZE] {
    let mut sector = [0u8; SECTOR_SIZE];
    data_header(&mut sector, sector_number, mode);
    fill_pattern(&mut sector[0x010..0x930], fill);
    sector
}

/// One sector of every detectable shape, each carrying the canonical address
/// for its position so the full optimization set survives negotiation.
pub(crate) fn all_variant_stream(start_sector: u32) -> Vec<u8> {
    let builders: Vec<Box<dyn Fn(u32) -> [u8; SECTOR_SIZE]>> = vec![
        Box::new(|_| cdda_sector(0x42)),
        Box::new(|_| cdda_gap_sector()),
        Box::new(|n| mode1_sector(n, 0xAA)),
        Box::new(mode1_gap_sector),
        Box::new(|n| mode1_raw_sector(n, 0xAB)),
        Box::new(|n| mode2_sector(n, 0x55)),
        Box::new(mode2_gap_sector),
        Box::new(mode2_xa_gap_sector),
        Box::new(|n| mode2_xa1_sector(n, 0xA1)),
        Box::new(mode2_xa1_gap_sector),
        Box::new(|n| mode2_xa2_sector(n, 0xA2)),
        Box::new(mode2_xa2_gap_sector),
        Box::new(|n| modex_sector(n, 0x03, 0x77)),
    ];

    let mut stream = Vec::with_capacity(builders.len() * SECTOR_SIZE);
    for (i, builder) in builders.iter().enumerate() {
        stream.extend_from_slice(&builder(start_sector + i as u32));
    }
    stream
}
