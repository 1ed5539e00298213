//! Reed-Solomon style P/Q parity over the address and data region of a data
//! sector.
//!
//! Both codes run the same rectangular pass with different geometry: P walks
//! 86 columns of 24 bytes, Q walks 52 diagonals of 43 bytes. The region
//! starts at the four address bytes (offset 0x00C) and the Q pass also covers
//! the freshly written P parity, so P must always be computed first.

use crate::cd::SECTOR_SIZE;
use crate::ecm::processor::EcmProcessor;

const P_MAJOR: usize = 86;
const P_MINOR: usize = 24;
const P_MULT: usize = 2;
const P_INC: usize = 86;

const Q_MAJOR: usize = 52;
const Q_MINOR: usize = 43;
const Q_MULT: usize = 86;
const Q_INC: usize = 88;

/// P parity size in bytes; Q parity follows at this offset inside the ECC
/// field.
const P_PARITY_SIZE: usize = P_MAJOR * 2;
const Q_PARITY_SIZE: usize = Q_MAJOR * 2;

impl EcmProcessor {
    /// Verify both parity codes of a sector. `data` must cover offsets
    /// 0x010..0x8C8 and `ecc` the 276 parity bytes at 0x81C.
    pub(crate) fn ecc_check_sector(&self, address: &[u8; 4], data: &[u8], ecc: &[u8]) -> bool {
        self.ecc_check_pq(address, data, P_MAJOR, P_MINOR, P_MULT, P_INC, &ecc[..P_PARITY_SIZE])
            && self.ecc_check_pq(
                address,
                data,
                Q_MAJOR,
                Q_MINOR,
                Q_MULT,
                Q_INC,
                &ecc[P_PARITY_SIZE..],
            )
    }

    /// Recompute both parity codes in place. `address` is the real address
    /// field for Mode 1 and four zero bytes for XA form 1.
    pub(crate) fn ecc_write_sector(&self, address: &[u8; 4], sector: &mut [u8; SECTOR_SIZE]) {
        let (head, tail) = sector.split_at_mut(0x81C);
        self.ecc_compute_pq(
            address,
            &head[0x010..],
            P_MAJOR,
            P_MINOR,
            P_MULT,
            P_INC,
            &mut tail[..P_PARITY_SIZE],
        );

        // Q covers the P parity that was just written.
        let (head, tail) = sector.split_at_mut(0x8C8);
        self.ecc_compute_pq(
            address,
            &head[0x010..],
            Q_MAJOR,
            Q_MINOR,
            Q_MULT,
            Q_INC,
            &mut tail[..Q_PARITY_SIZE],
        );
    }

    fn ecc_check_pq(
        &self,
        address: &[u8; 4],
        data: &[u8],
        major_count: usize,
        minor_count: usize,
        major_mult: usize,
        minor_inc: usize,
        ecc: &[u8],
    ) -> bool {
        let mut parity = [0u8; P_PARITY_SIZE];
        let parity = &mut parity[..major_count * 2];
        self.ecc_compute_pq(
            address,
            data,
            major_count,
            minor_count,
            major_mult,
            minor_inc,
            parity,
        );
        *parity == ecc[..major_count * 2]
    }

    #[allow(clippy::too_many_arguments)]
    fn ecc_compute_pq(
        &self,
        address: &[u8; 4],
        data: &[u8],
        major_count: usize,
        minor_count: usize,
        major_mult: usize,
        minor_inc: usize,
        parity: &mut [u8],
    ) {
        let size = major_count * minor_count;

        for major in 0..major_count {
            let mut index = (major >> 1) * major_mult + (major & 1);
            let mut ecc_a: u8 = 0;
            let mut ecc_b: u8 = 0;

            for _ in 0..minor_count {
                let temp = if index < 4 {
                    address[index]
                } else {
                    data[index - 4]
                };
                index += minor_inc;
                if index >= size {
                    index -= size;
                }

                ecc_a ^= temp;
                ecc_b ^= temp;
                ecc_a = self.ecc_f_lut[ecc_a as usize];
            }

            ecc_a = self.ecc_b_lut[(self.ecc_f_lut[ecc_a as usize] ^ ecc_b) as usize];
            parity[major] = ecc_a;
            parity[major + major_count] = ecc_a ^ ecc_b;
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::cd::msf::sector_to_msf;
    use crate::cd::SYNC_PATTERN;

    fn data_sector(fill: u8) -> ([u8; 4], [u8; SECTOR_SIZE]) {
        let mut sector = [0u8; SECTOR_SIZE];
        sector[..12].copy_from_slice(&SYNC_PATTERN);
        sector[0x00C..0x00F].copy_from_slice(&sector_to_msf(150));
        sector[0x00F] = 0x01;
        for (i, byte) in sector[0x010..0x810].iter_mut().enumerate() {
            *byte = fill.wrapping_add(i as u8);
        }

        let mut address = [0u8; 4];
        address.copy_from_slice(&sector[0x00C..0x010]);
        (address, sector)
    }

    #[test]
    fn written_parity_verifies() {
        let processor = EcmProcessor::new();
        let (address, mut sector) = data_sector(0x5A);

        processor.ecc_write_sector(&address, &mut sector);

        assert!(processor.ecc_check_sector(
            &address,
            &sector[0x010..0x8C8],
            &sector[0x81C..0x930]
        ));
    }

    #[test]
    fn corrupted_data_fails_the_check() {
        let processor = EcmProcessor::new();
        let (address, mut sector) = data_sector(0x5A);
        processor.ecc_write_sector(&address, &mut sector);

        sector[0x123] ^= 0x40;

        assert!(!processor.ecc_check_sector(
            &address,
            &sector[0x010..0x8C8],
            &sector[0x81C..0x930]
        ));
    }

    #[test]
    fn corrupted_parity_fails_the_check() {
        let processor = EcmProcessor::new();
        let (address, mut sector) = data_sector(0x00);
        processor.ecc_write_sector(&address, &mut sector);

        // Flip one byte in the Q half.
        sector[0x8D0] ^= 0x01;

        assert!(!processor.ecc_check_sector(
            &address,
            &sector[0x010..0x8C8],
            &sector[0x81C..0x930]
        ));
    }

    #[test]
    fn parity_depends_on_the_address_bytes() {
        let processor = EcmProcessor::new();
        let (address, mut sector) = data_sector(0x77);
        processor.ecc_write_sector(&address, &mut sector);

        let mut zero_addressed = sector;
        processor.ecc_write_sector(&[0, 0, 0, 0], &mut zero_addressed);

        assert_ne!(sector[0x81C..0x930], zero_addressed[0x81C..0x930]);
        assert!(!processor.ecc_check_sector(
            &address,
            &zero_addressed[0x010..0x8C8],
            &zero_addressed[0x81C..0x930]
        ));
        assert!(processor.ecc_check_sector(
            &[0, 0, 0, 0],
            &zero_addressed[0x010..0x8C8],
            &zero_addressed[0x81C..0x930]
        ));
    }
}
