mod codec;
mod ecc;
mod edc;

#[cfg(test)]
pub mod test_sectors;

use crate::cd::{SectorType, SECTOR_SIZE, SYNC_PATTERN};
use crate::cd::msf::sector_to_msf;
use crate::ecm::error::{EcmError, EcmResult};
use crate::ecm::models::Optimizations;
use crate::ecm::processor::edc::get32lsb;

/// Address bytes fed to the ECC passes of XA form 1 sectors.
const ZERO_ADDRESS: [u8; 4] = [0, 0, 0, 0];

/// Sector codec. Holds the three lookup tables shared by the EDC and ECC
/// engines; everything else lives in caller-owned buffers, so a single
/// instance can process any number of streams one after another.
pub struct EcmProcessor {
    ecc_f_lut: [u8; 256],
    ecc_b_lut: [u8; 256],
    edc_lut: [u32; 256],
}

impl EcmProcessor {
    pub fn new() -> Self {
        let mut ecc_f_lut = [0u8; 256];
        let mut ecc_b_lut = [0u8; 256];
        let mut edc_lut = [0u32; 256];

        for i in 0..256usize {
            let j = ((i << 1) ^ (if i & 0x80 != 0 { 0x11D } else { 0 })) & 0xFF;
            ecc_f_lut[i] = j as u8;
            ecc_b_lut[i ^ j] = i as u8;

            let mut edc = i as u32;
            for _ in 0..8 {
                edc = (edc >> 1) ^ (if edc & 1 != 0 { 0xD801_8001 } else { 0 });
            }
            edc_lut[i] = edc;
        }

        Self {
            ecc_f_lut,
            ecc_b_lut,
            edc_lut,
        }
    }

    /// Classify a raw 2352-byte sector.
    ///
    /// The order of the checks is part of the contract: a Mode 2 sector whose
    /// whole payload is zero must be reported as `Mode2Gap` even though its
    /// zeroed EDC field would also pass the XA form checks.
    pub fn detect(&self, sector: &[u8; SECTOR_SIZE]) -> SectorType {
        if sector[0x000..0x00C] != SYNC_PATTERN {
            return if is_gap(sector) {
                SectorType::CddaGap
            } else {
                SectorType::Cdda
            };
        }

        match sector[0x00F] {
            0x01 if is_gap(&sector[0x814..0x81C]) => {
                let mut address = [0u8; 4];
                address.copy_from_slice(&sector[0x00C..0x010]);

                if self.ecc_check_sector(&address, &sector[0x010..0x8C8], &sector[0x81C..0x930])
                    && self.edc_compute(&sector[..0x810]) == get32lsb(&sector[0x810..0x814])
                {
                    if is_gap(&sector[0x010..0x810]) {
                        SectorType::Mode1Gap
                    } else {
                        SectorType::Mode1
                    }
                } else {
                    // Damaged EDC/ECC is usually a protection scheme, keep
                    // the sector byte-exact.
                    SectorType::Mode1Raw
                }
            }
            0x02 => {
                if is_gap(&sector[0x010..0x930]) {
                    return SectorType::Mode2Gap;
                }

                if self.ecc_check_sector(&ZERO_ADDRESS, &sector[0x010..0x8C8], &sector[0x81C..0x930])
                    && self.edc_compute(&sector[0x010..0x818]) == get32lsb(&sector[0x818..0x81C])
                {
                    if is_gap(&sector[0x018..0x818]) {
                        SectorType::Mode2Xa1Gap
                    } else {
                        SectorType::Mode2Xa1
                    }
                } else if self.edc_compute(&sector[0x010..0x92C]) == get32lsb(&sector[0x92C..0x930])
                {
                    if is_gap(&sector[0x018..0x92C]) {
                        SectorType::Mode2Xa2Gap
                    } else {
                        SectorType::Mode2Xa2
                    }
                } else if sector[0x010..0x014] == sector[0x014..0x018]
                    && is_gap(&sector[0x018..0x930])
                {
                    SectorType::Mode2XaGap
                } else {
                    SectorType::Mode2
                }
            }
            _ => SectorType::ModeX,
        }
    }

    /// Shrink `options` to the subset that still preserves every byte of this
    /// sector. Audio and unknown sectors never restrict anything.
    fn check_optimizations(
        &self,
        sector: &[u8; SECTOR_SIZE],
        sector_number: u32,
        options: Optimizations,
        sector_type: SectorType,
    ) -> Optimizations {
        if !sector_type.is_data() {
            return options;
        }

        let mut new_options = options;

        if new_options.contains(Optimizations::REMOVE_MSF) {
            let generated = sector_to_msf(sector_number);
            if sector[0x00C..0x00F] != generated {
                new_options.remove(Optimizations::REMOVE_MSF);
            }
        }

        let is_xa = matches!(
            sector_type,
            SectorType::Mode2XaGap
                | SectorType::Mode2Xa1
                | SectorType::Mode2Xa1Gap
                | SectorType::Mode2Xa2
                | SectorType::Mode2Xa2Gap
        );
        if new_options.contains(Optimizations::REMOVE_REDUNDANT_FLAG)
            && is_xa
            && sector[0x010..0x014] != sector[0x014..0x018]
        {
            new_options.remove(Optimizations::REMOVE_REDUNDANT_FLAG);
        }

        new_options
    }

    /// Encode `sectors` raw sectors from `input` into `output`, recording each
    /// sector's detected type in `index`.
    ///
    /// `start_sector` is the absolute sector number of the first input sector;
    /// callers working on image offsets must add 150 themselves since image
    /// sector 0 sits at MSF 00:02:00. With `negotiate` set, `options` is
    /// shrunk to the largest subset that stays lossless for every sector seen.
    ///
    /// Returns the number of bytes written to `output`.
    #[allow(clippy::too_many_arguments)]
    pub fn encode_stream(
        &self,
        input: &[u8],
        output: &mut [u8],
        index: &mut [SectorType],
        sectors: u32,
        start_sector: u32,
        options: &mut Optimizations,
        negotiate: bool,
    ) -> EcmResult<usize> {
        let count = sectors as usize;

        if input.len() < count * SECTOR_SIZE {
            return Err(EcmError::InputUnderflow);
        }
        if index.len() < count {
            return Err(EcmError::IndexCapacity);
        }

        for i in 0..count {
            let sector = sector_at(input, i)?;
            index[i] = self.detect(sector);

            if negotiate {
                *options =
                    self.check_optimizations(sector, start_sector + i as u32, *options, index[i]);
            }
        }

        let required: usize = index[..count]
            .iter()
            .map(|&sector_type| Self::encoded_sector_size(sector_type, *options))
            .sum();
        if required > output.len() {
            return Err(EcmError::OutputBufferFull);
        }

        let mut written = 0;
        for i in 0..count {
            let sector = sector_at(input, i)?;
            written += self.encode_sector(sector, &mut output[written..], index[i], *options);
        }

        Ok(written)
    }

    /// Decode `sectors` encoded sectors from `input` into `output`, driven by
    /// the type `index` and the exact `options` the stream was encoded with.
    ///
    /// `start_sector` follows the same +150 convention as
    /// [`EcmProcessor::encode_stream`]. Returns the number of bytes consumed
    /// from `input`; the output side is always `sectors * 2352` bytes.
    pub fn decode_stream(
        &self,
        input: &[u8],
        output: &mut [u8],
        index: &[SectorType],
        sectors: u32,
        start_sector: u32,
        options: Optimizations,
    ) -> EcmResult<usize> {
        if index.is_empty() {
            return Err(EcmError::IndexEmpty);
        }

        let count = sectors as usize;
        if index.len() < count {
            return Err(EcmError::IndexCapacity);
        }

        let required: usize = index[..count]
            .iter()
            .map(|&sector_type| Self::encoded_sector_size(sector_type, options))
            .sum();
        if input.len() < required {
            return Err(EcmError::InputUnderflow);
        }
        if output.len() < count * SECTOR_SIZE {
            return Err(EcmError::OutputBufferFull);
        }

        let mut read = 0;
        for i in 0..count {
            let sector = sector_at_mut(output, i)?;
            read += self.decode_sector(
                &input[read..],
                sector,
                index[i],
                start_sector + i as u32,
                options,
            );
        }

        Ok(read)
    }
}

impl Default for EcmProcessor {
    fn default() -> Self {
        Self::new()
    }
}

fn is_gap(data: &[u8]) -> bool {
    data.iter().all(|&byte| byte == 0)
}

fn sector_at(input: &[u8], sector: usize) -> EcmResult<&[u8; SECTOR_SIZE]> {
    input[sector * SECTOR_SIZE..][..SECTOR_SIZE]
        .try_into()
        .map_err(|_| EcmError::InputUnderflow)
}

fn sector_at_mut(output: &mut [u8], sector: usize) -> EcmResult<&mut [u8; SECTOR_SIZE]> {
    (&mut output[sector * SECTOR_SIZE..][..SECTOR_SIZE])
        .try_into()
        .map_err(|_| EcmError::OutputBufferFull)
}
