//! Per-variant sector encoding and decoding.
//!
//! The encoder emits the fields of a sector in layout order, skipping every
//! field the optimization set marks as derivable. The decoder walks the same
//! field list, copying what is present and synthesizing what is not. Both
//! sides and [`EcmProcessor::encoded_sector_size`] must agree on the gates
//! for every field, since the stream driver sizes its reads purely from the
//! type index.

use crate::cd::msf::sector_to_msf;
use crate::cd::{SectorType, SECTOR_SIZE, SYNC_PATTERN};
use crate::ecm::models::Optimizations;
use crate::ecm::processor::edc::put32lsb;
use crate::ecm::processor::{EcmProcessor, ZERO_ADDRESS};

impl EcmProcessor {
    /// Write the compact form of one sector into `output` and return the
    /// number of bytes emitted. `output` must be at least
    /// [`EcmProcessor::encoded_sector_size`] bytes for this type and option
    /// set; the stream driver prechecks this.
    pub fn encode_sector(
        &self,
        sector: &[u8; SECTOR_SIZE],
        output: &mut [u8],
        sector_type: SectorType,
        options: Optimizations,
    ) -> usize {
        match sector_type {
            SectorType::Unknown => 0,
            SectorType::Cdda | SectorType::CddaGap => {
                encode_sector_cdda(sector, output, sector_type, options)
            }
            SectorType::Mode1 | SectorType::Mode1Gap | SectorType::Mode1Raw => {
                encode_sector_mode_1(sector, output, sector_type, options)
            }
            SectorType::Mode2 | SectorType::Mode2Gap => {
                encode_sector_mode_2(sector, output, sector_type, options)
            }
            SectorType::Mode2XaGap => encode_sector_mode_2_xa_gap(sector, output, options),
            SectorType::Mode2Xa1 | SectorType::Mode2Xa1Gap => {
                encode_sector_mode_2_xa_1(sector, output, sector_type, options)
            }
            SectorType::Mode2Xa2 | SectorType::Mode2Xa2Gap => {
                encode_sector_mode_2_xa_2(sector, output, sector_type, options)
            }
            SectorType::ModeX => encode_sector_mode_x(sector, output, options),
        }
    }

    /// Rebuild one full 2352-byte sector from its compact form and return the
    /// number of bytes consumed from `input`. `sector_number` is the absolute
    /// sector number used to regenerate a removed address field.
    pub fn decode_sector(
        &self,
        input: &[u8],
        output: &mut [u8; SECTOR_SIZE],
        sector_type: SectorType,
        sector_number: u32,
        options: Optimizations,
    ) -> usize {
        let mut read = 0;

        // SYNC and address bytes are common to every data sector shape.
        if sector_type.is_data() {
            if !options.contains(Optimizations::REMOVE_SYNC) {
                output[0x000..0x00C].copy_from_slice(&input[..0x00C]);
                read += 0x00C;
            } else {
                output[0x000..0x00C].copy_from_slice(&SYNC_PATTERN);
            }

            if !options.contains(Optimizations::REMOVE_MSF) {
                output[0x00C..0x00F].copy_from_slice(&input[read..read + 0x03]);
                read += 0x03;
            } else {
                output[0x00C..0x00F].copy_from_slice(&sector_to_msf(sector_number));
            }
        }

        match sector_type {
            SectorType::Unknown => read,
            SectorType::Cdda | SectorType::CddaGap => {
                decode_sector_cdda(input, output, sector_type, options)
            }
            SectorType::Mode1 | SectorType::Mode1Gap | SectorType::Mode1Raw => {
                self.decode_sector_mode_1(input, output, sector_type, read, options)
            }
            SectorType::Mode2 | SectorType::Mode2Gap => {
                decode_sector_mode_2(input, output, sector_type, read, options)
            }
            SectorType::Mode2XaGap => decode_sector_mode_2_xa_gap(input, output, read, options),
            SectorType::Mode2Xa1 | SectorType::Mode2Xa1Gap => {
                self.decode_sector_mode_2_xa_1(input, output, sector_type, read, options)
            }
            SectorType::Mode2Xa2 | SectorType::Mode2Xa2Gap => {
                self.decode_sector_mode_2_xa_2(input, output, sector_type, read, options)
            }
            SectorType::ModeX => decode_sector_mode_x(input, output, read),
        }
    }

    /// Exact number of bytes the encoder emits for a sector of this type
    /// under this option set. The decode side of the stream driver relies on
    /// this as its only source of sizing.
    pub fn encoded_sector_size(sector_type: SectorType, options: Optimizations) -> usize {
        let mut size = 0;

        match sector_type {
            SectorType::Unknown => {}
            SectorType::Cdda | SectorType::CddaGap => {
                if sector_type == SectorType::Cdda || !options.contains(Optimizations::REMOVE_GAP) {
                    size = SECTOR_SIZE;
                }
            }
            SectorType::Mode1 | SectorType::Mode1Gap | SectorType::Mode1Raw => {
                if !options.contains(Optimizations::REMOVE_SYNC) {
                    size += 0x00C;
                }
                if !options.contains(Optimizations::REMOVE_MSF) {
                    size += 0x003;
                }
                if !options.contains(Optimizations::REMOVE_MODE) {
                    size += 0x001;
                }
                if matches!(sector_type, SectorType::Mode1 | SectorType::Mode1Raw)
                    || !options.contains(Optimizations::REMOVE_GAP)
                {
                    size += 0x800;
                }
                if !options.contains(Optimizations::REMOVE_EDC)
                    || sector_type == SectorType::Mode1Raw
                {
                    size += 0x004;
                }
                if !options.contains(Optimizations::REMOVE_BLANKS) {
                    size += 0x008;
                }
                if !options.contains(Optimizations::REMOVE_ECC)
                    || sector_type == SectorType::Mode1Raw
                {
                    size += 0x114;
                }
            }
            SectorType::Mode2 | SectorType::Mode2Gap => {
                if !options.contains(Optimizations::REMOVE_SYNC) {
                    size += 0x00C;
                }
                if !options.contains(Optimizations::REMOVE_MSF) {
                    size += 0x003;
                }
                if !options.contains(Optimizations::REMOVE_MODE) {
                    size += 0x001;
                }
                if sector_type == SectorType::Mode2 || !options.contains(Optimizations::REMOVE_GAP)
                {
                    size += 0x920;
                }
            }
            SectorType::Mode2XaGap => {
                if !options.contains(Optimizations::REMOVE_SYNC) {
                    size += 0x00C;
                }
                if !options.contains(Optimizations::REMOVE_MSF) {
                    size += 0x003;
                }
                if !options.contains(Optimizations::REMOVE_MODE) {
                    size += 0x001;
                }
                size += if options.contains(Optimizations::REMOVE_REDUNDANT_FLAG) {
                    0x004
                } else {
                    0x008
                };
                if !options.contains(Optimizations::REMOVE_GAP) {
                    size += 0x918;
                }
            }
            SectorType::Mode2Xa1 | SectorType::Mode2Xa1Gap => {
                if !options.contains(Optimizations::REMOVE_SYNC) {
                    size += 0x00C;
                }
                if !options.contains(Optimizations::REMOVE_MSF) {
                    size += 0x003;
                }
                if !options.contains(Optimizations::REMOVE_MODE) {
                    size += 0x001;
                }
                size += if options.contains(Optimizations::REMOVE_REDUNDANT_FLAG) {
                    0x004
                } else {
                    0x008
                };
                if sector_type == SectorType::Mode2Xa1
                    || !options.contains(Optimizations::REMOVE_GAP)
                {
                    size += 0x800;
                }
                if !options.contains(Optimizations::REMOVE_EDC) {
                    size += 0x004;
                }
                if !options.contains(Optimizations::REMOVE_ECC) {
                    size += 0x114;
                }
            }
            SectorType::Mode2Xa2 | SectorType::Mode2Xa2Gap => {
                if !options.contains(Optimizations::REMOVE_SYNC) {
                    size += 0x00C;
                }
                if !options.contains(Optimizations::REMOVE_MSF) {
                    size += 0x003;
                }
                if !options.contains(Optimizations::REMOVE_MODE) {
                    size += 0x001;
                }
                size += if options.contains(Optimizations::REMOVE_REDUNDANT_FLAG) {
                    0x004
                } else {
                    0x008
                };
                if sector_type == SectorType::Mode2Xa2
                    || !options.contains(Optimizations::REMOVE_GAP)
                {
                    size += 0x914;
                }
                if !options.contains(Optimizations::REMOVE_EDC) {
                    size += 0x004;
                }
            }
            SectorType::ModeX => {
                if !options.contains(Optimizations::REMOVE_SYNC) {
                    size += 0x00C;
                }
                if !options.contains(Optimizations::REMOVE_MSF) {
                    size += 0x003;
                }
                size += 0x921;
            }
        }

        size
    }

    fn decode_sector_mode_1(
        &self,
        input: &[u8],
        output: &mut [u8; SECTOR_SIZE],
        sector_type: SectorType,
        mut read: usize,
        options: Optimizations,
    ) -> usize {
        if !options.contains(Optimizations::REMOVE_MODE) {
            output[0x00F] = input[read];
            read += 0x001;
        } else {
            output[0x00F] = 0x01;
        }

        if matches!(sector_type, SectorType::Mode1 | SectorType::Mode1Raw)
            || !options.contains(Optimizations::REMOVE_GAP)
        {
            output[0x010..0x810].copy_from_slice(&input[read..read + 0x800]);
            read += 0x800;
        } else {
            output[0x010..0x810].fill(0);
        }

        if !options.contains(Optimizations::REMOVE_EDC) || sector_type == SectorType::Mode1Raw {
            output[0x810..0x814].copy_from_slice(&input[read..read + 0x004]);
            read += 0x004;
        } else {
            let edc = self.edc_compute(&output[..0x810]);
            put32lsb(&mut output[0x810..0x814], edc);
        }

        if !options.contains(Optimizations::REMOVE_BLANKS) {
            output[0x814..0x81C].copy_from_slice(&input[read..read + 0x008]);
            read += 0x008;
        } else {
            output[0x814..0x81C].fill(0);
        }

        if !options.contains(Optimizations::REMOVE_ECC) || sector_type == SectorType::Mode1Raw {
            output[0x81C..0x930].copy_from_slice(&input[read..read + 0x114]);
            read += 0x114;
        } else {
            let mut address = [0u8; 4];
            address.copy_from_slice(&output[0x00C..0x010]);
            self.ecc_write_sector(&address, output);
        }

        read
    }

    fn decode_sector_mode_2_xa_1(
        &self,
        input: &[u8],
        output: &mut [u8; SECTOR_SIZE],
        sector_type: SectorType,
        mut read: usize,
        options: Optimizations,
    ) -> usize {
        if !options.contains(Optimizations::REMOVE_MODE) {
            output[0x00F] = input[read];
            read += 0x001;
        } else {
            output[0x00F] = 0x02;
        }

        read = decode_subheader(input, output, read, options);

        if sector_type == SectorType::Mode2Xa1 || !options.contains(Optimizations::REMOVE_GAP) {
            output[0x018..0x818].copy_from_slice(&input[read..read + 0x800]);
            read += 0x800;
        } else {
            output[0x018..0x818].fill(0);
        }

        if !options.contains(Optimizations::REMOVE_EDC) {
            output[0x818..0x81C].copy_from_slice(&input[read..read + 0x004]);
            read += 0x004;
        } else {
            let edc = self.edc_compute(&output[0x010..0x818]);
            put32lsb(&mut output[0x818..0x81C], edc);
        }

        if !options.contains(Optimizations::REMOVE_ECC) {
            output[0x81C..0x930].copy_from_slice(&input[read..read + 0x114]);
            read += 0x114;
        } else {
            // XA parity is computed over a zeroed address field.
            self.ecc_write_sector(&ZERO_ADDRESS, output);
        }

        read
    }

    fn decode_sector_mode_2_xa_2(
        &self,
        input: &[u8],
        output: &mut [u8; SECTOR_SIZE],
        sector_type: SectorType,
        mut read: usize,
        options: Optimizations,
    ) -> usize {
        if !options.contains(Optimizations::REMOVE_MODE) {
            output[0x00F] = input[read];
            read += 0x001;
        } else {
            output[0x00F] = 0x02;
        }

        read = decode_subheader(input, output, read, options);

        if sector_type == SectorType::Mode2Xa2 || !options.contains(Optimizations::REMOVE_GAP) {
            output[0x018..0x92C].copy_from_slice(&input[read..read + 0x914]);
            read += 0x914;
        } else {
            output[0x018..0x92C].fill(0);
        }

        if !options.contains(Optimizations::REMOVE_EDC) {
            output[0x92C..0x930].copy_from_slice(&input[read..read + 0x004]);
            read += 0x004;
        } else {
            let edc = self.edc_compute(&output[0x010..0x92C]);
            put32lsb(&mut output[0x92C..0x930], edc);
        }

        read
    }
}

fn encode_sector_cdda(
    sector: &[u8; SECTOR_SIZE],
    output: &mut [u8],
    sector_type: SectorType,
    options: Optimizations,
) -> usize {
    // Audio is raw data; only a fully zeroed sector can be elided.
    if sector_type == SectorType::Cdda || !options.contains(Optimizations::REMOVE_GAP) {
        output[..SECTOR_SIZE].copy_from_slice(sector);
        SECTOR_SIZE
    } else {
        0
    }
}

fn encode_sector_mode_1(
    sector: &[u8; SECTOR_SIZE],
    output: &mut [u8],
    sector_type: SectorType,
    options: Optimizations,
) -> usize {
    let mut written = 0;

    if !options.contains(Optimizations::REMOVE_SYNC) {
        output[written..written + 0x00C].copy_from_slice(&sector[0x000..0x00C]);
        written += 0x00C;
    }
    if !options.contains(Optimizations::REMOVE_MSF) {
        output[written..written + 0x003].copy_from_slice(&sector[0x00C..0x00F]);
        written += 0x003;
    }
    if !options.contains(Optimizations::REMOVE_MODE) {
        output[written] = sector[0x00F];
        written += 0x001;
    }
    if matches!(sector_type, SectorType::Mode1 | SectorType::Mode1Raw)
        || !options.contains(Optimizations::REMOVE_GAP)
    {
        output[written..written + 0x800].copy_from_slice(&sector[0x010..0x810]);
        written += 0x800;
    }
    // A raw sector's checksums do not verify, so they cannot be regenerated
    // and must survive any option set.
    if !options.contains(Optimizations::REMOVE_EDC) || sector_type == SectorType::Mode1Raw {
        output[written..written + 0x004].copy_from_slice(&sector[0x810..0x814]);
        written += 0x004;
    }
    if !options.contains(Optimizations::REMOVE_BLANKS) {
        output[written..written + 0x008].copy_from_slice(&sector[0x814..0x81C]);
        written += 0x008;
    }
    if !options.contains(Optimizations::REMOVE_ECC) || sector_type == SectorType::Mode1Raw {
        output[written..written + 0x114].copy_from_slice(&sector[0x81C..0x930]);
        written += 0x114;
    }

    written
}

fn encode_sector_mode_2(
    sector: &[u8; SECTOR_SIZE],
    output: &mut [u8],
    sector_type: SectorType,
    options: Optimizations,
) -> usize {
    let mut written = 0;

    if !options.contains(Optimizations::REMOVE_SYNC) {
        output[written..written + 0x00C].copy_from_slice(&sector[0x000..0x00C]);
        written += 0x00C;
    }
    if !options.contains(Optimizations::REMOVE_MSF) {
        output[written..written + 0x003].copy_from_slice(&sector[0x00C..0x00F]);
        written += 0x003;
    }
    if !options.contains(Optimizations::REMOVE_MODE) {
        output[written] = sector[0x00F];
        written += 0x001;
    }
    if sector_type == SectorType::Mode2 || !options.contains(Optimizations::REMOVE_GAP) {
        output[written..written + 0x920].copy_from_slice(&sector[0x010..0x930]);
        written += 0x920;
    }

    written
}

fn encode_sector_mode_2_xa_gap(
    sector: &[u8; SECTOR_SIZE],
    output: &mut [u8],
    options: Optimizations,
) -> usize {
    let mut written = 0;

    if !options.contains(Optimizations::REMOVE_SYNC) {
        output[written..written + 0x00C].copy_from_slice(&sector[0x000..0x00C]);
        written += 0x00C;
    }
    if !options.contains(Optimizations::REMOVE_MSF) {
        output[written..written + 0x003].copy_from_slice(&sector[0x00C..0x00F]);
        written += 0x003;
    }
    if !options.contains(Optimizations::REMOVE_MODE) {
        output[written] = sector[0x00F];
        written += 0x001;
    }
    written += encode_subheader(sector, &mut output[written..], options);
    if !options.contains(Optimizations::REMOVE_GAP) {
        output[written..written + 0x918].copy_from_slice(&sector[0x018..0x930]);
        written += 0x918;
    }

    written
}

fn encode_sector_mode_2_xa_1(
    sector: &[u8; SECTOR_SIZE],
    output: &mut [u8],
    sector_type: SectorType,
    options: Optimizations,
) -> usize {
    let mut written = 0;

    if !options.contains(Optimizations::REMOVE_SYNC) {
        output[written..written + 0x00C].copy_from_slice(&sector[0x000..0x00C]);
        written += 0x00C;
    }
    if !options.contains(Optimizations::REMOVE_MSF) {
        output[written..written + 0x003].copy_from_slice(&sector[0x00C..0x00F]);
        written += 0x003;
    }
    if !options.contains(Optimizations::REMOVE_MODE) {
        output[written] = sector[0x00F];
        written += 0x001;
    }
    written += encode_subheader(sector, &mut output[written..], options);
    if sector_type == SectorType::Mode2Xa1 || !options.contains(Optimizations::REMOVE_GAP) {
        output[written..written + 0x800].copy_from_slice(&sector[0x018..0x818]);
        written += 0x800;
    }
    if !options.contains(Optimizations::REMOVE_EDC) {
        output[written..written + 0x004].copy_from_slice(&sector[0x818..0x81C]);
        written += 0x004;
    }
    if !options.contains(Optimizations::REMOVE_ECC) {
        output[written..written + 0x114].copy_from_slice(&sector[0x81C..0x930]);
        written += 0x114;
    }

    written
}

fn encode_sector_mode_2_xa_2(
    sector: &[u8; SECTOR_SIZE],
    output: &mut [u8],
    sector_type: SectorType,
    options: Optimizations,
) -> usize {
    let mut written = 0;

    if !options.contains(Optimizations::REMOVE_SYNC) {
        output[written..written + 0x00C].copy_from_slice(&sector[0x000..0x00C]);
        written += 0x00C;
    }
    if !options.contains(Optimizations::REMOVE_MSF) {
        output[written..written + 0x003].copy_from_slice(&sector[0x00C..0x00F]);
        written += 0x003;
    }
    if !options.contains(Optimizations::REMOVE_MODE) {
        output[written] = sector[0x00F];
        written += 0x001;
    }
    written += encode_subheader(sector, &mut output[written..], options);
    if sector_type == SectorType::Mode2Xa2 || !options.contains(Optimizations::REMOVE_GAP) {
        output[written..written + 0x914].copy_from_slice(&sector[0x018..0x92C]);
        written += 0x914;
    }
    if !options.contains(Optimizations::REMOVE_EDC) {
        output[written..written + 0x004].copy_from_slice(&sector[0x92C..0x930]);
        written += 0x004;
    }

    written
}

fn encode_sector_mode_x(
    sector: &[u8; SECTOR_SIZE],
    output: &mut [u8],
    options: Optimizations,
) -> usize {
    let mut written = 0;

    if !options.contains(Optimizations::REMOVE_SYNC) {
        output[written..written + 0x00C].copy_from_slice(&sector[0x000..0x00C]);
        written += 0x00C;
    }
    if !options.contains(Optimizations::REMOVE_MSF) {
        output[written..written + 0x003].copy_from_slice(&sector[0x00C..0x00F]);
        written += 0x003;
    }
    // The mode byte is unrecognized, keep everything from it onwards.
    output[written..written + 0x921].copy_from_slice(&sector[0x00F..0x930]);
    written += 0x921;

    written
}

/// Emit the XA sub-header, either both copies or just the first one.
fn encode_subheader(sector: &[u8; SECTOR_SIZE], output: &mut [u8], options: Optimizations) -> usize {
    if !options.contains(Optimizations::REMOVE_REDUNDANT_FLAG) {
        output[..0x008].copy_from_slice(&sector[0x010..0x018]);
        0x008
    } else {
        output[..0x004].copy_from_slice(&sector[0x010..0x014]);
        0x004
    }
}

/// Restore the XA sub-header, mirroring the first copy when the redundant one
/// was removed.
fn decode_subheader(
    input: &[u8],
    output: &mut [u8; SECTOR_SIZE],
    mut read: usize,
    options: Optimizations,
) -> usize {
    if !options.contains(Optimizations::REMOVE_REDUNDANT_FLAG) {
        output[0x010..0x018].copy_from_slice(&input[read..read + 0x008]);
        read += 0x008;
    } else {
        output[0x010..0x014].copy_from_slice(&input[read..read + 0x004]);
        output.copy_within(0x010..0x014, 0x014);
        read += 0x004;
    }

    read
}

fn decode_sector_cdda(
    input: &[u8],
    output: &mut [u8; SECTOR_SIZE],
    sector_type: SectorType,
    options: Optimizations,
) -> usize {
    if sector_type == SectorType::Cdda || !options.contains(Optimizations::REMOVE_GAP) {
        output.copy_from_slice(&input[..SECTOR_SIZE]);
        SECTOR_SIZE
    } else {
        output.fill(0);
        0
    }
}

fn decode_sector_mode_2(
    input: &[u8],
    output: &mut [u8; SECTOR_SIZE],
    sector_type: SectorType,
    mut read: usize,
    options: Optimizations,
) -> usize {
    if !options.contains(Optimizations::REMOVE_MODE) {
        output[0x00F] = input[read];
        read += 0x001;
    } else {
        output[0x00F] = 0x02;
    }

    if sector_type == SectorType::Mode2 || !options.contains(Optimizations::REMOVE_GAP) {
        output[0x010..0x930].copy_from_slice(&input[read..read + 0x920]);
        read += 0x920;
    } else {
        output[0x010..0x930].fill(0);
    }

    read
}

fn decode_sector_mode_2_xa_gap(
    input: &[u8],
    output: &mut [u8; SECTOR_SIZE],
    mut read: usize,
    options: Optimizations,
) -> usize {
    if !options.contains(Optimizations::REMOVE_MODE) {
        output[0x00F] = input[read];
        read += 0x001;
    } else {
        output[0x00F] = 0x02;
    }

    read = decode_subheader(input, output, read, options);

    if !options.contains(Optimizations::REMOVE_GAP) {
        output[0x018..0x930].copy_from_slice(&input[read..read + 0x918]);
        read += 0x918;
    } else {
        output[0x018..0x930].fill(0);
    }

    read
}

fn decode_sector_mode_x(input: &[u8], output: &mut [u8; SECTOR_SIZE], mut read: usize) -> usize {
    output[0x00F..0x930].copy_from_slice(&input[read..read + 0x921]);
    read += 0x921;

    read
}
