//! Run-length packing of the per-sector type index.
//!
//! Each record is one tag byte followed by `count_bytes` little-endian bytes
//! holding `run_length - 1`. A run longer than the largest representable
//! length is split into several records. `count_bytes` is a stream-level
//! constant between 1 and 4.

use crate::cd::SectorType;
use crate::ecm::error::{EcmError, EcmResult};

/// Pack a sector index into run-length records using `count_bytes` bytes per
/// run count.
pub fn pack_index(index: &[SectorType], count_bytes: u8) -> Vec<u8> {
    let count_bytes = count_bytes.clamp(1, 4) as usize;
    let max_run = max_run_length(count_bytes);

    let mut packed = Vec::new();
    let mut entries = index.iter();

    let Some(&first) = entries.next() else {
        return packed;
    };

    let mut current = first;
    let mut run: u32 = 1;
    for &tag in entries {
        if tag == current && run < max_run {
            run += 1;
        } else {
            push_record(&mut packed, current, run, count_bytes);
            current = tag;
            run = 1;
        }
    }
    push_record(&mut packed, current, run, count_bytes);

    packed
}

/// Expand run-length records back into the per-sector index.
pub fn unpack_index(packed: &[u8], count_bytes: u8) -> EcmResult<Vec<SectorType>> {
    let count_bytes = count_bytes.clamp(1, 4) as usize;
    let record_size = count_bytes + 1;

    if packed.len() % record_size != 0 {
        return Err(EcmError::HeaderInvalid);
    }

    let mut index = Vec::new();
    for record in packed.chunks_exact(record_size) {
        let tag = SectorType::from_tag(record[0]).ok_or(EcmError::HeaderInvalid)?;

        let mut raw = [0u8; 4];
        raw[..count_bytes].copy_from_slice(&record[1..]);
        let run = u32::from_le_bytes(raw) as usize + 1;

        index.extend(std::iter::repeat(tag).take(run));
    }

    Ok(index)
}

fn max_run_length(count_bytes: usize) -> u32 {
    if count_bytes >= 4 {
        u32::MAX
    } else {
        (1u32 << (count_bytes * 8)) - 1
    }
}

fn push_record(packed: &mut Vec<u8>, tag: SectorType, run: u32, count_bytes: usize) {
    packed.push(tag.to_tag());
    let count = (run - 1).to_le_bytes();
    packed.extend_from_slice(&count[..count_bytes]);
}
