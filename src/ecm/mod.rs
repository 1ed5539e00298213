use crate::cd::msf::IMAGE_START_SECTOR;
use crate::cd::{SectorType, SECTOR_SIZE};
use crate::ecm::error::{EcmError, EcmResult};
use crate::ecm::models::{EcmFileHeader, Optimizations, ECM_FILE_HEADER_SIZE, MAX_IMAGE_SECTORS};
use crate::ecm::processor::EcmProcessor;
use binrw::{BinRead, BinWrite};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{debug, info};
use std::io::Cursor;
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt, BufReader, BufWriter};

pub mod error;
pub mod index;
pub mod models;
pub mod processor;

/// Sectors processed per chunk while streaming a file through the codec.
const BUFFER_SECTORS: usize = 100;

const BUFFER_SIZE: usize = BUFFER_SECTORS * SECTOR_SIZE;

/// Losslessly encode a raw CD-ROM image into an ECM2 file.
///
/// The image is walked twice: the first pass classifies every sector and
/// shrinks the optimization set to the largest subset that stays lossless for
/// the whole stream, the second pass writes the header, the packed index and
/// the encoded sectors.
pub async fn encode_image(
    pb: MultiProgress,
    input_path: PathBuf,
    output_path: PathBuf,
) -> EcmResult<()> {
    let input_size = tokio::fs::metadata(&input_path).await?.len();
    if input_size % SECTOR_SIZE as u64 != 0 {
        return Err(EcmError::InputUnderflow);
    }
    let sectors = (input_size / SECTOR_SIZE as u64) as u32;

    debug!("Input image: {:?}, {} sectors", input_path, sectors);

    let processor = EcmProcessor::new();
    let mut reader = BufReader::with_capacity(8 * 1024 * 1024, File::open(&input_path).await?);

    let mut index = vec![SectorType::Unknown; sectors as usize];
    let mut options = Optimizations::all();

    let mut input_buffer = vec![0u8; BUFFER_SIZE];
    let mut output_buffer = vec![0u8; BUFFER_SIZE];

    // Pass 1: classify the whole image and negotiate the optimization set.
    // The encoded bytes are thrown away since early chunks may still have
    // been produced with options a later sector turns off.
    let pg = pb.add(ProgressBar::new(input_size));
    pg.set_style(progress_style()?);
    pg.set_message("Analyzing sectors");

    let mut offset = 0usize;
    while offset < sectors as usize {
        let chunk = BUFFER_SECTORS.min(sectors as usize - offset);
        let bytes = chunk * SECTOR_SIZE;
        reader.read_exact(&mut input_buffer[..bytes]).await?;

        processor.encode_stream(
            &input_buffer[..bytes],
            &mut output_buffer,
            &mut index[offset..offset + chunk],
            chunk as u32,
            IMAGE_START_SECTOR + offset as u32,
            &mut options,
            true,
        )?;

        pg.inc(bytes as u64);
        offset += chunk;
    }
    pg.finish_and_clear();

    debug!("Negotiated optimizations: {:?}", options);

    // Pick whichever run count width packs this image's index smallest.
    let mut index_pack_mode = 1u8;
    let mut packed_index = index::pack_index(&index, index_pack_mode);
    for mode in 2..=3u8 {
        let candidate = index::pack_index(&index, mode);
        if candidate.len() < packed_index.len() {
            index_pack_mode = mode;
            packed_index = candidate;
        }
    }

    debug!(
        "Packed {} index entries with {}-byte run counts",
        packed_index.len() / (index_pack_mode as usize + 1),
        index_pack_mode
    );

    let header = EcmFileHeader {
        optimizations: options.bits(),
        index_pack_mode,
        index_entries: (packed_index.len() / (index_pack_mode as usize + 1)) as u32,
        sectors,
    };

    let mut writer =
        BufWriter::with_capacity(8 * 1024 * 1024, File::create(&output_path).await?);

    let mut header_data = Cursor::new(Vec::new());
    header.write(&mut header_data)?;
    writer.write_all(&header_data.into_inner()).await?;
    writer.write_all(&packed_index).await?;

    // Pass 2: encode for real with the final optimization set.
    let pg = pb.add(ProgressBar::new(input_size));
    pg.set_style(progress_style()?);
    pg.set_message("Encoding sectors");

    reader.seek(std::io::SeekFrom::Start(0)).await?;

    let mut offset = 0usize;
    while offset < sectors as usize {
        let chunk = BUFFER_SECTORS.min(sectors as usize - offset);
        let bytes = chunk * SECTOR_SIZE;
        reader.read_exact(&mut input_buffer[..bytes]).await?;

        let written = processor.encode_stream(
            &input_buffer[..bytes],
            &mut output_buffer,
            &mut index[offset..offset + chunk],
            chunk as u32,
            IMAGE_START_SECTOR + offset as u32,
            &mut options,
            false,
        )?;
        writer.write_all(&output_buffer[..written]).await?;

        pg.inc(bytes as u64);
        offset += chunk;
    }
    pg.finish_and_clear();

    writer.flush().await?;

    let encoded_size = tokio::fs::metadata(&output_path).await?.len();
    let saved = input_size.saturating_sub(encoded_size);
    info!(
        "Original: {:.2} MB, ECM2: {:.2} MB, Saved: {:.2} MB ({:.1}% of the original size)",
        input_size as f64 / (1000.0 * 1000.0),
        encoded_size as f64 / (1000.0 * 1000.0),
        saved as f64 / (1000.0 * 1000.0),
        (encoded_size as f64 / input_size as f64) * 100.0
    );

    Ok(())
}

/// Decode an ECM2 file back into the original raw CD-ROM image.
pub async fn decode_image(
    pb: MultiProgress,
    input_path: PathBuf,
    output_path: PathBuf,
) -> EcmResult<()> {
    let mut reader = BufReader::with_capacity(8 * 1024 * 1024, File::open(&input_path).await?);

    let mut header_bytes = [0u8; ECM_FILE_HEADER_SIZE];
    reader
        .read_exact(&mut header_bytes)
        .await
        .map_err(map_eof_to_underflow)?;
    let header = EcmFileHeader::read(&mut Cursor::new(&header_bytes))
        .map_err(|_| EcmError::HeaderInvalid)?;

    debug!(
        "Optimizations: {}, Sectors: {}, Index entries: {}, Index pack mode: {}",
        header.optimizations, header.sectors, header.index_entries, header.index_pack_mode
    );

    let options =
        Optimizations::from_bits(header.optimizations).ok_or(EcmError::HeaderInvalid)?;
    if header.sectors > MAX_IMAGE_SECTORS
        || !(1..=4).contains(&header.index_pack_mode)
        || header.index_entries > header.sectors
    {
        return Err(EcmError::HeaderInvalid);
    }

    let mut packed_index =
        vec![0u8; header.index_entries as usize * (header.index_pack_mode as usize + 1)];
    reader
        .read_exact(&mut packed_index)
        .await
        .map_err(map_eof_to_underflow)?;

    let index = index::unpack_index(&packed_index, header.index_pack_mode)?;
    if index.len() != header.sectors as usize {
        return Err(EcmError::HeaderInvalid);
    }

    let processor = EcmProcessor::new();
    let mut writer =
        BufWriter::with_capacity(8 * 1024 * 1024, File::create(&output_path).await?);

    let mut input_buffer = vec![0u8; BUFFER_SIZE];
    let mut output_buffer = vec![0u8; BUFFER_SIZE];

    let pg = pb.add(ProgressBar::new(index.len() as u64 * SECTOR_SIZE as u64));
    pg.set_style(progress_style()?);
    pg.set_message("Decoding sectors");

    let mut offset = 0usize;
    while offset < index.len() {
        let chunk = BUFFER_SECTORS.min(index.len() - offset);
        let chunk_index = &index[offset..offset + chunk];

        // The index is the only source of per-sector sizing on this side.
        let bytes_to_read: usize = chunk_index
            .iter()
            .map(|&sector_type| EcmProcessor::encoded_sector_size(sector_type, options))
            .sum();
        reader
            .read_exact(&mut input_buffer[..bytes_to_read])
            .await
            .map_err(map_eof_to_underflow)?;

        processor.decode_stream(
            &input_buffer[..bytes_to_read],
            &mut output_buffer,
            chunk_index,
            chunk as u32,
            IMAGE_START_SECTOR + offset as u32,
            options,
        )?;
        writer.write_all(&output_buffer[..chunk * SECTOR_SIZE]).await?;

        pg.inc((chunk * SECTOR_SIZE) as u64);
        offset += chunk;
    }
    pg.finish_and_clear();

    // Payload bytes beyond the last indexed sector mean the index and the
    // stream disagree.
    let mut trailing = [0u8; 1];
    if reader.read(&mut trailing).await? != 0 {
        return Err(EcmError::InputUnderflow);
    }

    writer.flush().await?;

    info!(
        "Restored {} sectors ({:.2} MB)",
        index.len(),
        (index.len() * SECTOR_SIZE) as f64 / (1000.0 * 1000.0)
    );

    Ok(())
}

fn progress_style() -> EcmResult<ProgressStyle> {
    Ok(ProgressStyle::default_bar()
        .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({eta})")?
        .progress_chars("#>-"))
}

fn map_eof_to_underflow(error: std::io::Error) -> EcmError {
    if error.kind() == std::io::ErrorKind::UnexpectedEof {
        EcmError::InputUnderflow
    } else {
        EcmError::IoError(error)
    }
}
