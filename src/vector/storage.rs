//! Binary persistence for flat vector sets.
//!
//! # Storage Format
//!
//! The file is self-describing and written as a single unit:
//! - Header (16 bytes): magic `PVEC`, version, dimension, vector count
//! - Vectors: contiguous f32 values in little-endian order, in id order
//!
//! Ids are not stored. A vector's id is its position in the file, which is
//! the same position its document occupies in the document store.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use crate::vector::types::{VectorDimension, VectorError};

/// Current storage format version.
const STORAGE_VERSION: u32 = 1;

/// Size of the storage header in bytes.
const HEADER_SIZE: usize = 16;

/// Magic bytes to identify vector files.
const MAGIC_BYTES: &[u8; 4] = b"PVEC";

/// Number of bytes per f32 value.
const BYTES_PER_F32: usize = 4;

/// Header fields of a vector file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorFileHeader {
    pub version: u32,
    pub dimension: VectorDimension,
    pub vector_count: usize,
}

/// Writes a flat vector set to `path`, replacing any existing file.
///
/// `data` holds `vector_count * dimension` values laid out row by row.
pub fn write_vector_file(
    path: &Path,
    dimension: VectorDimension,
    data: &[f32],
) -> Result<(), VectorError> {
    let dim = dimension.get();
    if data.len() % dim != 0 {
        return Err(VectorError::InvalidFormat(format!(
            "{} values do not form whole vectors of dimension {dim}",
            data.len()
        )));
    }
    let vector_count = data.len() / dim;
    let count = u32::try_from(vector_count).map_err(|_| VectorError::IdExhausted(vector_count))?;
    let dim_u32 = u32::try_from(dim).map_err(|_| VectorError::InvalidDimension {
        dimension: dim,
        reason: "Vector dimension does not fit the file header",
    })?;

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writer.write_all(MAGIC_BYTES)?;
    writer.write_all(&STORAGE_VERSION.to_le_bytes())?;
    writer.write_all(&dim_u32.to_le_bytes())?;
    writer.write_all(&count.to_le_bytes())?;

    for &value in data {
        writer.write_all(&value.to_le_bytes())?;
    }

    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    Ok(())
}

/// Reads a vector file written by [`write_vector_file`].
///
/// Returns the header and the flat vector data. The file length must match
/// the header exactly; truncated or padded files are rejected.
pub fn read_vector_file(path: &Path) -> Result<(VectorFileHeader, Vec<f32>), VectorError> {
    let bytes = std::fs::read(path).map_err(|e| not_found_context(e, path))?;

    let header = read_header(&bytes)?;
    check_length(&header, bytes.len())?;

    let data = bytes[HEADER_SIZE..]
        .chunks_exact(BYTES_PER_F32)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();

    Ok((header, data))
}

/// Reads and validates only the header, checking the file length against it.
pub fn read_vector_header(path: &Path) -> Result<VectorFileHeader, VectorError> {
    let mut file = File::open(path).map_err(|e| not_found_context(e, path))?;
    let file_len = file.metadata()?.len();

    let mut bytes = Vec::with_capacity(HEADER_SIZE);
    (&mut file).take(HEADER_SIZE as u64).read_to_end(&mut bytes)?;
    let header = read_header(&bytes)?;

    let file_len = usize::try_from(file_len)
        .map_err(|_| VectorError::InvalidFormat("Vector file too large".to_string()))?;
    check_length(&header, file_len)?;
    Ok(header)
}

fn not_found_context(error: io::Error, path: &Path) -> VectorError {
    if error.kind() == io::ErrorKind::NotFound {
        VectorError::Storage(io::Error::new(
            io::ErrorKind::NotFound,
            format!("Vector file not found: {}", path.display()),
        ))
    } else {
        VectorError::Storage(error)
    }
}

fn check_length(header: &VectorFileHeader, actual: usize) -> Result<(), VectorError> {
    let dim = header.dimension.get();
    let expected = header
        .vector_count
        .checked_mul(dim)
        .and_then(|values| values.checked_mul(BYTES_PER_F32))
        .and_then(|bytes| bytes.checked_add(HEADER_SIZE))
        .ok_or_else(|| VectorError::InvalidFormat("Header sizes overflow".to_string()))?;

    if actual != expected {
        return Err(VectorError::InvalidFormat(format!(
            "Expected {expected} bytes for {} vectors of dimension {dim}, found {actual}",
            header.vector_count
        )));
    }
    Ok(())
}

fn read_header(bytes: &[u8]) -> Result<VectorFileHeader, VectorError> {
    if bytes.len() < HEADER_SIZE {
        return Err(VectorError::InvalidFormat(
            "File too small to contain header".to_string(),
        ));
    }

    if &bytes[0..4] != MAGIC_BYTES {
        return Err(VectorError::InvalidFormat("Invalid magic bytes".to_string()));
    }

    let version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    if version != STORAGE_VERSION {
        return Err(VectorError::VersionMismatch {
            expected: STORAGE_VERSION,
            actual: version,
        });
    }

    let dim_value = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
    let dimension = VectorDimension::new(dim_value as usize)
        .map_err(|e| VectorError::InvalidFormat(e.to_string()))?;

    let vector_count = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]) as usize;

    Ok(VectorFileHeader {
        version,
        dimension,
        vector_count,
    })
}
