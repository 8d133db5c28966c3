//! Fixed-layout point record codec.
//!
//! Each record is 19 packed little-endian bytes:
//!
//! | offset | size | field                 |
//! |--------|------|-----------------------|
//! | 0      | 12   | position (3 x `f32`)  |
//! | 12     | 4    | intensity (`i32`)     |
//! | 16     | 3    | color (3 x `u8`, RGB) |
//!
//! Records follow each other with no padding, so fields are always read by
//! byte offset rather than by overlaying a native struct.

use pts_math::Vec3;

use crate::error::{ImportError, ImportResult};

/// Size in bytes of one packed record (and the stride between records).
pub const RECORD_SIZE: usize = 3 * 4 + 4 + 3;

const POSITION_OFFSET: usize = 0;
const INTENSITY_OFFSET: usize = 12;
const COLOR_OFFSET: usize = 16;

/// One decoded point record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPointRecord {
    /// Position in source coordinates
    pub position: Vec3,

    /// Scanner return intensity (carried through, not used for rendering)
    pub intensity: i32,

    /// 8-bit RGB color
    pub color: [u8; 3],
}

impl RawPointRecord {
    pub fn new(position: Vec3, intensity: i32, color: [u8; 3]) -> Self {
        Self {
            position,
            intensity,
            color,
        }
    }

    /// Decode a record from its packed representation.
    pub fn from_bytes(bytes: &[u8; RECORD_SIZE]) -> Self {
        let x = f32::from_le_bytes(word(bytes, POSITION_OFFSET));
        let y = f32::from_le_bytes(word(bytes, POSITION_OFFSET + 4));
        let z = f32::from_le_bytes(word(bytes, POSITION_OFFSET + 8));
        let intensity = i32::from_le_bytes(word(bytes, INTENSITY_OFFSET));
        let color = [
            bytes[COLOR_OFFSET],
            bytes[COLOR_OFFSET + 1],
            bytes[COLOR_OFFSET + 2],
        ];

        Self {
            position: Vec3::new(x, y, z),
            intensity,
            color,
        }
    }

    /// Encode the record into its packed representation.
    pub fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        let mut bytes = [0u8; RECORD_SIZE];
        self.encode_into(&mut bytes);
        bytes
    }

    /// Encode the record into an existing record-sized slot.
    pub fn encode_into(&self, out: &mut [u8; RECORD_SIZE]) {
        out[POSITION_OFFSET..POSITION_OFFSET + 4].copy_from_slice(&self.position.x.to_le_bytes());
        out[POSITION_OFFSET + 4..POSITION_OFFSET + 8].copy_from_slice(&self.position.y.to_le_bytes());
        out[POSITION_OFFSET + 8..POSITION_OFFSET + 12].copy_from_slice(&self.position.z.to_le_bytes());
        out[INTENSITY_OFFSET..INTENSITY_OFFSET + 4].copy_from_slice(&self.intensity.to_le_bytes());
        out[COLOR_OFFSET..COLOR_OFFSET + 3].copy_from_slice(&self.color);
    }
}

/// Decode one record from a chunk of exactly `RECORD_SIZE` bytes.
///
/// Callers slice the chunk at a record boundary; a chunk of any other length
/// is a bug and panics.
fn record_from_chunk(chunk: &[u8]) -> RawPointRecord {
    let mut bytes = [0u8; RECORD_SIZE];
    bytes.copy_from_slice(chunk);
    RawPointRecord::from_bytes(&bytes)
}

fn word(bytes: &[u8; RECORD_SIZE], offset: usize) -> [u8; 4] {
    [
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ]
}

/// Number of bytes spanned by `count` records.
///
/// Fails with [`ImportError::RecordOverflow`] if the span does not fit in the
/// address range a slice may cover (`isize::MAX` bytes).
pub fn record_span(count: usize) -> ImportResult<usize> {
    count
        .checked_mul(RECORD_SIZE)
        .filter(|&span| isize::try_from(span).is_ok())
        .ok_or(ImportError::RecordOverflow { count })
}

/// Encode a sequence of records into one packed buffer.
pub fn encode_records(records: &[RawPointRecord]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(records.len() * RECORD_SIZE);
    for record in records {
        bytes.extend_from_slice(&record.to_bytes());
    }
    bytes
}

/// A borrowed view of `count` packed records.
#[derive(Debug, Clone, Copy)]
pub struct RecordSlice<'a> {
    bytes: &'a [u8],
    count: usize,
}

impl<'a> RecordSlice<'a> {
    /// Wrap `bytes` as `count` records.
    ///
    /// Extra trailing bytes are ignored; too few bytes for the declared count
    /// is reported as [`ImportError::Truncated`].
    pub fn new(bytes: &'a [u8], count: usize) -> ImportResult<Self> {
        let span = record_span(count)?;
        if bytes.len() < span {
            return Err(ImportError::Truncated {
                count,
                available: bytes.len(),
            });
        }

        Ok(Self {
            bytes: &bytes[..span],
            count,
        })
    }

    /// An empty view.
    pub fn empty() -> Self {
        Self { bytes: &[], count: 0 }
    }

    /// Number of records in the view.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The packed bytes covered by this view.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Decode record `index`.
    pub fn decode(&self, index: usize) -> ImportResult<RawPointRecord> {
        if index >= self.count {
            return Err(ImportError::OutOfRange {
                index,
                count: self.count,
            });
        }

        // index < count, and count * RECORD_SIZE was checked on construction
        let offset = index * RECORD_SIZE;
        Ok(record_from_chunk(&self.bytes[offset..offset + RECORD_SIZE]))
    }

    /// Iterate over all records in order.
    pub fn iter(&self) -> impl Iterator<Item = RawPointRecord> + 'a {
        self.bytes
            .chunks_exact(RECORD_SIZE)
            .map(record_from_chunk)
    }
}
