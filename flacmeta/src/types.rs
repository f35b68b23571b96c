use crate::error::*;
use byteorder::{ByteOrder, BE, LE};
use std::fmt;

pub const MAGIC: &[u8; 4] = b"fLaC";
pub const HEADER_SIZE: usize = 4;
pub const BLOCK_TYPE_COUNT: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    StreamInfo,
    Padding,
    Application,
    SeekTable,
    VorbisComment,
    CueSheet,
    Picture,
    /// Codes 7 to 126, not assigned by the format.
    Reserved(u8),
    /// Code 127.
    Invalid,
}

impl BlockType {
    pub fn from_code(code: u8) -> Self {
        use BlockType::*;

        match code {
            0 => StreamInfo,
            1 => Padding,
            2 => Application,
            3 => SeekTable,
            4 => VorbisComment,
            5 => CueSheet,
            6 => Picture,
            7..=126 => Reserved(code),
            _ => Invalid,
        }
    }

    pub fn code(&self) -> u8 {
        use BlockType::*;

        match *self {
            StreamInfo => 0,
            Padding => 1,
            Application => 2,
            SeekTable => 3,
            VorbisComment => 4,
            CueSheet => 5,
            Picture => 6,
            Reserved(code) => code,
            Invalid => 127,
        }
    }

    /// Slot in the per-type block counters, for the seven defined types.
    pub fn index(&self) -> Option<usize> {
        match self {
            BlockType::Reserved(_) | BlockType::Invalid => None,
            other => Some(other.code() as usize),
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BlockType::*;

        match self {
            StreamInfo => write!(f, "STREAMINFO"),
            Padding => write!(f, "PADDING"),
            Application => write!(f, "APPLICATION"),
            SeekTable => write!(f, "SEEKTABLE"),
            VorbisComment => write!(f, "VORBIS_COMMENT"),
            CueSheet => write!(f, "CUESHEET"),
            Picture => write!(f, "PICTURE"),
            Reserved(code) => write!(f, "RESERVED({})", code),
            Invalid => write!(f, "INVALID"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub is_last: bool,
    pub block_type: BlockType,
    pub length: u32,
}

impl BlockHeader {
    /// Splits a big-endian header word into its 1/7/24-bit fields.
    pub fn from_bytes(data: [u8; HEADER_SIZE]) -> Self {
        let word = BE::read_u32(&data);

        Self {
            is_last: (word >> 31) != 0,
            block_type: BlockType::from_code(((word >> 24) & 0x7f) as u8),
            length: word & 0x00ff_ffff,
        }
    }
}

/// Consumes a little-endian u32 from the front of `data`.
///
/// `total` is the length of the whole payload, used to report the offset of
/// a failed read.
pub fn read_u32_le(data: &mut &[u8], total: usize, field: &'static str) -> Result<u32> {
    let bytes = take(data, 4, total, field)?;
    Ok(LE::read_u32(bytes))
}

/// Consumes a u32-LE length prefix and that many bytes.
pub fn read_lstring<'a>(
    data: &mut &'a [u8],
    total: usize,
    field: &'static str,
) -> Result<&'a [u8]> {
    let len = read_u32_le(data, total, field)? as usize;
    take(data, len, total, field)
}

fn take<'a>(data: &mut &'a [u8], len: usize, total: usize, field: &'static str) -> Result<&'a [u8]> {
    if data.len() < len {
        return Err(FlacError::CommentOverrun {
            field,
            offset: total - data.len(),
            wanted: len,
            available: data.len(),
        });
    }

    let (head, rest) = data.split_at(len);
    *data = rest;
    Ok(head)
}
