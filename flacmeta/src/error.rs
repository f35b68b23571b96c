use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Broad classes of parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The byte source could not be opened, measured or fully read.
    SourceAccess,
    /// The input is not a FLAC stream, or uses an invalid block type.
    Format,
    /// A block is misplaced or its contents are inconsistent.
    Structural,
}

#[derive(Error, Debug)]
pub enum FlacError {
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("truncated {context} at offset {offset}: wanted {wanted} bytes, {available} available")]
    UnexpectedEof {
        context: &'static str,
        offset: u64,
        wanted: u64,
        available: u64,
    },

    #[error("not a FLAC file: magic was {0:02x?}")]
    InvalidMagic([u8; 4]),
    #[error("invalid block type {block_type} at offset {offset}")]
    InvalidBlockType { block_type: u8, offset: u64 },
    #[error("reserved block type {block_type} at offset {offset}")]
    ReservedBlockType { block_type: u8, offset: u64 },

    #[error("STREAMINFO at offset {offset} is not the first metadata block")]
    StreamInfoNotFirst { offset: u64 },
    #[error("duplicate STREAMINFO at offset {offset}")]
    DuplicateStreamInfo { offset: u64 },
    #[error("STREAMINFO is {0} bytes, expected at least 34")]
    StreamInfoTooShort(usize),
    #[error("minimum block size {0} is below 16")]
    MinBlockSizeTooSmall(u16),
    #[error("maximum block size {0} is above 65535")]
    MaxBlockSizeTooLarge(u32),
    #[error("minimum block size {min} exceeds maximum block size {max}")]
    BlockSizeOrder { min: u16, max: u16 },
    #[error("sample rate {0} is outside 1..=655350")]
    InvalidSampleRate(u32),
    #[error("audio checksum {0:?} is not 32 lowercase hex characters")]
    InvalidChecksum(String),
    #[error("VORBIS_COMMENT {field} at payload offset {offset} wants {wanted} bytes, {available} left")]
    CommentOverrun {
        field: &'static str,
        offset: usize,
        wanted: usize,
        available: usize,
    },
    #[error("VORBIS_COMMENT entry {index} has no '=' delimiter")]
    MissingDelimiter { index: u32 },
}

impl FlacError {
    pub fn kind(&self) -> ErrorKind {
        use FlacError::*;

        match self {
            Open { .. } | Io(_) | UnexpectedEof { .. } => ErrorKind::SourceAccess,
            InvalidMagic(_) | InvalidBlockType { .. } | ReservedBlockType { .. } => ErrorKind::Format,
            StreamInfoNotFirst { .. }
            | DuplicateStreamInfo { .. }
            | StreamInfoTooShort(_)
            | MinBlockSizeTooSmall(_)
            | MaxBlockSizeTooLarge(_)
            | BlockSizeOrder { .. }
            | InvalidSampleRate(_)
            | InvalidChecksum(_)
            | CommentOverrun { .. }
            | MissingDelimiter { .. } => ErrorKind::Structural,
        }
    }
}

pub type Result<T> = std::result::Result<T, FlacError>;
