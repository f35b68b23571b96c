//! Reads the metadata blocks of FLAC files without decoding audio.
//!
//! STREAMINFO and VORBIS_COMMENT blocks are decoded; every other block type is
//! counted and skipped.

mod blocks;
mod error;
mod scanner;
mod types;

pub use blocks::{StreamInfo, VorbisComment, MAX_BLOCK_SIZE, MAX_SAMPLE_RATE, MIN_BLOCK_SIZE};
pub use error::*;
pub use scanner::{BlockInfo, MetadataSnapshot};
pub use types::{BlockHeader, BlockType, BLOCK_TYPE_COUNT, MAGIC};

use log::debug;
use scanner::BlockScanner;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// How to treat block type codes 7 to 126.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservedBlocks {
    Skip,
    Reject,
}

#[derive(Debug, Clone)]
pub struct FlacReader {
    reserved_blocks: ReservedBlocks,
    read_comments: bool,
}

impl Default for FlacReader {
    fn default() -> Self {
        Self {
            reserved_blocks: ReservedBlocks::Skip,
            read_comments: true,
        }
    }
}

impl FlacReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reserved_blocks(mut self, policy: ReservedBlocks) -> Self {
        self.reserved_blocks = policy;
        self
    }

    /// When disabled, VORBIS_COMMENT blocks are counted but not decoded.
    pub fn read_comments(mut self, enabled: bool) -> Self {
        self.read_comments = enabled;
        self
    }

    pub fn open(&self, path: impl AsRef<Path>) -> Result<FlacFile> {
        let path = path.as_ref();
        debug!("opening {}", path.display());

        let file = File::open(path).map_err(|source| FlacError::Open {
            path: path.to_owned(),
            source,
        })?;
        let file_size = file.metadata()?.len();

        let mut source = BufReader::new(file);
        let metadata = self.read_sized(&mut source, file_size)?;

        Ok(FlacFile {
            path: path.to_owned(),
            file_size,
            metadata,
        })
    }

    /// Reads the metadata of a stream starting at the current position of
    /// `source` and ending at its end.
    pub fn read<R: Read + Seek>(&self, mut source: R) -> Result<MetadataSnapshot> {
        let start = source.seek(SeekFrom::Current(0))?;
        let end = source.seek(SeekFrom::End(0))?;
        source.seek(SeekFrom::Start(start))?;
        // a source seeked past its end has nothing left to read
        self.read_sized(&mut source, end.saturating_sub(start))
    }

    fn read_sized<R: Read + Seek>(&self, source: &mut R, size: u64) -> Result<MetadataSnapshot> {
        let mut scanner = BlockScanner::new(source, size, self);
        scanner.check_magic()?;
        scanner.scan()
    }
}

#[derive(Debug, Clone)]
pub struct FlacFile {
    path: PathBuf,
    file_size: u64,
    metadata: MetadataSnapshot,
}

impl FlacFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        FlacReader::default().open(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    pub fn metadata(&self) -> &MetadataSnapshot {
        &self.metadata
    }

    pub fn block_counts(&self) -> [u32; BLOCK_TYPE_COUNT] {
        self.metadata.block_counts
    }

    pub fn stream_info(&self) -> Option<&StreamInfo> {
        self.metadata.stream_info.as_ref()
    }

    pub fn min_block_size(&self) -> Option<u16> {
        self.stream_info().map(|s| s.min_block_size)
    }

    pub fn max_block_size(&self) -> Option<u16> {
        self.stream_info().map(|s| s.max_block_size)
    }

    pub fn min_frame_size(&self) -> Option<u32> {
        self.stream_info().map(|s| s.min_frame_size)
    }

    pub fn max_frame_size(&self) -> Option<u32> {
        self.stream_info().map(|s| s.max_frame_size)
    }

    pub fn sample_rate(&self) -> Option<u32> {
        self.stream_info().map(|s| s.sample_rate)
    }

    pub fn channels(&self) -> Option<u8> {
        self.stream_info().map(|s| s.channels)
    }

    pub fn bits_per_sample(&self) -> Option<u8> {
        self.stream_info().map(|s| s.bits_per_sample)
    }

    pub fn total_samples(&self) -> Option<u64> {
        self.stream_info().map(|s| s.total_samples)
    }

    pub fn duration(&self) -> Option<f64> {
        self.stream_info().map(StreamInfo::duration)
    }

    pub fn md5(&self) -> Option<&str> {
        self.stream_info().map(|s| s.md5.as_str())
    }

    pub fn comment(&self) -> Option<&VorbisComment> {
        self.metadata.comment.as_ref()
    }
}
