use crate::blocks::{StreamInfo, VorbisComment};
use crate::error::*;
use crate::types::*;
use crate::{FlacReader, ReservedBlocks};
use log::{debug, trace, warn};
use std::io::{self, Read, Seek, SeekFrom};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    pub block_type: BlockType,
    pub offset: u64,
    pub length: u32,
    pub is_last: bool,
}

/// Everything collected from the metadata blocks of one stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataSnapshot {
    pub block_counts: [u32; BLOCK_TYPE_COUNT],
    pub stream_info: Option<StreamInfo>,
    pub comment: Option<VorbisComment>,
    pub blocks: Vec<BlockInfo>,
    /// Offset where scanning stopped; the first audio frame when the last
    /// metadata block was seen.
    pub audio_offset: u64,
}

pub(crate) struct BlockScanner<'a, R> {
    source: &'a mut R,
    options: &'a FlacReader,
    offset: u64,
    size: u64,
    seen_any_block: bool,
    seen_stream_info: bool,
    snapshot: MetadataSnapshot,
}

impl<'a, R: Read + Seek> BlockScanner<'a, R> {
    /// `source` must be positioned at the start of the stream, `size` bytes long.
    pub(crate) fn new(source: &'a mut R, size: u64, options: &'a FlacReader) -> Self {
        Self {
            source,
            options,
            offset: 0,
            size,
            seen_any_block: false,
            seen_stream_info: false,
            snapshot: MetadataSnapshot::default(),
        }
    }

    pub(crate) fn check_magic(&mut self) -> Result<()> {
        let mut magic = [0u8; 4];
        self.read_exact(&mut magic, "magic")?;
        if &magic != MAGIC {
            return Err(FlacError::InvalidMagic(magic));
        }
        Ok(())
    }

    pub(crate) fn scan(mut self) -> Result<MetadataSnapshot> {
        while self.offset < self.size {
            let offset = self.offset;
            let mut raw = [0u8; HEADER_SIZE];
            self.read_exact(&mut raw, "block header")?;
            let header = BlockHeader::from_bytes(raw);
            debug!(
                "{} block at offset {}, {} bytes{}",
                header.block_type,
                offset,
                header.length,
                if header.is_last { ", last" } else { "" }
            );

            self.dispatch(&header, offset)?;

            self.seen_any_block = true;
            self.snapshot.blocks.push(BlockInfo {
                block_type: header.block_type,
                offset,
                length: header.length,
                is_last: header.is_last,
            });
            if header.is_last {
                break;
            }
        }

        self.snapshot.audio_offset = self.offset;
        Ok(self.snapshot)
    }

    fn dispatch(&mut self, header: &BlockHeader, offset: u64) -> Result<()> {
        match header.block_type {
            BlockType::StreamInfo => {
                if self.seen_stream_info {
                    return Err(FlacError::DuplicateStreamInfo { offset });
                }
                if self.seen_any_block {
                    return Err(FlacError::StreamInfoNotFirst { offset });
                }

                let data = self.read_payload(header, "STREAMINFO")?;
                self.snapshot.stream_info = Some(StreamInfo::read(&data)?);
                self.seen_stream_info = true;
            }

            BlockType::VorbisComment if self.options.read_comments => {
                let data = self.read_payload(header, "VORBIS_COMMENT")?;
                let comment = VorbisComment::read(&data)?;
                if self.snapshot.comment.is_some() {
                    warn!("VORBIS_COMMENT at offset {} replaces an earlier one", offset);
                }
                self.snapshot.comment = Some(comment);
            }

            BlockType::Reserved(block_type) => match self.options.reserved_blocks {
                ReservedBlocks::Reject => {
                    return Err(FlacError::ReservedBlockType { block_type, offset });
                }
                ReservedBlocks::Skip => {
                    warn!("skipping reserved block type {} at offset {}", block_type, offset);
                    self.skip(header)?;
                }
            },

            BlockType::Invalid => {
                return Err(FlacError::InvalidBlockType {
                    block_type: header.block_type.code(),
                    offset,
                });
            }

            _ => self.skip(header)?,
        }

        if let Some(index) = header.block_type.index() {
            self.snapshot.block_counts[index] += 1;
        }
        Ok(())
    }

    fn read_payload(&mut self, header: &BlockHeader, context: &'static str) -> Result<Vec<u8>> {
        self.ensure_available(header.length.into(), context)?;
        let mut data = vec![0u8; header.length as usize];
        self.read_exact(&mut data, context)?;
        Ok(data)
    }

    fn skip(&mut self, header: &BlockHeader) -> Result<()> {
        let length = u64::from(header.length);
        self.ensure_available(length, "skipped block")?;
        trace!("skipping {} bytes of {}", length, header.block_type);
        self.source.seek(SeekFrom::Current(length as i64))?;
        self.offset += length;
        Ok(())
    }

    fn ensure_available(&self, wanted: u64, context: &'static str) -> Result<()> {
        let available = self.size - self.offset;
        if wanted > available {
            return Err(FlacError::UnexpectedEof {
                context,
                offset: self.offset,
                wanted,
                available,
            });
        }
        Ok(())
    }

    fn read_exact(&mut self, buf: &mut [u8], context: &'static str) -> Result<()> {
        let wanted = buf.len() as u64;
        self.ensure_available(wanted, context)?;

        match self.source.read_exact(buf) {
            Ok(()) => {
                self.offset += wanted;
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(FlacError::UnexpectedEof {
                context,
                offset: self.offset,
                wanted,
                available: self.size - self.offset,
            }),
            Err(e) => Err(e.into()),
        }
    }
}
