use crate::error::*;
use byteorder::{ByteOrder, BE};
use std::time::Duration;

pub const MIN_BLOCK_SIZE: u16 = 16;
pub const MAX_BLOCK_SIZE: u32 = 65535;
pub const MAX_SAMPLE_RATE: u32 = 655_350;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamInfo {
    /// Samples per block.
    pub min_block_size: u16,
    pub max_block_size: u16,
    /// Bytes per frame, 0 when unknown.
    pub min_frame_size: u32,
    pub max_frame_size: u32,
    pub sample_rate: u32,
    pub channels: u8,
    pub bits_per_sample: u8,
    /// Inter-channel samples, 0 when unknown.
    pub total_samples: u64,
    /// MD5 of the unencoded audio, as lowercase hex.
    pub md5: String,
}

impl StreamInfo {
    pub const SIZE: usize = 34;

    pub(crate) fn read(data: &[u8]) -> Result<Self> {
        if data.len() < Self::SIZE {
            return Err(FlacError::StreamInfoTooShort(data.len()));
        }

        let min_block_size = BE::read_u16(&data[0..2]);
        let max_block_size = BE::read_u16(&data[2..4]);
        let min_frame_size = BE::read_u24(&data[4..7]);
        let max_frame_size = BE::read_u24(&data[7..10]);

        // rate:20 | channels-1:3 | bps-1:5 | total samples:36
        let packed = BE::read_u64(&data[10..18]);
        let sample_rate = (packed >> 44) as u32;
        let channels = ((packed >> 41) & 0x07) as u8 + 1;
        let bits_per_sample = ((packed >> 36) & 0x1f) as u8 + 1;
        let total_samples = packed & 0x0f_ffff_ffff;

        let md5 = hex::encode(&data[18..34]);

        let info = StreamInfo {
            min_block_size,
            max_block_size,
            min_frame_size,
            max_frame_size,
            sample_rate,
            channels,
            bits_per_sample,
            total_samples,
            md5,
        };
        info.validate()?;
        Ok(info)
    }

    fn validate(&self) -> Result<()> {
        if self.min_block_size < MIN_BLOCK_SIZE {
            return Err(FlacError::MinBlockSizeTooSmall(self.min_block_size));
        }
        // cannot fire for a 16-bit field
        if u32::from(self.max_block_size) > MAX_BLOCK_SIZE {
            return Err(FlacError::MaxBlockSizeTooLarge(self.max_block_size.into()));
        }
        if self.min_block_size > self.max_block_size {
            return Err(FlacError::BlockSizeOrder {
                min: self.min_block_size,
                max: self.max_block_size,
            });
        }
        if self.sample_rate == 0 || self.sample_rate > MAX_SAMPLE_RATE {
            return Err(FlacError::InvalidSampleRate(self.sample_rate));
        }
        // cannot fire while md5 comes from hex::encode of 16 bytes
        if !is_md5_hex(&self.md5) {
            return Err(FlacError::InvalidChecksum(self.md5.clone()));
        }
        Ok(())
    }

    /// Length of the stream in seconds.
    pub fn duration(&self) -> f64 {
        self.total_samples as f64 / self.sample_rate as f64
    }

    pub fn audio_length(&self) -> Duration {
        Duration::from_secs_f64(self.duration())
    }

    pub fn is_fixed_blocksize(&self) -> bool {
        self.min_block_size == self.max_block_size
    }
}

fn is_md5_hex(s: &str) -> bool {
    s.len() == 32 && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
