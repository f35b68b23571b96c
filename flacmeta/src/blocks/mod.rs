mod comment;
mod streaminfo;

pub use comment::VorbisComment;
pub use streaminfo::{StreamInfo, MAX_BLOCK_SIZE, MAX_SAMPLE_RATE, MIN_BLOCK_SIZE};

#[cfg(test)]
pub(crate) use comment::tests::encode as encode_comment;
#[cfg(test)]
pub(crate) use streaminfo::tests::Fields as StreamInfoFields;
