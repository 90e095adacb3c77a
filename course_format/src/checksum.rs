use byteorder::{ByteOrder, BE};
use crc32fast::Hasher;

/// Position of the stored checksum.
pub const CHECKSUM_OFFSET: usize = 0x08;
/// The checksum covers everything from here to the end of the blob.
pub const CHECKSUM_START: usize = 0x10;

/// CRC-32 of `blob[CHECKSUM_START..]`.
pub fn compute(blob: &[u8]) -> u32 {
	let mut hasher = Hasher::new();
	hasher.update(blob.get(CHECKSUM_START..).unwrap_or_default());
	hasher.finalize()
}

/// Panics if `blob` is shorter than `CHECKSUM_START`.
pub(crate) fn splice(blob: &mut [u8], value: u32) {
	BE::write_u32(&mut blob[CHECKSUM_OFFSET..CHECKSUM_START - 4], value);
}

pub fn stored(blob: &[u8]) -> Option<u32> {
	blob.get(CHECKSUM_OFFSET..CHECKSUM_OFFSET + 4).map(BE::read_u32)
}

/// Whether the stored checksum matches the content. Loading never checks this.
pub fn verify(blob: &[u8]) -> bool {
	stored(blob) == Some(compute(blob))
}
