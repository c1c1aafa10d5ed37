//! Block and sector alignment utilities

use crate::types::{BLOCK_SIZE, SECTOR_SIZE};

/// Convert a block number to a byte offset
pub fn block_to_byte(block: u64) -> u64 {
    block.saturating_mul(BLOCK_SIZE)
}

/// Number of blocks needed for a byte count (at least one)
///
/// Every extent occupies at least one block, including empty files.
pub fn blocks_for_bytes(byte_count: u64) -> u64 {
    byte_count.div_ceil(BLOCK_SIZE).max(1)
}

/// First block past an extent
pub fn extent_end(block: u64, size: u64) -> u64 {
    block.saturating_add(blocks_for_bytes(size))
}

/// Bytes of zero padding needed to reach the next sector boundary
pub fn padding_to_sector(len: u64) -> u64 {
    (SECTOR_SIZE - len % SECTOR_SIZE) % SECTOR_SIZE
}
