//! Free slot search inside a directory table

use crate::error::Result;
use crate::image::Image;
use crate::types::{ALIAS_SLOTS, RECORD_SIZE};
use crate::utils::sector::block_to_byte;
use gpt_disk_io::BlockIo;

/// Never-used slots that must stay free so the table keeps a terminator
const RESERVED_TAIL: u64 = 1;

/// Byte offset of a slot within a directory extent
pub fn slot_offset(slot: u64) -> u64 {
    slot * RECORD_SIZE
}

/// Absolute byte offset of a slot on the image
pub fn slot_position(dir_block: u64, slot: u64) -> u64 {
    block_to_byte(dir_block).saturating_add(slot_offset(slot))
}

/// Number of record slots an extent of `size` bytes holds
pub fn capacity(size: u64) -> u64 {
    size / RECORD_SIZE
}

/// Find a slot for a new record in the directory at `dir_block`
///
/// A tombstoned slot is reused first. Otherwise the first never-used slot is
/// returned as long as another never-used slot stays behind it. `None` means
/// the directory must grow before it can take another entry.
pub fn find_free_slot<B: BlockIo>(
    image: &mut Image<B>,
    dir_block: u64,
    dir_size: u64,
) -> Result<Option<u64>> {
    let slots = capacity(dir_size);

    for slot in ALIAS_SLOTS..slots {
        let entry = image.read_entry(slot_position(dir_block, slot))?;
        if entry.is_terminator() {
            if slots - slot > RESERVED_TAIL {
                return Ok(Some(slot));
            }
            return Ok(None);
        }
        if entry.is_deleted() {
            return Ok(Some(slot));
        }
    }

    Ok(None)
}
