//! Volume descriptor maintenance
//!
//! ISO9660 stores 32-bit fields in both byte orders. TempleOS keeps a second
//! descriptor copy at 0x9000, and the bitmap block carries RedSea's own
//! view of the root and image end. All of them must agree with the
//! filesystem after it moves its root or grows.

use crate::error::{RedSeaError, Result};
use crate::image::Image;
use crate::types::{
    BACKUP_DESCRIPTOR, BITMAP_END_BLOCK, BITMAP_ROOT_BLOCK, BLOCK_SIZE, DESCRIPTOR_END_SECTOR,
    DESCRIPTOR_ROOT_BLOCK, PRIMARY_DESCRIPTOR, SECTOR_SIZE,
};
use crate::utils::sector::{block_to_byte, padding_to_sector};
use gpt_disk_io::BlockIo;

/// Both descriptor copies that carry mirrored fields
const DESCRIPTORS: [u64; 2] = [PRIMARY_DESCRIPTOR, BACKUP_DESCRIPTOR];

/// Point the container and the bitmap block at a new root block
pub fn write_root_block<B: BlockIo>(
    image: &mut Image<B>,
    bitmap_block: u64,
    root_block: u64,
) -> Result<()> {
    let narrow = u32::try_from(root_block).map_err(|_| RedSeaError::VolumeTooLarge)?;
    for descriptor in DESCRIPTORS {
        image.write_both_endian_u32(descriptor + DESCRIPTOR_ROOT_BLOCK, narrow)?;
    }
    image.write_u64_le(block_to_byte(bitmap_block) + BITMAP_ROOT_BLOCK, root_block)
}

/// Sizes recorded at finalization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageEnd {
    /// Image length in ISO9660 sectors
    pub sectors: u32,
    /// Image length in blocks, counted from the bitmap block
    pub blocks: u64,
}

/// Pad the image to a sector boundary and record its size
///
/// # Arguments
/// * `image` - Image to finalize
/// * `bitmap_block` - Filesystem start block
/// * `min_blocks` - The image is first extended to at least this many blocks
pub fn finalize<B: BlockIo>(
    image: &mut Image<B>,
    bitmap_block: u64,
    min_blocks: u64,
) -> Result<ImageEnd> {
    // Size everything up front so an oversized frontier fails before any write
    let wanted = image.len().max(block_to_byte(min_blocks));
    let end = wanted
        .checked_add(padding_to_sector(wanted))
        .ok_or(RedSeaError::VolumeTooLarge)?;
    let sectors = u32::try_from(end / SECTOR_SIZE).map_err(|_| RedSeaError::VolumeTooLarge)?;
    let blocks = (end / BLOCK_SIZE).saturating_sub(bitmap_block);

    let len = image.len();
    if len < end {
        image.zero_at(len, end - len)?;
    }

    for descriptor in DESCRIPTORS {
        image.write_both_endian_u32(descriptor + DESCRIPTOR_END_SECTOR, sectors)?;
    }
    image.write_u64_le(block_to_byte(bitmap_block) + BITMAP_END_BLOCK, blocks)?;
    image.flush()?;

    log::info!(
        "finalized image: {} bytes, {} sectors, {} blocks",
        end,
        sectors,
        blocks
    );
    Ok(ImageEnd { sectors, blocks })
}
