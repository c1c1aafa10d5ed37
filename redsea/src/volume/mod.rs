//! Volume location inside the ISO9660 container
//!
//! TempleOS images are ISO9660 discs with El Torito boot support. The RedSea
//! filesystem is found through three fixed landmarks: the boot catalog
//! pointer in the boot record descriptor, the "Temp" tag in the boot
//! catalog, and the root pointer in the RedSea bitmap block.

pub mod descriptor;

use crate::error::{RedSeaError, Result};
use crate::image::Image;
use crate::types::{
    BITMAP_ROOT_BLOCK, BOOT_CATALOG_POINTER, SECTOR_SIZE, SIGNATURE, SIGNATURE_OFFSET,
};
use crate::utils::sector::block_to_byte;
use gpt_disk_io::BlockIo;

/// Located RedSea volume
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volume {
    /// Sector of the El Torito boot catalog
    pub boot_catalog_sector: u32,

    /// Block of the RedSea bitmap block (filesystem start)
    pub bitmap_block: u64,

    /// First block of the root directory extent
    pub root_block: u64,

    /// Root directory extent size in bytes
    pub root_size: u64,

    /// CDate stored in the root's self record
    pub root_timestamp: u64,
}

/// Locate the RedSea volume
///
/// # Arguments
/// * `image` - Image containing the ISO
/// * `bitmap_block` - Block holding the root pointer (0x58 on every known image)
///
/// The signature is not checked here; see [`verify_signature`].
pub fn locate<B: BlockIo>(image: &mut Image<B>, bitmap_block: u64) -> Result<Volume> {
    let boot_catalog_sector = image.read_u32_le(BOOT_CATALOG_POINTER)?;
    let root_block = image.read_u64_le(block_to_byte(bitmap_block) + BITMAP_ROOT_BLOCK)?;

    // Size and timestamp come from the root's own "." record
    let root = image.read_entry(block_to_byte(root_block))?;

    Ok(Volume {
        boot_catalog_sector,
        bitmap_block,
        root_block,
        root_size: root.size,
        root_timestamp: root.timestamp,
    })
}

/// Check the TempleOS tag in the boot catalog
///
/// A mismatch is diagnostic: images that fail it may still mount.
pub fn verify_signature<B: BlockIo>(image: &mut Image<B>, boot_catalog_sector: u32) -> Result<()> {
    let mut tag = [0u8; 4];
    image.read_at(
        boot_catalog_sector as u64 * SECTOR_SIZE + SIGNATURE_OFFSET,
        &mut tag,
    )?;
    if &tag != SIGNATURE {
        return Err(RedSeaError::SignatureMismatch);
    }
    Ok(())
}

