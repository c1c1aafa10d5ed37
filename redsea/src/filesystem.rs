//! Mounted RedSea filesystem
//!
//! [`RedSea`] owns the image, the node arena and the path index for the
//! lifetime of a mount. Queries are answered from memory; mutations patch
//! the image immediately (see the `ops` module) and keep the index in step.

use crate::allocator::Frontier;
use crate::directory::record::DirEntry;
use crate::error::{RedSeaError, Result};
use crate::image::Image;
use crate::tree::{self, NodeArena, NodeId, PathIndex};
use crate::types::{Metadata, NodeKind, DEFAULT_BITMAP_BLOCK};
use crate::utils::cdate;
use crate::utils::sector::block_to_byte;
use crate::volume::{self, descriptor, Volume};
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use gpt_disk_io::BlockIo;

/// Mount-time settings
#[derive(Debug, Clone, Copy)]
pub struct MountOptions {
    /// Block holding the RedSea root pointer
    pub bitmap_block: u64,

    /// Refuse to mount when the boot catalog lacks the TempleOS tag
    pub require_signature: bool,

    /// Source of the current time (Unix seconds) for record timestamps
    pub clock: fn() -> i64,
}

impl Default for MountOptions {
    fn default() -> Self {
        Self {
            bitmap_block: DEFAULT_BITMAP_BLOCK,
            require_signature: false,
            clock: system_clock,
        }
    }
}

#[cfg(feature = "std")]
fn system_clock() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX),
        Err(before) => -i64::try_from(before.duration().as_secs()).unwrap_or(i64::MAX),
    }
}

#[cfg(not(feature = "std"))]
fn system_clock() -> i64 {
    0
}

/// A mounted RedSea volume
pub struct RedSea<B: BlockIo> {
    pub(crate) image: Image<B>,
    pub(crate) arena: NodeArena,
    pub(crate) index: PathIndex,
    pub(crate) frontier: Frontier,
    pub(crate) volume: Volume,
    pub(crate) options: MountOptions,
}

impl<B: BlockIo> RedSea<B> {
    /// Locate the volume on `io` and load its directory tree
    pub fn mount(io: B, options: MountOptions) -> Result<Self> {
        let mut image = Image::new(io)?;
        let volume = volume::locate(&mut image, options.bitmap_block)?;

        match volume::verify_signature(&mut image, volume.boot_catalog_sector) {
            Ok(()) => {}
            Err(RedSeaError::SignatureMismatch) if !options.require_signature => {
                log::warn!(
                    "boot catalog at sector {} has no TempleOS tag, mounting anyway",
                    volume.boot_catalog_sector
                );
            }
            Err(err) => return Err(err),
        }

        let loaded = tree::load(&mut image, &volume)?;

        log::info!(
            "mounted RedSea volume: root at block {:#x} ({} bytes), {} bytes image",
            volume.root_block,
            volume.root_size,
            image.len()
        );

        Ok(Self {
            image,
            arena: loaded.arena,
            index: loaded.index,
            frontier: loaded.frontier,
            volume,
            options,
        })
    }

    /// Metadata of the file or directory at `path`
    pub fn attributes(&self, path: &str) -> Result<Metadata> {
        let (_, id) = self.resolve(path)?;
        Ok(self.arena[id].metadata())
    }

    /// Names in the directory at `path`, in on-disk order
    pub fn list(&self, path: &str) -> Result<Vec<String>> {
        let id = self.directory(path)?;
        Ok(self.arena[id]
            .children
            .iter()
            .map(|&child| self.arena[child].name.clone())
            .collect())
    }

    /// Read `size` bytes of the file at `path` starting at `offset`
    ///
    /// The read is not clamped to the recorded file size.
    pub fn read(&mut self, path: &str, size: usize, offset: u64) -> Result<Vec<u8>> {
        let id = self.file(path)?;
        let node = &self.arena[id];
        let mut buf = vec![0u8; size];
        if node.has_extent() {
            let start = block_to_byte(node.block).saturating_add(offset);
            self.image.read_at(start, &mut buf)?;
        }
        Ok(buf)
    }

    /// Current free-space frontier block
    pub fn frontier(&self) -> u64 {
        self.frontier.current()
    }

    /// Located volume landmarks
    pub fn volume(&self) -> &Volume {
        &self.volume
    }

    /// Underlying image, for inspection
    pub fn image_mut(&mut self) -> &mut Image<B> {
        &mut self.image
    }

    /// Record the image size in the container and give the device back
    pub fn finalize(self) -> Result<B> {
        let mut image = self.image;
        descriptor::finalize(&mut image, self.volume.bitmap_block, self.frontier.current())?;
        Ok(image.into_inner())
    }

    pub(crate) fn resolve(&self, path: &str) -> Result<(NodeKind, NodeId)> {
        self.index.lookup(path).ok_or(RedSeaError::NotFound)
    }

    pub(crate) fn file(&self, path: &str) -> Result<NodeId> {
        match self.resolve(path)? {
            (NodeKind::File, id) => Ok(id),
            (NodeKind::Directory, _) => Err(RedSeaError::IsADirectory),
        }
    }

    pub(crate) fn directory(&self, path: &str) -> Result<NodeId> {
        match self.resolve(path)? {
            (NodeKind::Directory, id) => Ok(id),
            (NodeKind::File, _) => Err(RedSeaError::NotADirectory),
        }
    }

    /// Byte offset of the record describing `id`
    ///
    /// The root has no parent record; its own "." record stands in.
    pub(crate) fn record_position(&self, id: NodeId) -> u64 {
        let node = &self.arena[id];
        match node.parent {
            Some(parent) => block_to_byte(self.arena[parent].block).saturating_add(node.seek_to),
            None => block_to_byte(node.block),
        }
    }

    /// Rewrite the fields `patch` changes in the record describing `id`
    ///
    /// Untouched fields keep their on-disk bytes, including names that do
    /// not decode cleanly.
    pub(crate) fn patch_record<F>(&mut self, id: NodeId, patch: F) -> Result<()>
    where
        F: FnOnce(&mut DirEntry),
    {
        let pos = self.record_position(id);
        self.image.patch_entry(pos, patch)
    }

    /// Current time as a CDate
    pub(crate) fn now(&self) -> u64 {
        cdate::from_unix((self.options.clock)())
    }
}
