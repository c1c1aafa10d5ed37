//! Free-space frontier and extent relocation
//!
//! RedSea space is handed out from a single high-water mark. Nothing is ever
//! freed: a node that outgrows its extent is copied to the frontier and its
//! old blocks are simply abandoned.

use crate::directory::slots;
use crate::error::Result;
use crate::filesystem::RedSea;
use crate::tree::NodeId;
use crate::types::{BLOCK_SIZE, NO_BLOCK, RECORD_SIZE};
use crate::utils::sector::{block_to_byte, blocks_for_bytes, extent_end};
use crate::volume::descriptor;
use alloc::vec::Vec;
use gpt_disk_io::BlockIo;

/// Lowest block never used by any extent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frontier {
    next: u64,
}

impl Frontier {
    /// Frontier starting at `block`
    pub fn new(block: u64) -> Self {
        Self { next: block }
    }

    /// Current frontier block
    pub fn current(&self) -> u64 {
        self.next
    }

    /// Raise the frontier to `block` if it is higher
    pub fn raise_to(&mut self, block: u64) {
        self.next = self.next.max(block);
    }

    /// Account for an existing extent
    pub fn observe(&mut self, block: u64, size: u64) {
        if block != NO_BLOCK {
            self.raise_to(extent_end(block, size));
        }
    }

    /// Hand out an extent of `len` bytes at the frontier
    pub fn allocate_next(&mut self, len: u64) -> u64 {
        let block = self.next;
        self.next = block.saturating_add(blocks_for_bytes(len));
        block
    }
}

impl<B: BlockIo> RedSea<B> {
    /// Move a node's extent to the frontier so it can hold `new_length` bytes
    pub(crate) fn relocate(&mut self, id: NodeId, new_length: u64) -> Result<()> {
        if self.arena[id].is_directory() {
            self.relocate_directory(id)
        } else {
            self.relocate_file(id, new_length)
        }
    }

    fn relocate_file(&mut self, id: NodeId, new_length: u64) -> Result<()> {
        let (old_block, size) = {
            let node = &self.arena[id];
            (node.block, node.size)
        };
        let new_block = self.frontier.allocate_next(new_length.max(size));

        if old_block != NO_BLOCK && size > 0 {
            self.image
                .copy_within(block_to_byte(old_block), block_to_byte(new_block), size)?;
        }

        self.patch_record(id, |entry| entry.block = new_block)?;
        self.arena[id].block = new_block;

        log::debug!(
            "relocated {} from block {:#x} to {:#x}",
            self.arena[id].path,
            old_block,
            new_block
        );
        Ok(())
    }

    /// Grow a directory by one block, moving it to the frontier
    fn relocate_directory(&mut self, id: NodeId) -> Result<()> {
        let (old_block, size) = {
            let node = &self.arena[id];
            (node.block, node.size)
        };
        let new_size = size + BLOCK_SIZE;
        let new_block = self.frontier.allocate_next(new_size);

        if old_block != NO_BLOCK {
            self.image
                .copy_within(block_to_byte(old_block), block_to_byte(new_block), size)?;
        }
        self.image
            .zero_at(block_to_byte(new_block) + size, BLOCK_SIZE)?;

        // The directory's own "." record at the head of the new extent
        self.image.patch_entry(block_to_byte(new_block), |own| {
            own.block = new_block;
            own.size = new_size;
        })?;

        if self.arena[id].parent.is_some() {
            self.patch_record(id, |entry| {
                entry.block = new_block;
                entry.size = new_size;
            })?;
        } else {
            // Root: its ".." points at itself, and the container keeps copies
            self.patch_parent_link(new_block, new_block)?;
            descriptor::write_root_block(&mut self.image, self.volume.bitmap_block, new_block)?;
            self.volume.root_block = new_block;
            self.volume.root_size = new_size;
        }
        {
            let node = &mut self.arena[id];
            node.block = new_block;
            node.size = new_size;
        }

        // Subdirectories still name the old block in their ".." records
        let subdirs: Vec<u64> = self.arena[id]
            .children
            .iter()
            .map(|&child| &self.arena[child])
            .filter(|child| child.is_directory() && child.has_extent())
            .map(|child| child.block)
            .collect();
        for child_block in subdirs {
            self.patch_parent_link(child_block, new_block)?;
        }

        log::debug!(
            "relocated directory {} from block {:#x} to {:#x} ({} slots)",
            self.arena[id].path,
            old_block,
            new_block,
            slots::capacity(new_size)
        );
        Ok(())
    }

    /// Point the ".." record of the directory at `dir_block` to `parent_block`
    pub(crate) fn patch_parent_link(&mut self, dir_block: u64, parent_block: u64) -> Result<()> {
        let pos = block_to_byte(dir_block) + RECORD_SIZE;
        self.image
            .patch_entry(pos, |link| link.block = parent_block)
    }
}
