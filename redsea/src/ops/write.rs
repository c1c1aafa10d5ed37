//! File content writes and truncation

use crate::error::{RedSeaError, Result};
use crate::filesystem::RedSea;
use crate::tree::NodeId;
use crate::types::MAX_IMAGE_BLOCKS;
use crate::utils::sector::{block_to_byte, blocks_for_bytes, extent_end};
use gpt_disk_io::BlockIo;

impl<B: BlockIo> RedSea<B> {
    /// Write `data` into the file at `path` starting at `offset`
    ///
    /// Files never shrink here; the size only changes when the write ends
    /// past it. The timestamp is refreshed on every non-empty write.
    pub fn write(&mut self, path: &str, data: &[u8], offset: u64) -> Result<usize> {
        let id = self.file(path)?;
        if data.is_empty() {
            return Ok(0);
        }
        let end = offset
            .checked_add(data.len() as u64)
            .ok_or(RedSeaError::VolumeTooLarge)?;

        self.reserve(id, end)?;

        let block = self.arena[id].block;
        self.image
            .write_at(block_to_byte(block).saturating_add(offset), data)?;

        let now = self.now();
        let size = self.arena[id].size.max(end);
        self.patch_record(id, |entry| {
            entry.size = size;
            entry.timestamp = now;
        })?;
        {
            let node = &mut self.arena[id];
            node.size = size;
            node.timestamp = now;
        }

        log::debug!(
            "wrote {} bytes at {} into {} (size {})",
            data.len(),
            offset,
            self.arena[id].path,
            size
        );
        Ok(data.len())
    }

    /// Set the recorded size of the file at `path`
    ///
    /// No bytes are moved or cleared. Growing past the extent goes through
    /// the same growth path as [`RedSea::write`]: the last extent before the
    /// frontier is extended in place, any other file is relocated (content
    /// copied) so no later allocation can overlap the reserved blocks.
    pub fn truncate(&mut self, path: &str, length: u64) -> Result<()> {
        let id = self.file(path)?;
        if length > 0 {
            self.reserve(id, length)?;
        }

        self.patch_record(id, |entry| entry.size = length)?;
        self.arena[id].size = length;
        log::debug!("truncated {} to {}", self.arena[id].path, length);
        Ok(())
    }

    /// Make the extent of `id` hold at least `length` bytes
    ///
    /// The last extent before the frontier grows in place; anything else is
    /// relocated to the frontier. Extents the container cannot address are
    /// refused before the frontier moves.
    pub(crate) fn reserve(&mut self, id: NodeId, length: u64) -> Result<()> {
        let node = &self.arena[id];
        let frontier = self.frontier.current();
        let relocated_end = frontier.saturating_add(blocks_for_bytes(length));

        if !node.has_extent() {
            check_addressable(relocated_end)?;
            return self.relocate(id, length);
        }

        let bound = node.extent_end();
        let needed = extent_end(node.block, length);
        if needed <= bound {
            return Ok(());
        }

        if bound >= frontier {
            check_addressable(needed)?;
            log::debug!(
                "growing {} in place to block {:#x}",
                node.path,
                needed
            );
            self.frontier.raise_to(needed);
            return Ok(());
        }

        check_addressable(relocated_end)?;
        self.relocate(id, length)
    }
}

fn check_addressable(end_block: u64) -> Result<()> {
    if end_block > MAX_IMAGE_BLOCKS {
        return Err(RedSeaError::VolumeTooLarge);
    }
    Ok(())
}
