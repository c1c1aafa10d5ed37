//! Deletion by tombstoning
//!
//! The record keeps its slot with the deleted bit set until a later create
//! reuses it. The extent it pointed at is never reclaimed.

use crate::directory::record::Attributes;
use crate::error::{RedSeaError, Result};
use crate::filesystem::RedSea;
use crate::tree::NodeId;
use gpt_disk_io::BlockIo;

impl<B: BlockIo> RedSea<B> {
    /// Delete the file at `path`
    pub fn unlink(&mut self, path: &str) -> Result<()> {
        let id = self.file(path)?;
        self.tombstone(id)
    }

    /// Delete the empty directory at `path`
    pub fn rmdir(&mut self, path: &str) -> Result<()> {
        let id = self.directory(path)?;
        if id == NodeId::ROOT {
            return Err(RedSeaError::InvalidPath);
        }
        if !self.arena[id].children.is_empty() {
            return Err(RedSeaError::DirectoryNotEmpty);
        }
        self.tombstone(id)
    }

    fn tombstone(&mut self, id: NodeId) -> Result<()> {
        self.patch_record(id, |entry| entry.attributes |= Attributes::DELETED)?;
        log::debug!("deleted {}", self.arena[id].path);
        self.detach(id);
        Ok(())
    }
}
