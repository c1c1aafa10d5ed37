//! File and directory creation

use crate::directory::record::{Attributes, DirEntry};
use crate::error::Result;
use crate::filesystem::RedSea;
use crate::tree::Node;
use crate::types::{BLOCK_SIZE, RECORD_SIZE};
use crate::utils::sector::block_to_byte;
use crate::utils::string::is_compressed_name;
use gpt_disk_io::BlockIo;

impl<B: BlockIo> RedSea<B> {
    /// Create an empty file
    ///
    /// The file gets a one-block reservation at the frontier.
    pub fn create(&mut self, path: &str) -> Result<()> {
        let placement = self.placement(path)?;
        let seek_to = self.claim_slot(placement.parent)?;
        let block = self.frontier.allocate_next(0);

        let mut attributes = Attributes::CONTIGUOUS;
        if is_compressed_name(&placement.name) {
            attributes |= Attributes::COMPRESSED;
        }
        let entry = DirEntry::new(attributes, &placement.name, block, 0, self.now());

        let parent_block = self.arena[placement.parent].block;
        self.image
            .write_entry(block_to_byte(parent_block) + seek_to, &entry)?;

        log::debug!("created {} at block {:#x}", placement.path, block);
        self.attach(Node::from_entry(
            &entry,
            placement.path,
            seek_to,
            placement.parent,
        ));
        Ok(())
    }

    /// Create an empty directory with room for six entries
    pub fn mkdir(&mut self, path: &str) -> Result<()> {
        let placement = self.placement(path)?;
        let seek_to = self.claim_slot(placement.parent)?;
        let block = self.frontier.allocate_next(BLOCK_SIZE);
        let now = self.now();
        let attributes = Attributes::DIRECTORY | Attributes::CONTIGUOUS;

        // The new extent: "." then "..", every other slot a terminator
        let base = block_to_byte(block);
        let parent_block = self.arena[placement.parent].block;
        self.image.zero_at(base, BLOCK_SIZE)?;
        self.image.write_entry(
            base,
            &DirEntry::new(attributes, ".", block, BLOCK_SIZE, now),
        )?;
        self.image.write_entry(
            base + RECORD_SIZE,
            &DirEntry::new(attributes, "..", parent_block, 0, now),
        )?;

        let entry = DirEntry::new(attributes, &placement.name, block, BLOCK_SIZE, now);
        self.image
            .write_entry(block_to_byte(parent_block) + seek_to, &entry)?;

        log::debug!("created directory {} at block {:#x}", placement.path, block);
        self.attach(Node::from_entry(
            &entry,
            placement.path,
            seek_to,
            placement.parent,
        ));
        Ok(())
    }
}
