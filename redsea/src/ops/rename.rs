//! Renaming and moving entries

use crate::directory::record::{Attributes, DirEntry};
use crate::error::{RedSeaError, Result};
use crate::filesystem::RedSea;
use crate::tree::NodeId;
use crate::types::NodeKind;
use crate::utils::string::{join_path, split_path, validate_name};
use alloc::string::String;
use alloc::vec;
use gpt_disk_io::BlockIo;

impl<B: BlockIo> RedSea<B> {
    /// Rename or move the entry at `old` to `new`
    ///
    /// Within one directory only the name field of the record changes. A
    /// move to another directory tombstones the old record and writes a copy
    /// into the new parent.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<()> {
        let (kind, id) = self.resolve(old)?;
        if id == NodeId::ROOT {
            return Err(RedSeaError::InvalidPath);
        }

        let (parent_path, name) = split_path(new)?;
        validate_name(name)?;
        let new_path = join_path(parent_path, name);
        if new_path == self.arena[id].path {
            return Ok(());
        }
        if self.index.contains(&new_path) {
            return Err(RedSeaError::AlreadyExists);
        }

        let new_parent = match self.index.lookup(parent_path) {
            Some((NodeKind::Directory, parent)) => parent,
            Some((NodeKind::File, _)) => return Err(RedSeaError::NotADirectory),
            None => return Err(RedSeaError::NoSuchParent),
        };
        if kind == NodeKind::Directory && self.is_within(new_parent, id) {
            return Err(RedSeaError::InvalidPath);
        }

        if self.arena[id].parent == Some(new_parent) {
            self.patch_record(id, |entry| entry.name = String::from(name))?;
            self.arena[id].name = String::from(name);
        } else {
            self.move_entry(id, new_parent, name)?;
        }

        log::debug!("renamed {} to {}", self.arena[id].path, new_path);
        self.rekey_subtree(id, new_path);
        Ok(())
    }

    fn move_entry(&mut self, id: NodeId, new_parent: NodeId, name: &str) -> Result<()> {
        let seek_to = self.claim_slot(new_parent)?;

        // Copy the raw record so fields other than the name move verbatim
        let mut record = self.image.read_record(self.record_position(id))?;
        let base = DirEntry::parse(&record)?;
        let mut renamed = base.clone();
        renamed.name = String::from(name);
        renamed.write_changes(&base, &mut record)?;
        self.patch_record(id, |old| old.attributes |= Attributes::DELETED)?;

        if let Some(old_parent) = self.arena[id].parent {
            self.arena[old_parent].children.retain(|&child| child != id);
        }
        {
            let node = &mut self.arena[id];
            node.parent = Some(new_parent);
            node.seek_to = seek_to;
            node.name = String::from(name);
        }
        self.arena[new_parent].children.push(id);
        self.image.write_at(self.record_position(id), &record)?;

        let node = &self.arena[id];
        if node.is_directory() && node.has_extent() {
            let (block, parent_block) = (node.block, self.arena[new_parent].block);
            self.patch_parent_link(block, parent_block)?;
        }
        Ok(())
    }

    /// `id` is `ancestor` or lies somewhere beneath it
    fn is_within(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.arena[current].parent;
        }
        false
    }

    /// Give `id` the path `path` and re-derive every descendant's path
    fn rekey_subtree(&mut self, id: NodeId, path: String) {
        let mut pending = vec![(id, path)];
        while let Some((current, path)) = pending.pop() {
            let node = &mut self.arena[current];
            self.index.rekey(node.kind, &node.path, path.clone());
            node.path = path;

            for &child in &self.arena[current].children {
                let child_path = join_path(&self.arena[current].path, &self.arena[child].name);
                pending.push((child, child_path));
            }
        }
    }
}
