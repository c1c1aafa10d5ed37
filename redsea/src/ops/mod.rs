//! Mutating operations on a mounted volume
//!
//! Every operation patches the image first and then brings the arena and
//! the path index in line, so an I/O error part-way leaves the in-memory
//! view describing at most what actually reached the image.

mod create;
mod remove;
mod rename;
mod write;

use crate::directory::slots::{find_free_slot, slot_offset};
use crate::error::{RedSeaError, Result};
use crate::filesystem::RedSea;
use crate::tree::{Node, NodeId};
use crate::types::NodeKind;
use crate::utils::string::{join_path, split_path, validate_name};
use alloc::string::String;
use gpt_disk_io::BlockIo;

/// Where a new entry will be recorded
pub(crate) struct Placement {
    pub parent: NodeId,
    pub name: String,
    pub path: String,
}

impl<B: BlockIo> RedSea<B> {
    /// Validate `path` as the location of a new entry
    pub(crate) fn placement(&self, path: &str) -> Result<Placement> {
        let (parent_path, name) = split_path(path)?;
        validate_name(name)?;

        let full = join_path(parent_path, name);
        if self.index.contains(&full) {
            return Err(RedSeaError::AlreadyExists);
        }

        let parent = match self.index.lookup(parent_path) {
            Some((NodeKind::Directory, id)) => id,
            Some((NodeKind::File, _)) => return Err(RedSeaError::NotADirectory),
            None => return Err(RedSeaError::NoSuchParent),
        };

        Ok(Placement {
            parent,
            name: String::from(name),
            path: full,
        })
    }

    /// Find a record slot in `parent`, growing it when the table is full
    ///
    /// Returns the slot's byte offset within the parent's extent.
    pub(crate) fn claim_slot(&mut self, parent: NodeId) -> Result<u64> {
        if let Some(slot) = self.free_slot(parent)? {
            return Ok(slot_offset(slot));
        }

        self.relocate(parent, 0)?;
        self.free_slot(parent)?
            .map(slot_offset)
            .ok_or(RedSeaError::InvalidDirectoryRecord)
    }

    fn free_slot(&mut self, parent: NodeId) -> Result<Option<u64>> {
        let (block, size) = {
            let dir = &self.arena[parent];
            (dir.block, dir.size)
        };
        find_free_slot(&mut self.image, block, size)
    }

    /// Register a freshly written node under its parent
    pub(crate) fn attach(&mut self, node: Node) -> NodeId {
        let parent = node.parent;
        let kind = node.kind;
        let path = node.path.clone();

        let id = self.arena.insert(node);
        self.index.insert(kind, path, id);
        if let Some(parent) = parent {
            self.arena[parent].children.push(id);
        }
        id
    }

    /// Forget a node that no longer has a live record
    pub(crate) fn detach(&mut self, id: NodeId) {
        if let Some(node) = self.arena.remove(id) {
            self.index.remove(node.kind, &node.path);
            if let Some(parent) = node.parent {
                self.arena[parent].children.retain(|&child| child != id);
            }
        }
    }
}
