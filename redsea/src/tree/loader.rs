//! Directory tree loader
//!
//! Walks every directory table once at mount, breadth first, and builds the
//! node arena, the path index and the initial frontier. The on-disk data is
//! trusted: records are taken as found, so a damaged table yields a partial
//! tree rather than an error.

use crate::allocator::Frontier;
use crate::directory::slots::{capacity, slot_offset, slot_position};
use crate::error::Result;
use crate::image::Image;
use crate::tree::index::PathIndex;
use crate::tree::node::{Node, NodeArena, NodeId};
use crate::types::{NodeKind, NO_BLOCK};
use crate::utils::sector::block_to_byte;
use crate::utils::string::join_path;
use crate::volume::Volume;
use alloc::collections::{BTreeSet, VecDeque};
use alloc::string::String;
use gpt_disk_io::BlockIo;

/// Result of walking the tree
#[derive(Debug, Clone)]
pub struct LoadedTree {
    /// Every live node, root first
    pub arena: NodeArena,
    /// Path maps
    pub index: PathIndex,
    /// First block past every extent seen
    pub frontier: Frontier,
}

/// Load the tree rooted at the volume's root directory
pub fn load<B: BlockIo>(image: &mut Image<B>, volume: &Volume) -> Result<LoadedTree> {
    let root = Node::root(volume.root_block, volume.root_size, volume.root_timestamp);
    let mut arena = NodeArena::new(root);
    let mut index = PathIndex::new();
    index.insert(NodeKind::Directory, String::from("/"), NodeId::ROOT);

    let mut frontier = Frontier::new(volume.root_block);
    frontier.observe(volume.root_block, volume.root_size);

    let mut scanned = BTreeSet::new();
    let mut queue = VecDeque::new();
    queue.push_back(NodeId::ROOT);

    while let Some(dir_id) = queue.pop_front() {
        let (dir_block, dir_size, dir_path) = {
            let dir = &arena[dir_id];
            (dir.block, dir.size, dir.path.clone())
        };

        if !scanned.insert(dir_block) {
            log::warn!("{} repeats extent {:#x}, not scanned again", dir_path, dir_block);
            continue;
        }
        if dir_block == NO_BLOCK || block_to_byte(dir_block) >= image.len() {
            log::warn!("{} starts past the end of the image", dir_path);
            continue;
        }

        for slot in 0..capacity(dir_size) {
            let entry = image.read_entry(slot_position(dir_block, slot))?;
            if entry.is_terminator() {
                break;
            }
            if entry.is_deleted() {
                log::debug!("{}: slot {} deleted ({})", dir_path, slot, entry.name);
                continue;
            }

            frontier.observe(entry.block, entry.size);

            // "." and ".."; older writers named the self record after the directory
            if entry.is_alias() || (entry.is_directory() && entry.block == dir_block) {
                continue;
            }

            let path = join_path(&dir_path, &entry.name);
            log::debug!(
                "{:#06x} {} block {:#x} size {:#x} timestamp {:#018x}",
                entry.attributes.bits(),
                path,
                entry.block,
                entry.size,
                entry.timestamp
            );

            let node = Node::from_entry(&entry, path.clone(), slot_offset(slot), dir_id);
            let kind = node.kind;
            let id = arena.insert(node);
            if !index.insert(kind, path, id) {
                log::warn!("duplicate entry {} in {}, skipped", entry.name, dir_path);
                arena.remove(id);
                continue;
            }
            arena[dir_id].children.push(id);

            if kind == NodeKind::Directory {
                queue.push_back(id);
            }
        }
    }

    log::info!(
        "loaded {} directories and {} files, frontier at block {:#x}",
        index.dir_count(),
        index.file_count(),
        frontier.current()
    );

    Ok(LoadedTree {
        arena,
        index,
        frontier,
    })
}
