//! Tree nodes and their arena

use crate::directory::record::{Attributes, DirEntry};
use crate::types::{Metadata, NodeKind, NO_BLOCK};
use crate::utils::{cdate, sector};
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

/// Stable handle to a node in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The root directory is always the first node
    pub const ROOT: NodeId = NodeId(0);
}

/// A file or directory known to the index
#[derive(Debug, Clone)]
pub struct Node {
    /// File or directory
    pub kind: NodeKind,

    /// Full path ("/" for the root)
    pub path: String,

    /// Name as stored in the record ("." for the root)
    pub name: String,

    /// Attribute bits of the record
    pub attributes: Attributes,

    /// Size in bytes
    pub size: u64,

    /// First block of the extent
    pub block: u64,

    /// CDate modification time
    pub timestamp: u64,

    /// Byte offset of this node's record within the parent's extent
    pub seek_to: u64,

    /// Containing directory (none for the root)
    pub parent: Option<NodeId>,

    /// Children in on-disk record order (directories only)
    pub children: Vec<NodeId>,
}

impl Node {
    /// Root directory node
    pub fn root(block: u64, size: u64, timestamp: u64) -> Self {
        Self {
            kind: NodeKind::Directory,
            path: String::from("/"),
            name: String::from("."),
            attributes: Attributes::DIRECTORY | Attributes::CONTIGUOUS,
            size,
            block,
            timestamp,
            seek_to: 0,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Node described by a record found in `parent`
    pub fn from_entry(entry: &DirEntry, path: String, seek_to: u64, parent: NodeId) -> Self {
        let kind = if entry.is_directory() {
            NodeKind::Directory
        } else {
            NodeKind::File
        };
        Self {
            kind,
            path,
            name: entry.name.clone(),
            attributes: entry.attributes,
            size: entry.size,
            block: entry.block,
            timestamp: entry.timestamp,
            seek_to,
            parent: Some(parent),
            children: Vec::new(),
        }
    }

    /// Node is a directory
    pub fn is_directory(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    /// Node has a real extent (empty TempleOS files have none)
    pub fn has_extent(&self) -> bool {
        self.block != NO_BLOCK
    }

    /// First block past the node's extent
    pub fn extent_end(&self) -> u64 {
        sector::extent_end(self.block, self.size)
    }

    /// Attributes reported to callers
    pub fn metadata(&self) -> Metadata {
        Metadata {
            kind: self.kind,
            size: self.size,
            mtime: cdate::to_unix(self.timestamp),
            block: self.block,
            attributes: self.attributes.bits(),
        }
    }
}

/// Owner of every node; removed nodes leave a hole so handles stay valid
#[derive(Debug, Clone)]
pub struct NodeArena {
    nodes: Vec<Option<Node>>,
}

impl NodeArena {
    /// Arena holding only the root
    pub fn new(root: Node) -> Self {
        Self {
            nodes: vec![Some(root)],
        }
    }

    /// Add a node and return its handle
    pub fn insert(&mut self, node: Node) -> NodeId {
        self.nodes.push(Some(node));
        NodeId(self.nodes.len() - 1)
    }

    /// Drop a node
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        self.nodes.get_mut(id.0).and_then(Option::take)
    }

    /// Look up a node
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    /// Look up a node mutably
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }
}

impl Index<NodeId> for NodeArena {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        match self.get(id) {
            Some(node) => node,
            None => panic!("stale node handle {:?}", id),
        }
    }
}

impl IndexMut<NodeId> for NodeArena {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        match self.get_mut(id) {
            Some(node) => node,
            None => panic!("stale node handle {:?}", id),
        }
    }
}
