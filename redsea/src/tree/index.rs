//! Path to node resolution
//!
//! Files and directories are kept in separate maps; a path resolves to at
//! most one of them.

use crate::tree::node::NodeId;
use crate::types::NodeKind;
use alloc::collections::BTreeMap;
use alloc::string::String;

/// Two path maps, one per node kind
#[derive(Debug, Clone, Default)]
pub struct PathIndex {
    files: BTreeMap<String, NodeId>,
    dirs: BTreeMap<String, NodeId>,
}

impl PathIndex {
    /// Empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a path of either kind
    pub fn lookup(&self, path: &str) -> Option<(NodeKind, NodeId)> {
        if let Some(&id) = self.dirs.get(path) {
            return Some((NodeKind::Directory, id));
        }
        self.files.get(path).map(|&id| (NodeKind::File, id))
    }

    /// Path is taken by a file or a directory
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path) || self.dirs.contains_key(path)
    }

    /// Register a path; returns false if it was already taken
    pub fn insert(&mut self, kind: NodeKind, path: String, id: NodeId) -> bool {
        if self.contains(&path) {
            return false;
        }
        self.map_mut(kind).insert(path, id);
        true
    }

    /// Forget a path
    pub fn remove(&mut self, kind: NodeKind, path: &str) -> Option<NodeId> {
        self.map_mut(kind).remove(path)
    }

    /// Move a handle from one path to another
    pub fn rekey(&mut self, kind: NodeKind, old: &str, new: String) {
        let map = self.map_mut(kind);
        if let Some(id) = map.remove(old) {
            map.insert(new, id);
        }
    }

    /// Number of indexed files
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Number of indexed directories (root included)
    pub fn dir_count(&self) -> usize {
        self.dirs.len()
    }

    fn map_mut(&mut self, kind: NodeKind) -> &mut BTreeMap<String, NodeId> {
        match kind {
            NodeKind::File => &mut self.files,
            NodeKind::Directory => &mut self.dirs,
        }
    }
}
