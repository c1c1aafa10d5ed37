//! In-memory directory tree
//!
//! Nodes live in an arena and refer to each other by [`NodeId`]; two path
//! maps (files and directories) resolve paths to handles.

pub mod index;
pub mod loader;
pub mod node;

pub use index::PathIndex;
pub use loader::{load, LoadedTree};
pub use node::{Node, NodeArena, NodeId};
