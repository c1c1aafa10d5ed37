//! Directory record encoding and slot management

pub mod record;
pub mod slots;

pub use record::{Attributes, DirEntry};
