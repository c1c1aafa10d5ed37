//! RedSea Filesystem Driver
//!
//! Read/write access to the RedSea filesystem, the flat filesystem that
//! TempleOS embeds inside an ISO9660 boot image.
//!
//! # Overview
//!
//! A RedSea volume lives inside an ISO9660 container. The container points at
//! an El Torito boot catalog, the RedSea bitmap block records where the root
//! directory starts, and every directory is a flat table of 64-byte records.
//! This crate provides:
//! - Volume location and signature checking
//! - A full in-memory index of the directory tree, built once at mount
//! - Create, delete, rename, write and truncate for files and directories
//! - Re-synchronisation of the ISO9660 size fields at unmount
//!
//! # Architecture
//!
//! The implementation is layered:
//! 1. **Image layer** - byte-precise reads and writes on a [`BlockIo`] device
//! 2. **Codec layer** - directory records and CDate timestamps
//! 3. **Volume layer** - boot catalog, signature, root pointer, finalization
//! 4. **Tree layer** - node arena and path index built by the loader
//! 5. **Engine layer** - allocator, relocation and mutations on [`RedSea`]
//!
//! # Usage
//!
//! ```ignore
//! use redsea::{FileDevice, MountOptions, RedSea};
//!
//! let device = FileDevice::open("TempleOS.ISO.C")?;
//! let mut fs = RedSea::mount(device, MountOptions::default())?;
//!
//! fs.create("/Home/Notes.HC")?;
//! fs.write("/Home/Notes.HC", b"\"Hello\\n\";\n", 0)?;
//! for name in fs.list("/Home")? {
//!     let meta = fs.attributes(&format!("/Home/{}", name))?;
//! }
//!
//! // Rewrites the ISO9660 size fields and hands the device back
//! let device = fs.finalize()?;
//! ```
//!
//! # Limitations
//!
//! There is no journaling and no space reclamation: deleted and relocated
//! extents stay where they are, and a mutation interrupted half-way leaves
//! the image inconsistent. The loader trusts on-disk data; a corrupt directory
//! table produces an incomplete index rather than an error.
//!
//! [`BlockIo`]: gpt_disk_io::BlockIo

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod allocator;
pub mod directory;
pub mod error;
pub mod filesystem;
pub mod image;
mod ops;
pub mod tree;
pub mod types;
pub mod utils;
pub mod volume;

pub use directory::record::{Attributes, DirEntry};
pub use error::{RedSeaError, Result};
pub use filesystem::{MountOptions, RedSea};
pub use image::Image;
pub use types::{Metadata, NodeKind};
pub use volume::Volume;

#[cfg(feature = "std")]
pub use image::file::FileDevice;
