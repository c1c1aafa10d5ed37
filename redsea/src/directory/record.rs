//! Directory Record structure
//!
//! Every directory is a table of fixed 64-byte records. The first two slots
//! of a directory hold its "." and ".." aliases.

use crate::error::{RedSeaError, Result};
use crate::types::{MAX_NAME_LEN, RECORD_SIZE};
use alloc::string::String;

/// Attribute bits (offset 0)
pub const ATTRIBUTES_OFFSET: usize = 0;
/// Name field (offset 2, 38 bytes, NUL terminated)
pub const NAME_OFFSET: usize = 2;
/// Name field length
pub const NAME_FIELD_LEN: usize = 38;
/// Extent start block (offset 40)
pub const BLOCK_OFFSET: usize = 40;
/// Extent size in bytes (offset 48)
pub const SIZE_OFFSET: usize = 48;
/// CDate timestamp (offset 56)
pub const TIMESTAMP_OFFSET: usize = 56;

const LEN: usize = RECORD_SIZE as usize;

bitflags::bitflags! {
    /// Attribute bits of a directory record.
    ///
    /// Zero attributes mark the end of a directory table. Bits not named here
    /// are preserved as read.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Attributes: u16 {
        /// Entry is a directory
        const DIRECTORY = 0x0010;
        /// Set by TempleOS on plain files; meaning undocumented
        const UNKNOWN_0X20 = 0x0020;
        /// Entry has been deleted (tombstone)
        const DELETED = 0x0100;
        /// File content is compressed
        const COMPRESSED = 0x0400;
        /// Extent is allocated contiguously
        const CONTIGUOUS = 0x0800;
    }
}

/// One decoded directory record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Attribute bits
    pub attributes: Attributes,

    /// Entry name (up to 37 bytes)
    pub name: String,

    /// First block of the extent
    pub block: u64,

    /// Extent length in bytes
    pub size: u64,

    /// CDate modification time
    pub timestamp: u64,
}

impl DirEntry {
    /// Build a new record
    pub fn new(attributes: Attributes, name: &str, block: u64, size: u64, timestamp: u64) -> Self {
        Self {
            attributes,
            name: String::from(name),
            block,
            size,
            timestamp,
        }
    }

    /// Parse a record from the first 64 bytes of `data`
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < LEN {
            return Err(RedSeaError::InvalidDirectoryRecord);
        }

        let attributes = Attributes::from_bits_retain(u16::from_le_bytes([
            data[ATTRIBUTES_OFFSET],
            data[ATTRIBUTES_OFFSET + 1],
        ]));

        // A full 38-byte name without terminator is tolerated on read
        let field = &data[NAME_OFFSET..NAME_OFFSET + NAME_FIELD_LEN];
        let end = field.iter().position(|&b| b == 0).unwrap_or(NAME_FIELD_LEN);
        let name = String::from_utf8_lossy(&field[..end]).into_owned();

        Ok(Self {
            attributes,
            name,
            block: read_u64(data, BLOCK_OFFSET),
            size: read_u64(data, SIZE_OFFSET),
            timestamp: read_u64(data, TIMESTAMP_OFFSET),
        })
    }

    /// Encode into a 64-byte record
    pub fn to_bytes(&self) -> Result<[u8; LEN]> {
        let mut out = [0u8; LEN];
        write_name(&mut out, &self.name)?;
        out[ATTRIBUTES_OFFSET..ATTRIBUTES_OFFSET + 2]
            .copy_from_slice(&self.attributes.bits().to_le_bytes());
        write_u64(&mut out, BLOCK_OFFSET, self.block);
        write_u64(&mut out, SIZE_OFFSET, self.size);
        write_u64(&mut out, TIMESTAMP_OFFSET, self.timestamp);
        Ok(out)
    }

    /// Store into `record` only the fields in which `self` differs from `base`
    ///
    /// `base` is the decoded form of `record`. Fields left alone keep their
    /// on-disk bytes, so names that do not survive decoding (invalid UTF-8,
    /// 38 bytes without terminator) are not rewritten by a size or block patch.
    pub fn write_changes(&self, base: &DirEntry, record: &mut [u8; LEN]) -> Result<()> {
        if self.name != base.name {
            write_name(record, &self.name)?;
        }
        if self.attributes != base.attributes {
            record[ATTRIBUTES_OFFSET..ATTRIBUTES_OFFSET + 2]
                .copy_from_slice(&self.attributes.bits().to_le_bytes());
        }
        if self.block != base.block {
            write_u64(record, BLOCK_OFFSET, self.block);
        }
        if self.size != base.size {
            write_u64(record, SIZE_OFFSET, self.size);
        }
        if self.timestamp != base.timestamp {
            write_u64(record, TIMESTAMP_OFFSET, self.timestamp);
        }
        Ok(())
    }

    /// Zero attributes end the directory table
    pub fn is_terminator(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Entry carries the tombstone bit
    pub fn is_deleted(&self) -> bool {
        self.attributes.contains(Attributes::DELETED)
    }

    /// Entry is a directory
    pub fn is_directory(&self) -> bool {
        self.attributes.contains(Attributes::DIRECTORY)
    }

    /// Entry is a "." or ".." alias
    pub fn is_alias(&self) -> bool {
        self.name == "." || self.name == ".."
    }
}

fn write_name(record: &mut [u8; LEN], name: &str) -> Result<()> {
    let name = name.as_bytes();
    if name.len() > MAX_NAME_LEN {
        return Err(RedSeaError::NameTooLong);
    }
    let field = &mut record[NAME_OFFSET..NAME_OFFSET + NAME_FIELD_LEN];
    field.fill(0);
    field[..name.len()].copy_from_slice(name);
    Ok(())
}

fn write_u64(record: &mut [u8; LEN], offset: usize, value: u64) {
    record[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
}

fn read_u64(data: &[u8], offset: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&data[offset..offset + 8]);
    u64::from_le_bytes(bytes)
}
