//! Common types and constants for RedSea

/// RedSea block size (native addressing unit)
pub const BLOCK_SIZE: u64 = 512;

/// ISO9660 sector size of the enclosing container
pub const SECTOR_SIZE: u64 = 2048;

/// Blocks addressable by the 32-bit sector count of the container
pub const MAX_IMAGE_BLOCKS: u64 = u32::MAX as u64 * (SECTOR_SIZE / BLOCK_SIZE);

/// Size of one directory record
pub const RECORD_SIZE: u64 = 64;

/// Longest name a record can hold (38-byte field minus terminator)
pub const MAX_NAME_LEN: usize = 37;

/// Block of the RedSea bitmap/boot block holding the root pointer
pub const DEFAULT_BITMAP_BLOCK: u64 = 0x58;

/// Block value the reference OS stores for empty files
pub const NO_BLOCK: u64 = u64::MAX;

/// Slots at the head of every directory taken by "." and ".."
pub const ALIAS_SLOTS: u64 = 2;

/// Byte offset of the boot catalog pointer in the container
pub const BOOT_CATALOG_POINTER: u64 = 0x8847;

/// Offset of the signature inside the boot catalog sector
pub const SIGNATURE_OFFSET: u64 = 4;

/// TempleOS signature found in the boot catalog
pub const SIGNATURE: &[u8; 4] = b"Temp";

/// Primary volume descriptor
pub const PRIMARY_DESCRIPTOR: u64 = 0x8000;

/// Backup copy of the volume descriptor written by TempleOS
pub const BACKUP_DESCRIPTOR: u64 = 0x9000;

/// End-sector field inside each descriptor (both-endian 32-bit)
pub const DESCRIPTOR_END_SECTOR: u64 = 0x50;

/// Root-block copy inside each descriptor (both-endian 32-bit)
pub const DESCRIPTOR_ROOT_BLOCK: u64 = 0x98;

/// Extension end-block field inside the bitmap block
pub const BITMAP_END_BLOCK: u64 = 0x10;

/// Root directory pointer inside the bitmap block
pub const BITMAP_ROOT_BLOCK: u64 = 0x18;

/// Kind of an indexed node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Regular (possibly compressed) file
    File,
    /// Directory
    Directory,
}

/// Attributes reported for a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    /// File or directory
    pub kind: NodeKind,

    /// Size in bytes (extent size for directories)
    pub size: u64,

    /// Modification time as Unix seconds
    pub mtime: i64,

    /// First block of the extent
    pub block: u64,

    /// Raw attribute bits of the record
    pub attributes: u16,
}
