#![allow(dead_code)]

use crate::common::MemoryBlockDevice;
use redsea::utils::cdate;
use redsea::{Attributes, DirEntry};

/// Sector of the boot catalog in built images
pub const CATALOG_SECTOR: u32 = 20;

/// RedSea bitmap block
pub const BITMAP_BLOCK: u64 = 0x58;

/// Default root directory block
pub const ROOT_BLOCK: u64 = 96;

/// Unix time stamped on every built record
pub const BUILT_AT: i64 = 1_600_000_000;

/// Attribute bits TempleOS writes on plain files
pub const FILE_ATTRIBUTES: u16 = 0x820;

/// Attribute bits of directory records
pub const DIR_ATTRIBUTES: u16 = 0x810;

enum Item {
    File(Vec<u8>),
    Dir(u64),
    Deleted,
}

struct Entry {
    path: String,
    block: u64,
    item: Item,
}

/// Lays out a TempleOS-style ISO with a RedSea volume inside
pub struct ImageBuilder {
    root_size: u64,
    signature: [u8; 4],
    entries: Vec<Entry>,
}

impl ImageBuilder {
    pub fn new() -> Self {
        Self {
            root_size: 512,
            signature: *b"Temp",
            entries: Vec::new(),
        }
    }

    /// Size of the root directory extent
    #[allow(dead_code)]
    pub fn root_size(mut self, size: u64) -> Self {
        self.root_size = size;
        self
    }

    /// Tag written into the boot catalog
    #[allow(dead_code)]
    pub fn signature(mut self, signature: &[u8; 4]) -> Self {
        self.signature = *signature;
        self
    }

    /// File record plus its content at `block`
    pub fn file(mut self, path: &str, block: u64, content: &[u8]) -> Self {
        self.entries.push(Entry {
            path: path.to_string(),
            block,
            item: Item::File(content.to_vec()),
        });
        self
    }

    /// Directory record and an extent holding "." and ".."
    #[allow(dead_code)]
    pub fn dir(mut self, path: &str, block: u64, size: u64) -> Self {
        self.entries.push(Entry {
            path: path.to_string(),
            block,
            item: Item::Dir(size),
        });
        self
    }

    /// Tombstoned file record
    #[allow(dead_code)]
    pub fn deleted(mut self, path: &str, block: u64) -> Self {
        self.entries.push(Entry {
            path: path.to_string(),
            block,
            item: Item::Deleted,
        });
        self
    }

    pub fn build(self) -> MemoryBlockDevice {
        let end_block = self
            .entries
            .iter()
            .filter(|entry| entry.block != u64::MAX)
            .map(|entry| entry.block + blocks(entry.size()))
            .chain(Some(ROOT_BLOCK + blocks(self.root_size)))
            .max()
            .unwrap();
        let len = ((end_block * 512 + 2047) / 2048) * 2048;
        let mut data = vec![0u8; len as usize];

        // Primary descriptor, El Torito boot record, backup descriptor
        for (offset, kind) in [(0x8000usize, 1u8), (0x8800, 0), (0x9000, 1)] {
            data[offset] = kind;
            data[offset + 1..offset + 6].copy_from_slice(b"CD001");
            data[offset + 6] = 1;
        }
        data[0x8847..0x884B].copy_from_slice(&CATALOG_SECTOR.to_le_bytes());

        let catalog = CATALOG_SECTOR as usize * 2048;
        data[catalog] = 1; // Validation entry header
        data[catalog + 4..catalog + 8].copy_from_slice(&self.signature);

        for descriptor in [0x8000usize, 0x9000] {
            write_both_endian_u32(&mut data[descriptor + 0x98..], ROOT_BLOCK as u32);
        }
        let bitmap = (BITMAP_BLOCK * 512) as usize;
        data[bitmap + 0x18..bitmap + 0x20].copy_from_slice(&ROOT_BLOCK.to_le_bytes());

        // Directory tables: "." and ".." first, then children in insertion order
        let mut dirs = vec![("/".to_string(), ROOT_BLOCK, self.root_size, ROOT_BLOCK)];
        for entry in &self.entries {
            if let Item::Dir(size) = entry.item {
                let parent = parent_block(&dirs, &entry.path);
                dirs.push((entry.path.clone(), entry.block, size, parent));
            }
        }

        for (path, block, size, parent) in &dirs {
            let base = (*block * 512) as usize;
            write_record(&mut data, base, DIR_ATTRIBUTES, ".", *block, *size);
            write_record(&mut data, base + 64, DIR_ATTRIBUTES, "..", *parent, 0);

            let mut slot = base + 128;
            for entry in self.entries.iter().filter(|e| parent_path(&e.path) == path.as_str()) {
                let name = &entry.path[entry.path.rfind('/').unwrap() + 1..];
                let attributes = match entry.item {
                    Item::File(_) => FILE_ATTRIBUTES,
                    Item::Dir(_) => DIR_ATTRIBUTES,
                    Item::Deleted => FILE_ATTRIBUTES | 0x100,
                };
                write_record(&mut data, slot, attributes, name, entry.block, entry.size());
                slot += 64;
            }
        }

        for entry in &self.entries {
            if let Item::File(content) = &entry.item {
                if !content.is_empty() {
                    let offset = (entry.block * 512) as usize;
                    data[offset..offset + content.len()].copy_from_slice(content);
                }
            }
        }

        MemoryBlockDevice::new(data)
    }
}

impl Entry {
    fn size(&self) -> u64 {
        match &self.item {
            Item::File(content) => content.len() as u64,
            Item::Dir(size) => *size,
            Item::Deleted => 0,
        }
    }
}

fn blocks(size: u64) -> u64 {
    ((size + 511) / 512).max(1)
}

fn parent_path(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(slash) => &path[..slash],
    }
}

fn parent_block(dirs: &[(String, u64, u64, u64)], path: &str) -> u64 {
    let parent = parent_path(path);
    dirs.iter()
        .find(|(dir, ..)| dir == parent)
        .map(|(_, block, ..)| *block)
        .expect("parent directory must be added first")
}

fn write_record(data: &mut [u8], offset: usize, attributes: u16, name: &str, block: u64, size: u64) {
    let entry = DirEntry::new(
        Attributes::from_bits_retain(attributes),
        name,
        block,
        size,
        cdate::from_unix(BUILT_AT),
    );
    data[offset..offset + 64].copy_from_slice(&entry.to_bytes().unwrap());
}

fn write_both_endian_u32(buf: &mut [u8], value: u32) {
    buf[0..4].copy_from_slice(&value.to_le_bytes());
    buf[4..8].copy_from_slice(&value.to_be_bytes());
}
