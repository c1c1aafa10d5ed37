//! Common test utilities and mock block devices

pub mod builder;
pub use builder::ImageBuilder;

use gpt_disk_io::BlockIo;
use gpt_disk_types::{BlockSize, Lba};
use redsea::{DirEntry, MountOptions, RedSea};
use std::io;

/// Unix time every test clock reports
#[allow(dead_code)]
pub const NOW: i64 = 1_700_000_000;

/// In-memory block device for testing
///
/// Writes past the end grow the device, like a sparse image file.
#[derive(Debug, Clone)]
pub struct MemoryBlockDevice {
    pub data: Vec<u8>,
    pub block_size: usize,
}

impl MemoryBlockDevice {
    /// Create a new memory block device from raw data
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            block_size: 512, // RedSea block size
        }
    }

    /// Decode the directory record at a byte offset
    #[allow(dead_code)]
    pub fn record(&self, offset: u64) -> DirEntry {
        let offset = offset as usize;
        DirEntry::parse(&self.data[offset..offset + 64]).expect("record should decode")
    }

    /// Little-endian u32 at a byte offset
    #[allow(dead_code)]
    pub fn u32_le(&self, offset: usize) -> u32 {
        u32::from_le_bytes(self.data[offset..offset + 4].try_into().unwrap())
    }

    /// Big-endian u32 at a byte offset
    #[allow(dead_code)]
    pub fn u32_be(&self, offset: usize) -> u32 {
        u32::from_be_bytes(self.data[offset..offset + 4].try_into().unwrap())
    }

    /// Little-endian u64 at a byte offset
    #[allow(dead_code)]
    pub fn u64_le(&self, offset: usize) -> u64 {
        u64::from_le_bytes(self.data[offset..offset + 8].try_into().unwrap())
    }
}

impl BlockIo for MemoryBlockDevice {
    type Error = io::Error;

    fn block_size(&self) -> BlockSize {
        BlockSize::new(self.block_size as u32).expect("valid block size")
    }

    fn num_blocks(&mut self) -> Result<u64, Self::Error> {
        Ok((self.data.len() / self.block_size) as u64)
    }

    fn read_blocks(&mut self, start_lba: Lba, dst: &mut [u8]) -> Result<(), Self::Error> {
        let offset = start_lba.0 as usize * self.block_size;
        if offset + dst.len() > self.data.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "read beyond end of device",
            ));
        }
        dst.copy_from_slice(&self.data[offset..offset + dst.len()]);
        Ok(())
    }

    fn write_blocks(&mut self, start_lba: Lba, src: &[u8]) -> Result<(), Self::Error> {
        let offset = start_lba.0 as usize * self.block_size;
        if offset + src.len() > self.data.len() {
            self.data.resize(offset + src.len(), 0);
        }
        self.data[offset..offset + src.len()].copy_from_slice(src);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Clock pinned to [`NOW`]
pub fn fixed_clock() -> i64 {
    NOW
}

/// Mount options with the fixed clock
pub fn options() -> MountOptions {
    MountOptions {
        clock: fixed_clock,
        ..MountOptions::default()
    }
}

/// Mount a device with the fixed clock
#[allow(dead_code)]
pub fn mount(device: MemoryBlockDevice) -> RedSea<MemoryBlockDevice> {
    RedSea::mount(device, options()).expect("mount should succeed")
}

/// Decode the record at a byte offset of a mounted image
#[allow(dead_code)]
pub fn record_at(fs: &mut RedSea<MemoryBlockDevice>, offset: u64) -> DirEntry {
    fs.image_mut()
        .read_entry(offset)
        .expect("record should decode")
}
