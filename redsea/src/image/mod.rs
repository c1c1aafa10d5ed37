//! Byte-precise access to the backing image
//!
//! RedSea addresses records at byte granularity while the device underneath
//! speaks whole blocks. [`Image`] bridges the two with read-modify-write on
//! partial blocks. Blocks past the end of the device read as zeros, and
//! writes past the end grow the image (zero-filling any gap first).

#[cfg(feature = "std")]
pub mod file;

use crate::directory::record::DirEntry;
use crate::error::{RedSeaError, Result};
use crate::types::RECORD_SIZE;
use alloc::vec;
use alloc::vec::Vec;
use core::cmp;
use gpt_disk_io::BlockIo;
use gpt_disk_types::Lba;

/// Zero blocks written per device call when filling gaps
const ZERO_RUN_BLOCKS: u64 = 64;

const RECORD_LEN: usize = RECORD_SIZE as usize;

/// Positioned byte reads and writes over a block device
pub struct Image<B: BlockIo> {
    io: B,
    block_size: u64,
    num_blocks: u64,
}

impl<B: BlockIo> Image<B> {
    /// Wrap a block device
    pub fn new(mut io: B) -> Result<Self> {
        let block_size = io.block_size().to_u64();
        let num_blocks = io.num_blocks().map_err(io_error)?;
        Ok(Self {
            io,
            block_size,
            num_blocks,
        })
    }

    /// Current image length in bytes
    pub fn len(&self) -> u64 {
        self.num_blocks * self.block_size
    }

    /// Image holds no blocks
    pub fn is_empty(&self) -> bool {
        self.num_blocks == 0
    }

    /// Device block size in bytes
    pub fn block_size(&self) -> u64 {
        self.block_size
    }

    /// Read `dst.len()` bytes starting at byte `offset`
    pub fn read_at(&mut self, offset: u64, dst: &mut [u8]) -> Result<()> {
        check_range(offset, dst.len())?;
        let bs = self.block_size;
        let mut scratch: Option<Vec<u8>> = None;
        let mut done = 0usize;

        while done < dst.len() {
            let pos = offset + done as u64;
            let lba = pos / bs;
            let within = (pos % bs) as usize;
            let chunk = cmp::min(bs as usize - within, dst.len() - done);

            if lba >= self.num_blocks {
                dst[done..done + chunk].fill(0);
            } else if within == 0 && chunk == bs as usize {
                // Run of whole blocks that are all inside the device
                let whole = ((dst.len() - done) as u64 / bs).min(self.num_blocks - lba);
                let len = (whole * bs) as usize;
                self.io
                    .read_blocks(Lba(lba), &mut dst[done..done + len])
                    .map_err(io_error)?;
                done += len;
                continue;
            } else {
                let buf = scratch.get_or_insert_with(|| vec![0u8; bs as usize]);
                self.io.read_blocks(Lba(lba), buf).map_err(io_error)?;
                dst[done..done + chunk].copy_from_slice(&buf[within..within + chunk]);
            }
            done += chunk;
        }
        Ok(())
    }

    /// Write `src` starting at byte `offset`
    pub fn write_at(&mut self, offset: u64, src: &[u8]) -> Result<()> {
        if src.is_empty() {
            return Ok(());
        }
        check_range(offset, src.len())?;
        let bs = self.block_size;

        let first = offset / bs;
        if first > self.num_blocks {
            self.zero_blocks(self.num_blocks, first)?;
        }

        let mut scratch: Option<Vec<u8>> = None;
        let mut done = 0usize;
        while done < src.len() {
            let pos = offset + done as u64;
            let lba = pos / bs;
            let within = (pos % bs) as usize;
            let chunk = cmp::min(bs as usize - within, src.len() - done);

            if within == 0 && chunk == bs as usize {
                let whole = (src.len() - done) as u64 / bs;
                let len = (whole * bs) as usize;
                self.io
                    .write_blocks(Lba(lba), &src[done..done + len])
                    .map_err(io_error)?;
                self.num_blocks = self.num_blocks.max(lba + whole);
                done += len;
                continue;
            }

            let buf = scratch.get_or_insert_with(|| vec![0u8; bs as usize]);
            if lba < self.num_blocks {
                self.io.read_blocks(Lba(lba), buf).map_err(io_error)?;
            } else {
                buf.fill(0);
            }
            buf[within..within + chunk].copy_from_slice(&src[done..done + chunk]);
            self.io.write_blocks(Lba(lba), buf).map_err(io_error)?;
            self.num_blocks = self.num_blocks.max(lba + 1);
            done += chunk;
        }
        Ok(())
    }

    /// Overwrite `len` bytes at `offset` with zeros
    pub fn zero_at(&mut self, offset: u64, len: u64) -> Result<()> {
        let end = offset.checked_add(len).ok_or(RedSeaError::VolumeTooLarge)?;
        let run = ZERO_RUN_BLOCKS * self.block_size;
        let zeros = vec![0u8; cmp::min(len, run) as usize];

        let mut pos = offset;
        while pos < end {
            let chunk = cmp::min(end - pos, run);
            self.write_at(pos, &zeros[..chunk as usize])?;
            pos += chunk;
        }
        Ok(())
    }

    /// Copy `len` bytes from one offset to another
    pub fn copy_within(&mut self, from: u64, to: u64, len: u64) -> Result<()> {
        let mut buf = vec![0u8; len as usize];
        self.read_at(from, &mut buf)?;
        self.write_at(to, &buf)
    }

    /// Read a little-endian u32
    pub fn read_u32_le(&mut self, offset: u64) -> Result<u32> {
        let mut bytes = [0u8; 4];
        self.read_at(offset, &mut bytes)?;
        Ok(u32::from_le_bytes(bytes))
    }

    /// Read a little-endian u64
    pub fn read_u64_le(&mut self, offset: u64) -> Result<u64> {
        let mut bytes = [0u8; 8];
        self.read_at(offset, &mut bytes)?;
        Ok(u64::from_le_bytes(bytes))
    }

    /// Write a little-endian u64
    pub fn write_u64_le(&mut self, offset: u64, value: u64) -> Result<()> {
        self.write_at(offset, &value.to_le_bytes())
    }

    /// Write an ISO9660 both-byte-order u32 (LE copy, then BE copy)
    pub fn write_both_endian_u32(&mut self, offset: u64, value: u32) -> Result<()> {
        let mut bytes = [0u8; 8];
        bytes[..4].copy_from_slice(&value.to_le_bytes());
        bytes[4..].copy_from_slice(&value.to_be_bytes());
        self.write_at(offset, &bytes)
    }

    /// Raw 64-byte record at `offset`
    pub fn read_record(&mut self, offset: u64) -> Result<[u8; RECORD_LEN]> {
        let mut record = [0u8; RECORD_LEN];
        self.read_at(offset, &mut record)?;
        Ok(record)
    }

    /// Decode the directory record at `offset`
    pub fn read_entry(&mut self, offset: u64) -> Result<DirEntry> {
        DirEntry::parse(&self.read_record(offset)?)
    }

    /// Encode a directory record at `offset`
    pub fn write_entry(&mut self, offset: u64, entry: &DirEntry) -> Result<()> {
        let record = entry.to_bytes()?;
        self.write_at(offset, &record)
    }

    /// Modify the record at `offset` in place
    ///
    /// Only the fields `patch` changes are written back.
    pub fn patch_entry<F>(&mut self, offset: u64, patch: F) -> Result<()>
    where
        F: FnOnce(&mut DirEntry),
    {
        let mut record = self.read_record(offset)?;
        let base = DirEntry::parse(&record)?;
        let mut entry = base.clone();
        patch(&mut entry);
        entry.write_changes(&base, &mut record)?;
        self.write_at(offset, &record)
    }

    /// Flush the device
    pub fn flush(&mut self) -> Result<()> {
        self.io.flush().map_err(io_error)
    }

    /// Give back the device
    pub fn into_inner(self) -> B {
        self.io
    }

    fn zero_blocks(&mut self, from: u64, to: u64) -> Result<()> {
        let zeros = vec![0u8; (ZERO_RUN_BLOCKS * self.block_size) as usize];
        let mut lba = from;
        while lba < to {
            let count = cmp::min(ZERO_RUN_BLOCKS, to - lba);
            let len = (count * self.block_size) as usize;
            self.io
                .write_blocks(Lba(lba), &zeros[..len])
                .map_err(io_error)?;
            lba += count;
        }
        self.num_blocks = self.num_blocks.max(to);
        Ok(())
    }
}

/// Byte ranges must be addressable without wrapping
fn check_range(offset: u64, len: usize) -> Result<()> {
    offset
        .checked_add(len as u64)
        .map(|_| ())
        .ok_or(RedSeaError::VolumeTooLarge)
}

fn io_error<E: core::fmt::Debug>(err: E) -> RedSeaError {
    log::debug!("block device error: {:?}", err);
    RedSeaError::IoError
}
