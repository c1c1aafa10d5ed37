//! File-backed block device

use gpt_disk_io::BlockIo;
use gpt_disk_types::{BlockSize, Lba};
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Image file on the host, addressed in 512-byte blocks
#[derive(Debug)]
pub struct FileDevice {
    file: File,
    block_size: BlockSize,
}

impl FileDevice {
    /// Open an image file for reading and writing
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Self::from_file(file)
    }

    /// Wrap an already opened file
    ///
    /// A file whose length is not a whole number of blocks is zero-extended
    /// to the next block boundary, so its trailing bytes stay addressable.
    pub fn from_file(file: File) -> io::Result<Self> {
        let block_size = BlockSize::BS_512;
        let len = file.metadata()?.len();
        let aligned = len.div_ceil(block_size.to_u64()) * block_size.to_u64();
        if aligned != len {
            file.set_len(aligned)?;
        }
        Ok(Self { file, block_size })
    }

    /// Give back the file
    pub fn into_file(self) -> File {
        self.file
    }

    fn seek_to(&mut self, lba: Lba) -> io::Result<()> {
        let offset = lba.0 * self.block_size.to_u64();
        self.file.seek(SeekFrom::Start(offset))?;
        Ok(())
    }
}

impl BlockIo for FileDevice {
    type Error = io::Error;

    fn block_size(&self) -> BlockSize {
        self.block_size
    }

    fn num_blocks(&mut self) -> Result<u64, Self::Error> {
        Ok(self.file.metadata()?.len() / self.block_size.to_u64())
    }

    fn read_blocks(&mut self, start_lba: Lba, dst: &mut [u8]) -> Result<(), Self::Error> {
        self.seek_to(start_lba)?;
        self.file.read_exact(dst)
    }

    fn write_blocks(&mut self, start_lba: Lba, src: &[u8]) -> Result<(), Self::Error> {
        self.seek_to(start_lba)?;
        self.file.write_all(src)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.file.flush()?;
        self.file.sync_data()
    }
}
