//! Error types for RedSea operations

use core::fmt;

/// Result type for RedSea operations
pub type Result<T> = core::result::Result<T, RedSeaError>;

/// Errors that can occur during RedSea operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedSeaError {
    /// I/O error on the backing block device
    IoError,

    /// Boot catalog does not carry the TempleOS signature
    SignatureMismatch,

    /// Directory record could not be decoded
    InvalidDirectoryRecord,

    /// File or directory not found
    NotFound,

    /// Parent directory of the path does not exist
    NoSuchParent,

    /// A file or directory already exists at the path
    AlreadyExists,

    /// Path names a file where a directory is required
    NotADirectory,

    /// Path names a directory where a file is required
    IsADirectory,

    /// Directory still has children
    DirectoryNotEmpty,

    /// Name exceeds 37 bytes
    NameTooLong,

    /// Invalid path format, or an operation the root cannot take part in
    InvalidPath,

    /// Value does not fit the 32-bit ISO9660 fields
    VolumeTooLarge,
}

impl fmt::Display for RedSeaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IoError => write!(f, "I/O error on block device"),
            Self::SignatureMismatch => write!(f, "RedSea signature not found in boot catalog"),
            Self::InvalidDirectoryRecord => write!(f, "Corrupted directory record"),
            Self::NotFound => write!(f, "File or directory not found"),
            Self::NoSuchParent => write!(f, "Parent directory not found"),
            Self::AlreadyExists => write!(f, "File or directory already exists"),
            Self::NotADirectory => write!(f, "Not a directory"),
            Self::IsADirectory => write!(f, "Is a directory"),
            Self::DirectoryNotEmpty => write!(f, "Directory not empty"),
            Self::NameTooLong => write!(f, "Name exceeds 37 bytes"),
            Self::InvalidPath => write!(f, "Invalid path"),
            Self::VolumeTooLarge => write!(f, "Volume exceeds ISO9660 32-bit sector range"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RedSeaError {}
