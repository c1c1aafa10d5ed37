//! Path and name handling

use crate::error::{RedSeaError, Result};
use crate::types::MAX_NAME_LEN;
use alloc::format;
use alloc::string::String;

/// Split a path into its parent directory path and final component
///
/// `"/A.TXT"` gives `("/", "A.TXT")`, `"/Home/X"` gives `("/Home", "X")`.
pub fn split_path(path: &str) -> Result<(&str, &str)> {
    let path = path.strip_suffix('/').unwrap_or(path);
    let slash = path.rfind('/').ok_or(RedSeaError::InvalidPath)?;
    let name = &path[slash + 1..];
    if name.is_empty() {
        return Err(RedSeaError::InvalidPath);
    }
    let parent = if slash == 0 { "/" } else { &path[..slash] };
    Ok((parent, name))
}

/// Join a directory path and a child name
pub fn join_path(parent: &str, name: &str) -> String {
    if parent == "/" {
        format!("/{}", name)
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Check a record name against the 37-byte limit
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') {
        return Err(RedSeaError::InvalidPath);
    }
    if name.len() > MAX_NAME_LEN {
        return Err(RedSeaError::NameTooLong);
    }
    Ok(())
}

/// Names ending in `.Z` are stored with the compressed attribute
pub fn is_compressed_name(name: &str) -> bool {
    name.ends_with(".Z")
}
