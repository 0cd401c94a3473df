//! Extention traits and checks for base types defined in `initrd-core`.
use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;
use std::path::{Component, Path};

use initrd_core::{Entry, NAME_LEN};

use crate::Error;

/// Ensure `name` can be stored in an entry and read back unchanged: a single
/// normal path component, no NUL bytes, at most [`NAME_LEN`] bytes.
pub fn check_name(name: &[u8]) -> Result<&Path, Error> {
    let path = Path::new(OsStr::from_bytes(name));

    let mut components = path.components();
    let single_normal = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !single_normal || name.contains(&b'/') || name.contains(&0) {
        return Err(Error::InvalidName {
            name: path.to_path_buf(),
        });
    }

    if name.len() > NAME_LEN {
        return Err(Error::NameTooLong {
            name: path.to_path_buf(),
            len: name.len(),
            max: NAME_LEN,
        });
    }

    Ok(path)
}

pub trait EntryExt {
    fn check_name(&self) -> Result<&Path, Error>;
}

impl EntryExt for Entry {
    /// Check the stored name and return it as a path
    fn check_name(&self) -> Result<&Path, Error> {
        check_name(self.name_bytes())
    }
}
