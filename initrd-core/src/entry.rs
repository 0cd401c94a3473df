//! The packed structs represent the on-disk format of the initrd
use core::fmt::Display;

use bytemuck::{Pod, Zeroable};

use crate::{Error, NAME_LEN};

/// One 80 byte record of the entry table. Fields are only set through
/// [`Entry::new`], which enforces the name limit:
///
/// ```compile_fail
/// let mut entry = initrd_core::Entry::new(b"file0.txt", 22, 161).unwrap();
/// entry.name[0] = 0;
/// ```
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
#[repr(packed, C)]
pub struct Entry {
    /// Base name of the file, zero padded. Not NUL-terminated when all
    /// 64 bytes are used.
    name: [u8; NAME_LEN],
    /// Size in bytes of the file data, little-endian
    size: u64,
    /// Absolute offset of the file data within the archive, little-endian
    offset: u64,
}

impl Display for Entry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "name={:?} offset={} size={}",
            alloc::string::String::from_utf8_lossy(self.name_bytes()),
            self.offset(),
            self.size(),
        )
    }
}

impl Entry {
    pub fn new(name: &[u8], size: u64, offset: u64) -> Result<Entry, Error> {
        if name.len() > NAME_LEN {
            return Err(Error::NameTooLong(name.len()));
        }

        let mut entry = Entry {
            name: [0; NAME_LEN],
            size: size.to_le(),
            offset: offset.to_le(),
        };
        entry.name[..name.len()].copy_from_slice(name);
        Ok(entry)
    }

    pub fn size(&self) -> u64 {
        u64::from_le(self.size)
    }

    pub fn offset(&self) -> u64 {
        u64::from_le(self.offset)
    }

    /// Offset of the first byte after this entry's data
    pub fn end(&self) -> Result<u64, Error> {
        self.offset()
            .checked_add(self.size())
            .ok_or(Error::Overflow)
    }

    /// Retrieve the name, ending at the first NUL
    pub fn name_bytes(&self) -> &[u8] {
        let len = self
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.name.len());
        &self.name[..len]
    }
}
