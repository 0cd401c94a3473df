//! The packed structs represent the on-disk format of the initrd

use bytemuck::{Pod, Zeroable};

use crate::{Entry, Error, ENTRY_SIZE, HEADER_SIZE};

#[derive(Clone, Copy, Debug, Pod, Zeroable)]
#[repr(packed, C)]
pub struct Header {
    /// Count of Entry structs, which starts immediately after header struct
    pub count: u8,
}

impl Header {
    /// Create a header for `count` entries, rejecting counts the single
    /// byte field cannot hold
    pub fn new(count: usize) -> Result<Header, Error> {
        let count = u8::try_from(count).map_err(|_| Error::TooManyEntries(count))?;
        Ok(Header { count })
    }

    /// Parse header from the start of raw archive data
    pub fn from_bytes(data: &[u8]) -> Result<&Header, Error> {
        let data = data.get(..HEADER_SIZE).ok_or(Error::Truncated {
            expected: HEADER_SIZE,
            actual: data.len(),
        })?;
        Ok(bytemuck::try_from_bytes(data)?)
    }

    pub fn count(&self) -> usize {
        self.count as usize
    }

    /// Retrieve the size of the entries
    pub fn entries_size(&self) -> Result<usize, Error> {
        self.count()
            .checked_mul(ENTRY_SIZE)
            .ok_or(Error::Overflow)
    }

    /// Retrieve the size of the Header and its entries, which is also the
    /// offset of the first payload
    pub fn total_size(&self) -> Result<usize, Error> {
        self.entries_size()?
            .checked_add(HEADER_SIZE)
            .ok_or(Error::Overflow)
    }

    /// Parse entries from raw entries data
    pub fn entries<'a>(&self, data: &'a [u8]) -> Result<&'a [Entry], Error> {
        let entries_size = self.entries_size()?;

        let entries_data = data.get(..entries_size).ok_or(Error::Truncated {
            expected: entries_size,
            actual: data.len(),
        })?;

        Ok(bytemuck::try_cast_slice(entries_data)?)
    }
}
