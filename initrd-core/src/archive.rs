use alloc::vec;
use alloc::vec::Vec;

use crate::{Entry, Error, Header, HEADER_SIZE};

/// Random access source of a complete archive image. The boot-time side only
/// needs `read_at`; everything else is derived from it.
pub trait ArchiveSrc {
    type Err: From<Error>;

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize, Self::Err>;

    fn read_header(&mut self) -> Result<Header, Self::Err> {
        let mut header_data = [0; HEADER_SIZE];
        let count = self.read_at(0, &mut header_data)?;
        if count != HEADER_SIZE {
            return Err(Error::Truncated {
                expected: HEADER_SIZE,
                actual: count,
            }
            .into());
        }
        Ok(*Header::from_bytes(&header_data)?)
    }

    /// Read the descriptor table. Every entry must point past the end of the
    /// table.
    fn read_entries(&mut self) -> Result<Vec<Entry>, Self::Err> {
        let header = self.read_header()?;
        let entries_size = header.entries_size()?;

        let mut entries_data = vec![0; entries_size];
        let count = self.read_at(HEADER_SIZE as u64, &mut entries_data)?;
        if count != entries_size {
            return Err(Error::Truncated {
                expected: entries_size,
                actual: count,
            }
            .into());
        }

        let data_start = u64::try_from(header.total_size()?).map_err(Error::from)?;
        let entries = header.entries(&entries_data)?;
        for (index, entry) in entries.iter().enumerate() {
            if entry.offset() < data_start {
                return Err(Error::InvalidOffset {
                    index,
                    offset: entry.offset(),
                }
                .into());
            }
            entry.end()?;
        }
        Ok(entries.to_vec())
    }

    /// Look up an entry by its exact name
    fn find_entry(&mut self, name: &[u8]) -> Result<Option<Entry>, Self::Err> {
        Ok(self
            .read_entries()?
            .into_iter()
            .find(|entry| entry.name_bytes() == name))
    }

    /// Read from this src at a given entry's data with a given offset within
    /// that entry
    fn read_entry(
        &mut self,
        entry: Entry,
        offset: u64,
        buf: &mut [u8],
    ) -> Result<usize, Self::Err> {
        if offset >= entry.size() {
            return Ok(0);
        }

        let end = usize::try_from(entry.size() - offset)
            .map(|remaining| remaining.min(buf.len()))
            .unwrap_or(buf.len());

        let offset = entry.offset().checked_add(offset).ok_or(Error::Overflow)?;
        self.read_at(offset, &mut buf[..end])
    }
}

impl<T: AsRef<[u8]>> ArchiveSrc for T {
    type Err = Error;

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize, Error> {
        let data = self.as_ref();
        let start = usize::try_from(offset)?;
        if start >= data.len() {
            return Ok(0);
        }
        let end = start
            .checked_add(buf.len())
            .ok_or(Error::Overflow)?
            .min(data.len());
        let count = end - start;
        buf[..count].copy_from_slice(&data[start..end]);
        Ok(count)
    }
}
