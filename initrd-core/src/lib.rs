#![no_std]
extern crate alloc;

use core::mem;

pub use crate::archive::ArchiveSrc;
pub use crate::entry::Entry;
pub use crate::error::Error;
pub use crate::header::Header;

mod archive;
mod entry;
mod error;
mod header;

pub const HEADER_SIZE: usize = mem::size_of::<Header>();
pub const ENTRY_SIZE: usize = mem::size_of::<Entry>();

/// Width of the zero-padded name field of an [`Entry`]
pub const NAME_LEN: usize = 64;
/// Largest entry count representable by the one byte [`Header`]
pub const MAX_ENTRIES: usize = u8::MAX as usize;

#[cfg(test)]
mod tests {
    use core::mem;

    use crate::{Entry, Header, ENTRY_SIZE, HEADER_SIZE};

    #[test]
    fn header_size() {
        assert_eq!(mem::size_of::<Header>(), 1);
        assert_eq!(HEADER_SIZE, 1);
    }

    #[test]
    fn entry_size() {
        assert_eq!(mem::size_of::<Entry>(), 80);
        assert_eq!(ENTRY_SIZE, 80);
    }
}
