use alloc::format;
use alloc::string::ToString;
use core::error;
use core::fmt::{Display, Formatter, Result};

#[derive(Debug)]
pub enum Error {
    Cast(bytemuck::PodCastError),
    InvalidOffset { index: usize, offset: u64 },
    NameTooLong(usize),
    Overflow,
    TooManyEntries(usize),
    Truncated { expected: usize, actual: usize },
    TryFromInt(core::num::TryFromIntError),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> Result {
        use Error::*;

        let msg = match self {
            Cast(err) => format!("Cast: {:?}", err),
            InvalidOffset { index, offset } => {
                format!("Entry {} has offset {} inside the entry table", index, offset)
            }
            NameTooLong(len) => format!(
                "Name is {} bytes, the limit is {}",
                len,
                crate::NAME_LEN
            ),
            Overflow => "Overflow".to_string(),
            TooManyEntries(count) => format!(
                "{} entries do not fit in the header, the limit is {}",
                count,
                crate::MAX_ENTRIES
            ),
            Truncated { expected, actual } => {
                format!("Truncated archive: expected {} bytes, got {}", expected, actual)
            }
            TryFromInt(err) => format!("TryFromInt: {}", err),
        };
        write!(f, "{}", msg)
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Cast(e) => Some(e),
            Self::TryFromInt(e) => Some(e),
            _ => None,
        }
    }
}

impl From<bytemuck::PodCastError> for Error {
    fn from(err: bytemuck::PodCastError) -> Error {
        Error::Cast(err)
    }
}

impl From<core::num::TryFromIntError> for Error {
    fn from(err: core::num::TryFromIntError) -> Error {
        Error::TryFromInt(err)
    }
}
