use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

pub use initrd_core::{
    ArchiveSrc, Entry, Header, ENTRY_SIZE, HEADER_SIZE, MAX_ENTRIES, NAME_LEN,
};

/// Build a closure converting an `io::Error` into [`Error::Write`] for `path`
macro_rules! wrap_write_err {
    ($path:expr, $context:expr) => {
        |source| $crate::Error::Write {
            path: Some($path.to_path_buf()),
            context: $context,
            source,
        }
    };
}

mod builder;
pub mod ext;

pub use builder::ArchiveBuilder;

#[derive(thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Core(#[from] initrd_core::Error),

    #[error("Failed to read directory {}", path.display())]
    DirectoryRead { path: PathBuf, source: io::Error },

    #[error("Failed to read file {}", path.display())]
    FileRead { path: PathBuf, source: io::Error },

    #[error("Invalid name {}: must be a single path component", name.display())]
    InvalidName { name: PathBuf },

    #[error("Name {} is {len} bytes, the limit is {max}", name.display())]
    NameTooLong {
        name: PathBuf,
        len: usize,
        max: usize,
    },

    #[error("{count} files do not fit in one archive, the limit is {max}")]
    TooManyFiles { count: usize, max: usize },

    #[error("{context}{}", match path {
        Some(path) => format!(" {}", path.display()),
        None => String::new(),
    })]
    Write {
        path: Option<PathBuf>,
        context: &'static str,
        source: io::Error,
    },
}

impl Error {
    /// Attach the destination path to a write error that was raised without
    /// one. Other errors already carry their own path and are unchanged.
    pub fn path(self, new_path: impl AsRef<Path>) -> Error {
        match self {
            Error::Write {
                path: None,
                context,
                source,
            } => Error::Write {
                path: Some(new_path.as_ref().to_path_buf()),
                context,
                source,
            },
            other => other,
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{self}")?;

        let mut source = self.source();
        while let Some(err) = source {
            writeln!(f, "\tCaused by: {err}")?;
            source = err.source();
        }

        Ok(())
    }
}
