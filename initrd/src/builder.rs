use std::fmt;
use std::fs::{self, Permissions};
use std::io::Write;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use initrd_core::{Entry, Header, MAX_ENTRIES};
use log::{debug, info, warn};
use tempfile::NamedTempFile;

use crate::ext::check_name;
use crate::Error;

#[derive(Debug)]
struct BuilderEntry {
    /// Base name stored in the archive
    name: Vec<u8>,

    kind: BuilderEntryKind,
}

impl BuilderEntry {
    // Verify names up front so that a bad entry fails before anything is read
    fn new(name: &[u8], kind: BuilderEntryKind) -> Result<BuilderEntry, Error> {
        check_name(name)?;
        Ok(BuilderEntry {
            name: name.to_vec(),
            kind,
        })
    }

    fn into_payload(self) -> Result<(Vec<u8>, Vec<u8>), Error> {
        let data = match self.kind {
            BuilderEntryKind::File(path) => {
                fs::read(&path).map_err(|source| Error::FileRead { path, source })?
            }
            BuilderEntryKind::Bytes(data) => data,
        };
        Ok((self.name, data))
    }
}

enum BuilderEntryKind {
    /// Path to regular file during build
    File(PathBuf),

    /// File contents already in memory
    Bytes(Vec<u8>),
}

impl fmt::Debug for BuilderEntryKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use BuilderEntryKind::*;
        match self {
            File(p) => write!(f, "BuilderEntryKind::File({:?})", p),
            Bytes(data) => write!(f, "BuilderEntryKind::Bytes({} bytes)", data.len()),
        }
    }
}

/// Builder pattern for constructing initrd archives. Holds an ordered list of
/// entries and consumes itself to construct an archive.
///
/// Entries are stored in the order they were added. [`ArchiveBuilder::dir`]
/// adds the files of a directory sorted by name unless sorting was turned
/// off with [`ArchiveBuilder::sort`], in which case the platform's
/// enumeration order is kept.
///
/// # Example
/// ```
/// use initrd::{ArchiveBuilder, ArchiveSrc};
///
/// let mut builder = ArchiveBuilder::new();
/// builder
///     .file_bytes("file0.txt", &b"Hello from the initrd\n"[..]).unwrap()
///     .file_bytes("file1.txt", &b"another file"[..]).unwrap();
///
/// let mut archive = builder.encode().unwrap();
/// assert_eq!(archive.len(), 195);
///
/// let entry = archive.find_entry(b"file1.txt").unwrap().unwrap();
/// assert_eq!(entry.offset(), 183);
/// assert_eq!(entry.size(), 12);
/// ```
pub struct ArchiveBuilder {
    entries: Vec<BuilderEntry>,
    sort: bool,
}

impl ArchiveBuilder {
    pub fn new() -> ArchiveBuilder {
        ArchiveBuilder {
            entries: Vec::new(),
            sort: true,
        }
    }

    /// Whether [`ArchiveBuilder::dir`] sorts directory children by name.
    /// Defaults to `true`.
    pub fn sort(&mut self, sort: bool) -> &mut ArchiveBuilder {
        self.sort = sort;
        self
    }

    /// Add a regular file to this builder. `source` is the position of the
    /// file on the build system; its base name is stored in the archive.
    /// The contents are read when the archive is encoded.
    pub fn file(&mut self, source: impl AsRef<Path>) -> Result<&mut ArchiveBuilder, Error> {
        let source = source.as_ref();
        let name = source.file_name().ok_or_else(|| Error::InvalidName {
            name: source.to_path_buf(),
        })?;
        self.entries.push(BuilderEntry::new(
            name.as_bytes(),
            BuilderEntryKind::File(source.to_path_buf()),
        )?);
        Ok(self)
    }

    /// Add a file whose contents are already in memory
    pub fn file_bytes(
        &mut self,
        name: impl AsRef<Path>,
        data: impl Into<Vec<u8>>,
    ) -> Result<&mut ArchiveBuilder, Error> {
        self.entries.push(BuilderEntry::new(
            name.as_ref().as_os_str().as_bytes(),
            BuilderEntryKind::Bytes(data.into()),
        )?);
        Ok(self)
    }

    /// Add every regular file directly inside `dir`. Symlinks are followed,
    /// subdirectories and other kinds of entries are skipped.
    pub fn dir(&mut self, dir: impl AsRef<Path>) -> Result<&mut ArchiveBuilder, Error> {
        let dir = dir.as_ref();
        let read_dir_err = |source| Error::DirectoryRead {
            path: dir.to_path_buf(),
            source,
        };

        let mut children = Vec::new();
        for entry_res in fs::read_dir(dir).map_err(read_dir_err)? {
            children.push(entry_res.map_err(read_dir_err)?);
        }
        if self.sort {
            children.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        }

        for child in children {
            let path = child.path();
            let metadata = fs::metadata(&path).map_err(|source| Error::FileRead {
                path: path.clone(),
                source,
            })?;

            if !metadata.is_file() {
                warn!("Skipping {}: not a regular file", path.display());
                continue;
            }

            self.entries.push(BuilderEntry::new(
                child.file_name().as_bytes(),
                BuilderEntryKind::File(path),
            )?);
        }
        Ok(self)
    }

    /// Consume this `ArchiveBuilder`, reading every entry and producing the
    /// complete archive image: header, entry table, then the file data in
    /// entry order.
    pub fn encode(self) -> Result<Vec<u8>, Error> {
        let count = self.entries.len();
        if count > MAX_ENTRIES {
            return Err(Error::TooManyFiles {
                count,
                max: MAX_ENTRIES,
            });
        }

        // Everything is read before encoding so a failed read leaves no output
        let payloads = self
            .entries
            .into_iter()
            .map(BuilderEntry::into_payload)
            .collect::<Result<Vec<_>, Error>>()?;

        let header = Header::new(count)?;
        let mut offset = header.total_size()? as u64;

        let mut entries = Vec::with_capacity(count);
        for (name, data) in &payloads {
            let entry = Entry::new(name, data.len() as u64, offset)?;
            debug!("{}", entry);
            offset = entry.end()?;
            entries.push(entry);
        }

        let total = usize::try_from(offset).map_err(initrd_core::Error::from)?;
        let mut archive = Vec::with_capacity(total);
        archive.extend_from_slice(bytemuck::bytes_of(&header));
        archive.extend_from_slice(bytemuck::cast_slice(entries.as_slice()));
        for (_, data) in &payloads {
            archive.extend_from_slice(data);
        }
        debug_assert_eq!(archive.len(), total);

        Ok(archive)
    }

    /// Consume this `ArchiveBuilder`, writing the encoded archive to `writer`
    /// in a single `write_all`. Nothing is written if encoding fails.
    /// Returns the archive length.
    pub fn write_archive<W: Write>(self, writer: &mut W) -> Result<u64, Error> {
        let archive = self.encode()?;
        writer
            .write_all(&archive)
            .map_err(|source| Error::Write {
                path: None,
                context: "Failed to write archive",
                source,
            })?;
        Ok(archive.len() as u64)
    }

    /// Consume this `ArchiveBuilder` and replace `dest` with the encoded
    /// archive. The archive is written to a temporary file next to `dest`
    /// and renamed over it, so `dest` is never left partially written.
    /// Returns the archive length.
    pub fn write_to(self, dest: impl AsRef<Path>) -> Result<u64, Error> {
        let dest = dest.as_ref();
        let count = self.entries.len();

        let parent = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmpfile = NamedTempFile::new_in(parent)
            .map_err(wrap_write_err!(dest, "Failed to create temporary file for"))?;
        let written = self
            .write_archive(&mut tmpfile)
            .map_err(|err| err.path(dest))?;
        tmpfile
            .as_file()
            .set_permissions(Permissions::from_mode(0o644))
            .map_err(wrap_write_err!(dest, "Failed to set permissions of"))?;
        tmpfile
            .as_file()
            .sync_all()
            .map_err(wrap_write_err!(dest, "Failed to sync"))?;
        tmpfile
            .persist(dest)
            .map_err(|err| err.error)
            .map_err(wrap_write_err!(dest, "Failed to persist"))?;

        info!(
            "Wrote {} ({} files, {} bytes)",
            dest.display(),
            count,
            written
        );
        Ok(written)
    }
}

impl Default for ArchiveBuilder {
    fn default() -> ArchiveBuilder {
        ArchiveBuilder::new()
    }
}

impl fmt::Debug for ArchiveBuilder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ArchiveBuilder")
            .field("entries", &self.entries)
            .field("sort", &self.sort)
            .finish()
    }
}
