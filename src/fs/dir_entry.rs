use crate::{DirEntryError, fs::FileType};
use chrono::{DateTime, Utc};
use std::{
    ffi::OsStr,
    fs::{self, Metadata},
    os::unix::ffi::OsStrExt as _,
    path::{Path, PathBuf},
    sync::OnceLock,
};

/**
 A single filesystem node met during traversal.

 Created by the walker for every child it reads, consumed by the filter pipeline and
 then either dropped or sent to the collector. Stat data is fetched lazily, and at most
 once, the first time a size or time filter asks for it.
*/
#[derive(Debug)]
pub struct DirEntry {
    /// Absolute path as walked (working directory joined with root and relative path)
    pub(crate) path: PathBuf,
    /// Path relative to the search root
    pub(crate) relative: PathBuf,
    /// Physical location: canonical root joined with the relative path,
    /// re-canonicalised whenever a followed symlink changes directory
    pub(crate) canonical: PathBuf,
    pub(crate) file_type: FileType,
    /// Distance from the root, whose children are depth 1
    pub(crate) depth: usize,
    /// Index of the root argument this entry was found under
    pub(crate) root_index: usize,
    pub(crate) metadata: OnceLock<Metadata>,
}

impl DirEntry {
    #[must_use]
    pub(crate) const fn new(
        path: PathBuf,
        relative: PathBuf,
        canonical: PathBuf,
        file_type: FileType,
        depth: usize,
        root_index: usize,
    ) -> Self {
        Self {
            path,
            relative,
            canonical,
            file_type,
            depth,
            root_index,
            metadata: OnceLock::new(),
        }
    }

    /// Attaches stat output that was already fetched (e.g. when resolving a symlink)
    #[must_use]
    pub(crate) fn with_metadata(self, metadata: Metadata) -> Self {
        let _ = self.metadata.set(metadata);
        self
    }

    /// Absolute path of the entry as walked
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path relative to the search root it was found under
    #[inline]
    #[must_use]
    pub fn relative_path(&self) -> &Path {
        &self.relative
    }

    /// Physical path used to de-duplicate results across roots
    #[inline]
    #[must_use]
    pub fn canonical_path(&self) -> &Path {
        &self.canonical
    }

    /// The entry kind; a followed symlink reports its target's kind
    #[inline]
    #[must_use]
    pub const fn file_type(&self) -> FileType {
        self.file_type
    }

    /// Depth below the root
    #[inline]
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Index into the request's root list
    #[inline]
    #[must_use]
    pub const fn root_index(&self) -> usize {
        self.root_index
    }

    /// The final path component
    #[inline]
    #[must_use]
    pub fn file_name(&self) -> &OsStr {
        self.relative.file_name().unwrap_or_default()
    }

    /// The final path component as raw bytes
    #[inline]
    #[must_use]
    pub fn file_name_bytes(&self) -> &[u8] {
        self.file_name().as_bytes()
    }

    /// The root-relative path as raw bytes
    #[inline]
    #[must_use]
    pub fn relative_bytes(&self) -> &[u8] {
        self.relative.as_os_str().as_bytes()
    }

    /// Returns true if the file name starts with a dot
    #[inline]
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        is_hidden_name(self.file_name())
    }

    /// Returns true for directories (including followed links to directories)
    #[inline]
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        self.file_type.is_dir()
    }

    /**
     Stat data for the entry, fetched on first use.

     Links that were followed carry their target's stat; everything else is
     `lstat`-ed so an unresolved link reports on itself.

     # Errors
     Returns a [`DirEntryError`] when the entry vanished or cannot be stat-ed.
    */
    pub fn metadata(&self) -> Result<&Metadata, DirEntryError> {
        if let Some(metadata) = self.metadata.get() {
            return Ok(metadata);
        }

        let fetched = fs::symlink_metadata(&self.path)?;
        Ok(self.metadata.get_or_init(|| fetched))
    }

    /// Size in bytes, for regular files only
    #[must_use]
    pub fn size(&self) -> Option<u64> {
        if self.file_type.is_regular_file() {
            self.metadata().ok().map(Metadata::len)
        } else {
            None
        }
    }

    /// Last modification time, if the platform reports one
    #[must_use]
    pub fn modified(&self) -> Option<DateTime<Utc>> {
        self.metadata()
            .ok()
            .and_then(|metadata| metadata.modified().ok())
            .map(DateTime::<Utc>::from)
    }
}

/// Returns true if the name carries the hidden-file marker
#[inline]
#[must_use]
pub(crate) fn is_hidden_name(name: &OsStr) -> bool {
    name.as_bytes().first() == Some(&b'.')
}
