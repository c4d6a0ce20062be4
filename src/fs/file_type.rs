use std::fs::{self, Metadata};

/// Represents the kind of a filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[expect(clippy::exhaustive_enums, reason = "Anything exotic is folded into Other")]
pub enum FileType {
    /// A regular file
    RegularFile,
    /// A directory
    Directory,
    /// A symbolic link that was not resolved
    Symlink,
    /// Sockets, FIFOs, devices and anything else the OS reports
    Other,
}

impl FileType {
    /// Classifies the type reported by a directory read or a stat call
    #[inline]
    #[must_use]
    pub fn from_std(file_type: fs::FileType) -> Self {
        if file_type.is_file() {
            Self::RegularFile
        } else if file_type.is_dir() {
            Self::Directory
        } else if file_type.is_symlink() {
            Self::Symlink
        } else {
            Self::Other
        }
    }

    /// Classifies from stat output
    #[inline]
    #[must_use]
    pub fn from_metadata(metadata: &Metadata) -> Self {
        Self::from_std(metadata.file_type())
    }

    /// Returns true for directories
    #[inline]
    #[must_use]
    pub const fn is_dir(self) -> bool {
        matches!(self, Self::Directory)
    }

    /// Returns true for regular files
    #[inline]
    #[must_use]
    pub const fn is_regular_file(self) -> bool {
        matches!(self, Self::RegularFile)
    }

    /// Returns true for unresolved symlinks
    #[inline]
    #[must_use]
    pub const fn is_symlink(self) -> bool {
        matches!(self, Self::Symlink)
    }
}
