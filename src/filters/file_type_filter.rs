use crate::fs::FileType;

/// Entry type filter, resolved once from the caller's type token
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "This list is exhaustive")]
pub enum TypeFilter {
    /// Regular file
    File,
    /// Directory
    Directory,
    /// Symbolic link (only ever reported when links are not followed)
    Symlink,
}

impl TypeFilter {
    /**
     Parses a type token into a `TypeFilter`

     # Supported tokens
     - `"f"`, `"file"` - Regular file
     - `"d"`, `"dir"`, `"directory"` - Directory
     - `"l"`, `"symlink"` - Symbolic link

     Anything else returns `None`, which callers treat as "no type filter".

     # Examples
     ```
     # use fdr_core::TypeFilter;
     assert_eq!(TypeFilter::from_token("d"), Some(TypeFilter::Directory));
     assert_eq!(TypeFilter::from_token("symlink"), Some(TypeFilter::Symlink));
     assert_eq!(TypeFilter::from_token("socket"), None);
     ```
    */
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "f" | "file" => Some(Self::File),
            "d" | "dir" | "directory" => Some(Self::Directory),
            "l" | "symlink" => Some(Self::Symlink),
            _ => None,
        }
    }

    /// Checks whether an entry of kind `file_type` passes
    #[inline]
    #[must_use]
    pub const fn accepts(self, file_type: FileType) -> bool {
        matches!(
            (self, file_type),
            (Self::File, FileType::RegularFile)
                | (Self::Directory, FileType::Directory)
                | (Self::Symlink, FileType::Symlink)
        )
    }
}
