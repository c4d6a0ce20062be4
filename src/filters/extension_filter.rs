/// Case-insensitive file extension filter.
///
/// The extension is compared against the end of the file name, after a `.`,
/// so `tar.gz` matches `backup.tar.gz`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtensionFilter {
    /// The extension bytes without the leading dot, never empty
    suffix: Option<Box<[u8]>>,
}

impl ExtensionFilter {
    /// Builds the filter. An empty extension matches nothing, since no file has one.
    #[must_use]
    pub fn new<S: AsRef<str>>(extension: S) -> Self {
        let ext = extension.as_ref().as_bytes();
        Self {
            suffix: (!ext.is_empty()).then(|| ext.into()),
        }
    }

    /// Checks the extension against a file name
    #[inline]
    #[must_use]
    pub fn matches(&self, file_name: &[u8]) -> bool {
        let Some(ext) = self.suffix.as_deref() else {
            return false;
        };

        // need at least one byte for the dot
        let Some(start) = file_name.len().checked_sub(ext.len() + 1) else {
            return false;
        };

        match file_name.get(start..) {
            Some([b'.', rest @ ..]) => rest.eq_ignore_ascii_case(ext),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_case_insensitively() {
        let filter = ExtensionFilter::new("txt");
        assert!(filter.matches(b"notes.txt"));
        assert!(filter.matches(b"NOTES.TXT"));
        assert!(filter.matches(b"archive.tar.Txt"));
        assert!(!filter.matches(b"notes.txt.bak"));
        assert!(!filter.matches(b"txt"));
        assert!(!filter.matches(b"notestxt"));
    }

    #[test]
    fn multi_part_extensions() {
        let filter = ExtensionFilter::new("tar.gz");
        assert!(filter.matches(b"backup.tar.gz"));
        assert!(!filter.matches(b"backup.gz"));
    }

    #[test]
    fn empty_extension_matches_nothing() {
        let filter = ExtensionFilter::new("");
        assert!(!filter.matches(b"Makefile"));
        assert!(!filter.matches(b"file."));
        assert!(!filter.matches(b"notes.txt"));
    }
}
