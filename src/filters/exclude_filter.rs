use crate::SearchError;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::{ffi::OsStr, path::Path};

/**
 Exclude globs, checked independently of the search pattern.

 A match prunes the entry and, for directories, everything below it.
 In file-name mode each glob is tested against the entry's name. In full-path mode
 it is tested against the root-relative path, and globs without a `/` may match at
 any depth, as if prefixed with `**` and a slash.
*/
#[derive(Clone, Debug)]
pub struct ExcludeFilter {
    set: GlobSet,
    full_path: bool,
}

impl ExcludeFilter {
    /**
     Compiles the exclude list, returning `None` when it is empty.

     # Errors
     Returns [`SearchError::InvalidExclude`] naming the first glob that fails to parse.
    */
    pub fn new<S: AsRef<str>>(patterns: &[S], full_path: bool) -> Result<Option<Self>, SearchError> {
        if patterns.is_empty() {
            return Ok(None);
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let raw = pattern.as_ref();
            let effective = if full_path && !raw.contains('/') {
                format!("**/{raw}")
            } else {
                raw.to_owned()
            };

            let glob = GlobBuilder::new(&effective)
                .literal_separator(true)
                .backslash_escape(true)
                .build()
                .map_err(|source| SearchError::InvalidExclude {
                    pattern: raw.to_owned(),
                    source,
                })?;
            builder.add(glob);
        }

        let set = builder
            .build()
            .map_err(|source| SearchError::InvalidExclude {
                pattern: patterns
                    .iter()
                    .map(AsRef::as_ref)
                    .collect::<Vec<_>>()
                    .join(","),
                source,
            })?;

        Ok(Some(Self { set, full_path }))
    }

    /// Checks an entry by name and root-relative path
    #[inline]
    #[must_use]
    pub fn is_excluded(&self, file_name: &OsStr, relative: &Path) -> bool {
        if self.full_path {
            self.set.is_match(relative)
        } else {
            self.set.is_match(file_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exclude(patterns: &[&str], full_path: bool) -> ExcludeFilter {
        ExcludeFilter::new(patterns, full_path)
            .expect("patterns should compile")
            .expect("non-empty list")
    }

    #[test]
    fn empty_list_is_no_filter() {
        let none: &[&str] = &[];
        assert!(ExcludeFilter::new(none, false).unwrap().is_none());
    }

    #[test]
    fn matches_names() {
        let filter = exclude(&["node_modules", "*.log"], false);
        assert!(filter.is_excluded(OsStr::new("node_modules"), Path::new("a/node_modules")));
        assert!(filter.is_excluded(OsStr::new("debug.log"), Path::new("debug.log")));
        assert!(!filter.is_excluded(OsStr::new("main.rs"), Path::new("src/main.rs")));
    }

    #[test]
    fn full_path_mode_matches_at_any_depth() {
        let filter = exclude(&["target", "src/gen/*"], true);
        assert!(filter.is_excluded(OsStr::new("target"), Path::new("target")));
        assert!(filter.is_excluded(OsStr::new("target"), Path::new("crates/a/target")));
        assert!(filter.is_excluded(OsStr::new("out.rs"), Path::new("src/gen/out.rs")));
        assert!(!filter.is_excluded(OsStr::new("lib.rs"), Path::new("src/lib.rs")));
    }

    #[test]
    fn bad_glob_names_the_pattern() {
        let err = ExcludeFilter::new(&["ok", "[broken"], false).unwrap_err();
        assert!(err.to_string().contains("[broken"));
        assert!(err.to_string().starts_with("Search failed"));
    }
}
