use std::path::PathBuf;

/// How the `pattern` string of a [`SearchRequest`] is interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "A pattern is either a regex or a glob")]
pub enum PatternKind {
    /// Regular expression syntax (the default)
    #[default]
    Regex,
    /// Shell glob syntax: `*`, `**`, `?`, `{a,b}` and `[...]`
    Glob,
}

/// What an empty-string pattern means.
///
/// An absent pattern (`None`) always matches everything; this only decides
/// the `Some("")` case.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "Two possible readings, both listed")]
pub enum EmptyPattern {
    /// `""` matches every entry (the default)
    #[default]
    MatchAll,
    /// `""` matches no entry
    MatchNothing,
}

/**
 Everything a single search invocation needs, as handed over by a binding layer.

 Numeric bounds are signed on purpose: the binding passes caller values through
 untouched and validation happens in one place, [`SearchConfig::new`](crate::SearchConfig::new),
 which rejects negatives with a [`ConfigurationError`](crate::ConfigurationError).

 ```
 use fdr_core::{PatternKind, SearchRequest};

 let request = SearchRequest {
     pattern: Some("*.rs".into()),
     pattern_kind: PatternKind::Glob,
     max_depth: Some(3),
     ..SearchRequest::default()
 };
 assert!(request.paths.is_empty()); // searched as ["."]
 ```
*/
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "independent switches with no relationship to each other"
)]
pub struct SearchRequest {
    /// Root paths to search; empty means `["."]`
    pub paths: Vec<PathBuf>,
    /// Name pattern; `None` matches everything
    pub pattern: Option<String>,
    /// Whether `pattern` is a regex or a glob
    pub pattern_kind: PatternKind,
    /// Meaning of `pattern == Some("")`
    pub empty_pattern: EmptyPattern,
    /// Case-sensitive matching; matching ignores ASCII case when false
    pub case_sensitive: bool,
    /// Match the pattern against the path relative to the root instead of the file name
    pub full_path: bool,
    /// Include entries whose name starts with `.`
    pub hidden: bool,
    /// Bypass `.gitignore`/`.ignore` rules and version-control directory pruning
    pub no_ignore: bool,
    /// Follow symbolic links
    pub follow: bool,
    /// Smallest reported depth (children of a root are depth 1)
    pub min_depth: Option<i64>,
    /// Largest reported depth
    pub max_depth: Option<i64>,
    /// Entry type token: `f`/`file`, `d`/`dir`/`directory`, `l`/`symlink`
    pub file_type: Option<String>,
    /// File extension, compared case-insensitively without the leading dot
    pub extension: Option<String>,
    /// Globs whose matches are pruned together with their subtree
    pub exclude: Vec<String>,
    /// Minimum size in bytes (regular files only)
    pub min_size: Option<i64>,
    /// Maximum size in bytes (regular files only)
    pub max_size: Option<i64>,
    /// Only entries modified at most this many seconds ago
    pub changed_within: Option<i64>,
    /// Only entries modified at least this many seconds ago
    pub changed_before: Option<i64>,
    /// Worker threads; defaults to the available parallelism
    pub threads: Option<usize>,
    /// Record per-entry failures in [`SearchResults::errors`](crate::SearchResults::errors)
    pub collect_errors: bool,
}

impl SearchRequest {
    /// A request for everything under `root`.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            paths: vec![root.into()],
            ..Self::default()
        }
    }

    /// The roots to walk, substituting `.` when none were given.
    #[must_use]
    pub fn roots(&self) -> Vec<PathBuf> {
        if self.paths.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            self.paths.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_paths_default_to_current_dir() {
        let request = SearchRequest::default();
        assert_eq!(request.roots(), vec![PathBuf::from(".")]);

        let explicit = SearchRequest::new("lib");
        assert_eq!(explicit.roots(), vec![PathBuf::from("lib")]);
    }

    #[test]
    fn defaults_match_binding_contract() {
        let request = SearchRequest::default();
        assert_eq!(request.pattern_kind, PatternKind::Regex);
        assert_eq!(request.empty_pattern, EmptyPattern::MatchAll);
        assert!(!request.case_sensitive);
        assert!(!request.hidden);
        assert!(!request.no_ignore);
        assert!(!request.follow);
        assert!(request.exclude.is_empty());
    }
}
