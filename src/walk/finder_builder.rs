use crate::{EmptyPattern, Error, PatternKind, SearchRequest, walk::finder::Finder};
use std::path::PathBuf;

/// Saturates Rust-side counts into the request's signed fields
fn to_bound<T: TryInto<i64>>(value: T) -> i64 {
    value.try_into().unwrap_or(i64::MAX)
}

/**
 A builder for creating a [`Finder`] with customisable options.

 Every setter maps onto one [`SearchRequest`] field, so the builder and a request
 built by hand behave identically. Unsigned arguments make negative bounds
 unrepresentable here; they can only reach validation through a raw request.
*/
#[derive(Clone, Debug)]
pub struct FinderBuilder {
    pub(crate) request: SearchRequest,
}

impl FinderBuilder {
    /**
      Creates a builder searching `root` with default options.

      # Arguments
      `root` - The first directory to search
    */
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            request: SearchRequest::new(root),
        }
    }

    /// Starts from an existing request
    #[must_use]
    pub const fn from_request(request: SearchRequest) -> Self {
        Self { request }
    }

    /// Adds another root; results are de-duplicated across roots
    #[must_use]
    pub fn add_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.request.paths.push(root.into());
        self
    }

    /// Set the search pattern (regex unless [`glob`](Self::glob) is set)
    #[must_use]
    pub fn pattern<P: AsRef<str>>(mut self, pattern: P) -> Self {
        self.request.pattern = Some(pattern.as_ref().into());
        self
    }

    /// Interpret the pattern as a glob rather than a regex, defaults to false
    #[must_use]
    pub const fn glob(mut self, use_glob: bool) -> Self {
        self.request.pattern_kind = if use_glob {
            PatternKind::Glob
        } else {
            PatternKind::Regex
        };
        self
    }

    /// Decide what an empty pattern matches, defaults to everything
    #[must_use]
    pub const fn empty_pattern(mut self, empty: EmptyPattern) -> Self {
        self.request.empty_pattern = empty;
        self
    }

    /// Set case-sensitive matching, defaults to false
    #[must_use]
    pub const fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.request.case_sensitive = case_sensitive;
        self
    }

    /// Match against the root-relative path instead of the file name, defaults to false
    #[must_use]
    pub const fn full_path(mut self, full_path: bool) -> Self {
        self.request.full_path = full_path;
        self
    }

    /// Include hidden entries, defaults to false
    #[must_use]
    pub const fn hidden(mut self, hidden: bool) -> Self {
        self.request.hidden = hidden;
        self
    }

    /// Ignore `.gitignore`/`.ignore` files and walk VCS directories, defaults to false
    #[must_use]
    pub const fn no_ignore(mut self, no_ignore: bool) -> Self {
        self.request.no_ignore = no_ignore;
        self
    }

    /// Set whether to follow symlinks, defaults to false
    #[must_use]
    pub const fn follow_symlinks(mut self, follow: bool) -> Self {
        self.request.follow = follow;
        self
    }

    /// Smallest depth reported, the root's children being depth 1
    #[must_use]
    pub fn min_depth(mut self, depth: usize) -> Self {
        self.request.min_depth = Some(to_bound(depth));
        self
    }

    /// Largest depth reported; deeper directories are not read at all
    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.request.max_depth = Some(to_bound(depth));
        self
    }

    /// Restrict to one entry type (`f`, `d`, `l` or their long forms)
    #[must_use]
    pub fn file_type<T: AsRef<str>>(mut self, token: T) -> Self {
        self.request.file_type = Some(token.as_ref().into());
        self
    }

    /// Set extension to match, without the leading dot
    #[must_use]
    pub fn extension<E: AsRef<str>>(mut self, extension: E) -> Self {
        self.request.extension = Some(extension.as_ref().into());
        self
    }

    /// Prune everything matching `glob`, subtree included. May be called repeatedly
    #[must_use]
    pub fn exclude<G: AsRef<str>>(mut self, glob: G) -> Self {
        self.request.exclude.push(glob.as_ref().into());
        self
    }

    /// Minimum size in bytes for regular files
    #[must_use]
    pub fn min_size(mut self, bytes: u64) -> Self {
        self.request.min_size = Some(to_bound(bytes));
        self
    }

    /// Maximum size in bytes for regular files
    #[must_use]
    pub fn max_size(mut self, bytes: u64) -> Self {
        self.request.max_size = Some(to_bound(bytes));
        self
    }

    /// Only entries modified within the last `seconds`
    #[must_use]
    pub fn changed_within(mut self, seconds: u64) -> Self {
        self.request.changed_within = Some(to_bound(seconds));
        self
    }

    /// Only entries modified at least `seconds` ago
    #[must_use]
    pub fn changed_before(mut self, seconds: u64) -> Self {
        self.request.changed_before = Some(to_bound(seconds));
        self
    }

    /// Set the number of worker threads, defaults to the available parallelism
    #[must_use]
    pub const fn thread_count(mut self, threads: usize) -> Self {
        self.request.threads = Some(threads);
        self
    }

    /// Keep per-entry failures for [`SearchResults::errors`](crate::SearchResults::errors), defaults to false
    #[must_use]
    pub const fn collect_errors(mut self, collect_errors: bool) -> Self {
        self.request.collect_errors = collect_errors;
        self
    }

    /// The request assembled so far
    #[must_use]
    pub const fn request(&self) -> &SearchRequest {
        &self.request
    }

    /**
     Validates the options and compiles the pattern.

     # Errors
     Returns [`Error::Configuration`] when zero threads were requested and
     [`Error::Search`] when the pattern or an exclude glob does not compile.
    */
    pub fn build(self) -> Result<Finder, Error> {
        Finder::new(&self.request)
    }
}

impl From<SearchRequest> for FinderBuilder {
    fn from(request: SearchRequest) -> Self {
        Self::from_request(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setters_fill_the_request() {
        let builder = Finder::init("src")
            .add_root("tests")
            .pattern("*.rs")
            .glob(true)
            .case_sensitive(true)
            .max_depth(4)
            .min_size(10)
            .exclude("target")
            .exclude("*.tmp")
            .thread_count(2);

        let request = builder.request();
        assert_eq!(request.paths, vec![PathBuf::from("src"), PathBuf::from("tests")]);
        assert_eq!(request.pattern.as_deref(), Some("*.rs"));
        assert_eq!(request.pattern_kind, PatternKind::Glob);
        assert!(request.case_sensitive);
        assert_eq!(request.max_depth, Some(4));
        assert_eq!(request.min_size, Some(10));
        assert_eq!(request.exclude, vec!["target".to_owned(), "*.tmp".to_owned()]);
        assert_eq!(request.threads, Some(2));
    }

    #[test]
    fn oversized_bounds_saturate() {
        let builder = Finder::init(".").min_size(u64::MAX).max_depth(usize::MAX);
        assert_eq!(builder.request().min_size, Some(i64::MAX));
        assert_eq!(builder.request().max_depth, Some(i64::MAX));
    }

    #[test]
    fn build_rejects_bad_patterns_and_zero_threads() {
        assert!(Finder::init(".").pattern("(").build().unwrap_err().is_search());
        assert!(Finder::init(".").thread_count(0).build().unwrap_err().is_configuration());
    }
}
