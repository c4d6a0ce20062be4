use crate::{
    CompiledPattern, ConfigurationError, Error, SearchRequest,
    filters::{ExcludeFilter, ExtensionFilter, SizeFilter, TimeFilter, TypeFilter},
    fs::DirEntry,
};
use chrono::{DateTime, Utc};
use std::{io, path::PathBuf};

/// Values read from the process once per invocation, so every worker sees the same ones.
#[derive(Clone, Debug)]
pub struct Snapshot {
    /// Reference instant for the time filters
    pub now: DateTime<Utc>,
    /// Working directory that relative roots are resolved against
    pub cwd: PathBuf,
}

impl Snapshot {
    /// Captures the clock and the working directory.
    ///
    /// # Errors
    /// Fails only if the working directory cannot be determined.
    pub fn capture() -> io::Result<Self> {
        Ok(Self {
            now: Utc::now(),
            cwd: std::env::current_dir()?,
        })
    }
}

#[derive(Clone, Debug)]
#[expect(clippy::struct_excessive_bools, reason = "Mirrors the request switches")]
/**
 The validated, compiled form of a [`SearchRequest`].

 Built once before any worker starts and shared read-only afterwards. It owns the
 compiled pattern and every filter, and implements the filter pipeline: an entry
 is accepted only if every configured predicate passes.
*/
pub struct SearchConfig {
    pub(crate) roots: Vec<PathBuf>,
    pub(crate) pattern: CompiledPattern,
    /// Match against the root-relative path rather than the file name
    pub(crate) full_path: bool,
    pub(crate) hidden: bool,
    pub(crate) respect_ignore: bool,
    pub(crate) follow_symlinks: bool,
    pub(crate) min_depth: usize,
    pub(crate) max_depth: Option<usize>,
    pub(crate) type_filter: Option<TypeFilter>,
    pub(crate) extension_filter: Option<ExtensionFilter>,
    pub(crate) exclude_filter: Option<ExcludeFilter>,
    pub(crate) size_filter: Option<SizeFilter>,
    pub(crate) time_filter: Option<TimeFilter>,
    pub(crate) threads: usize,
    pub(crate) collect_errors: bool,
    pub(crate) snapshot: Snapshot,
}

/// Rejects negative values, naming the field
fn non_negative(field: &'static str, value: Option<i64>) -> Result<Option<u64>, ConfigurationError> {
    value
        .map(|raw| u64::try_from(raw).map_err(|_| ConfigurationError::Negative { field, value: raw }))
        .transpose()
}

fn non_negative_depth(
    field: &'static str,
    value: Option<i64>,
) -> Result<Option<usize>, ConfigurationError> {
    value
        .map(|raw| usize::try_from(raw).map_err(|_| ConfigurationError::Negative { field, value: raw }))
        .transpose()
}

impl SearchConfig {
    /**
     Validates and compiles a request against a freshly captured [`Snapshot`].

     # Errors
     - [`Error::Configuration`] if any numeric bound is negative or `threads` is zero
     - [`Error::Search`] if the pattern or an exclude glob does not compile
    */
    pub fn new(request: &SearchRequest) -> Result<Self, Error> {
        let snapshot = Snapshot::capture().unwrap_or_else(|err| {
            tracing::debug!(error = %err, "working directory unavailable, resolving roots as given");
            Snapshot {
                now: Utc::now(),
                cwd: PathBuf::new(),
            }
        });
        Self::with_snapshot(request, snapshot)
    }

    /**
     Validates and compiles a request against an explicit snapshot.

     # Errors
     As for [`SearchConfig::new`].
    */
    pub fn with_snapshot(request: &SearchRequest, snapshot: Snapshot) -> Result<Self, Error> {
        // numeric bounds first, in declaration order, so the first bad field is reported
        let min_depth = non_negative_depth("min_depth", request.min_depth)?;
        let max_depth = non_negative_depth("max_depth", request.max_depth)?;
        let min_size = non_negative("min_size", request.min_size)?;
        let max_size = non_negative("max_size", request.max_size)?;
        let changed_within = non_negative("changed_within", request.changed_within)?;
        let changed_before = non_negative("changed_before", request.changed_before)?;

        let threads = match request.threads {
            Some(0) => return Err(ConfigurationError::ZeroThreads.into()),
            Some(count) => count,
            None => std::thread::available_parallelism().map_or(1, core::num::NonZeroUsize::get),
        };

        let pattern = CompiledPattern::compile(
            request.pattern.as_deref(),
            request.pattern_kind,
            request.case_sensitive,
            request.empty_pattern,
        )?;

        let exclude_filter = ExcludeFilter::new(&request.exclude, request.full_path)?;

        // unknown type tokens disable the filter instead of failing
        let type_filter = request.file_type.as_deref().and_then(TypeFilter::from_token);

        let as_secs = |secs: Option<u64>| secs.map(|value| i64::try_from(value).unwrap_or(i64::MAX));
        let time_filter = TimeFilter::new(snapshot.now, as_secs(changed_within), as_secs(changed_before));

        let config = Self {
            roots: request.roots(),
            pattern,
            full_path: request.full_path,
            hidden: request.hidden,
            respect_ignore: !request.no_ignore,
            follow_symlinks: request.follow,
            min_depth: min_depth.unwrap_or(0),
            max_depth,
            type_filter,
            extension_filter: request.extension.as_deref().map(ExtensionFilter::new),
            exclude_filter,
            size_filter: SizeFilter::new(min_size, max_size),
            time_filter,
            threads,
            collect_errors: request.collect_errors,
            snapshot,
        };

        tracing::debug!(
            roots = config.roots.len(),
            threads = config.threads,
            min_depth = config.min_depth,
            max_depth = ?config.max_depth,
            type_filter = ?config.type_filter,
            respect_ignore = config.respect_ignore,
            follow = config.follow_symlinks,
            "search configured"
        );

        Ok(config)
    }

    /// The roots to search, in the order given
    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// The invocation snapshot
    #[must_use]
    pub const fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// True when the depth bounds rule out every entry, so no I/O is needed.
    #[must_use]
    pub fn yields_nothing(&self) -> bool {
        self.max_depth
            .is_some_and(|max| max == 0 || self.min_depth > max)
    }

    /// Whether an entry at `depth` falls inside the reporting window
    #[inline]
    #[must_use]
    pub fn within_depth(&self, depth: usize) -> bool {
        depth >= self.min_depth && self.max_depth.is_none_or(|max| depth <= max)
    }

    /// Whether children of a directory at `depth` can still be reported
    #[inline]
    #[must_use]
    pub fn can_descend(&self, depth: usize) -> bool {
        self.max_depth.is_none_or(|max| depth < max)
    }

    /// Applies the type filter, if any
    #[inline]
    #[must_use]
    pub fn matches_type(&self, entry: &DirEntry) -> bool {
        self.type_filter
            .is_none_or(|filter| filter.accepts(entry.file_type()))
    }

    /// Applies the extension filter to the file name, if any
    #[inline]
    #[must_use]
    pub fn matches_extension(&self, entry: &DirEntry) -> bool {
        self.extension_filter
            .as_ref()
            .is_none_or(|filter| filter.matches(entry.file_name_bytes()))
    }

    /// Checks the file name, or the root-relative path in full-path mode, against the pattern
    #[inline]
    #[must_use]
    pub fn matches_path(&self, entry: &DirEntry) -> bool {
        let candidate = if self.full_path {
            entry.relative_bytes()
        } else {
            entry.file_name_bytes()
        };
        self.pattern.matches(candidate)
    }

    /**
     Applies the size window to regular files.
     Directories, symlinks and other kinds are never excluded by size.
    */
    #[inline]
    #[must_use]
    pub fn matches_size(&self, entry: &DirEntry) -> bool {
        let Some(filter) = self.size_filter else {
            return true;
        };

        if !entry.file_type().is_regular_file() {
            return true;
        }

        entry.size().is_some_and(|size| filter.is_within_size(size))
    }

    /// Applies the modification-time window; entries without a readable mtime fail it
    #[inline]
    #[must_use]
    pub fn matches_time(&self, entry: &DirEntry) -> bool {
        let Some(filter) = self.time_filter else {
            return true;
        };

        entry
            .modified()
            .is_some_and(|modified| filter.matches_time(modified))
    }

    /// The filter pipeline: all predicates must pass, cheapest first
    #[inline]
    #[must_use]
    pub fn accepts(&self, entry: &DirEntry) -> bool {
        self.matches_type(entry)
            && self.matches_extension(entry)
            && self.matches_path(entry)
            && self.matches_size(entry)
            && self.matches_time(entry)
    }
}
