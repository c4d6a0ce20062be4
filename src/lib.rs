/*!
 An embeddable, multi-threaded filesystem search engine.

 Given one or more roots and a set of criteria (a regex or glob name pattern, entry
 type, extension, size, modification time, depth window, exclude globs), the engine
 walks the directory trees on a work-stealing thread pool and returns every matching
 path. `.gitignore`/`.ignore` files and version-control directories are honoured by
 default, hidden entries are skipped unless asked for, and symlinks are followed only
 on request (with cycle detection).

 The simplest entry point is [`search`]:

 ```no_run
 use fdr_core::{PatternKind, SearchRequest, search};

 let request = SearchRequest {
     paths: vec!["src".into()],
     pattern: Some("*.rs".into()),
     pattern_kind: PatternKind::Glob,
     ..SearchRequest::default()
 };
 for path in search(&request)? {
     println!("{path}");
 }
 # Ok::<(), fdr_core::Error>(())
 ```

 [`Finder`] exposes the same engine with a builder, streaming iteration
 ([`Finder::traverse`]) and per-entry error reporting.
*/

#[cfg(all(
    feature = "mimalloc",
    any(target_os = "linux", target_os = "macos", target_os = "android")
))]
#[global_allocator]
static ALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;

mod collector;
mod config;
mod error;
mod filters;
mod fs;
mod pattern;
mod request;
mod util;
mod walk;

pub use collector::{ResultCollector, SearchResults};
pub use config::{SearchConfig, Snapshot};
pub use error::{
    ConfigurationError, DirEntryError, Error, Result, SearchError, TraversalError,
};
pub use filters::{ExcludeFilter, ExtensionFilter, SizeFilter, TimeFilter, TypeFilter};
pub use fs::{DirEntry, FileType};
pub use pattern::{CompiledPattern, glob_to_regex};
pub use request::{EmptyPattern, PatternKind, SearchRequest};
pub use util::{IgnoreResolver, IgnoreStack, RULE_FILES, VCS_DIRS, is_vcs_dir};
pub use walk::{Finder, FinderBuilder, Traversal};

/**
 Runs one search to completion and returns the matching paths.

 Each path keeps the form of the root it was found under (`lib/x`, `./x`, or absolute
 for absolute roots). Paths reached from several roots are reported once. The order
 is unspecified. Names that are not valid UTF-8 are converted lossily.

 # Errors
 - [`Error::Configuration`] for a negative depth, size or time bound, or zero threads
 - [`Error::Search`] for a pattern or exclude glob that does not compile

 Unreadable directories, vanished entries and broken links never fail the search.
*/
pub fn search(request: &SearchRequest) -> Result<Vec<String>> {
    Ok(Finder::new(request)?.run().into_strings())
}
