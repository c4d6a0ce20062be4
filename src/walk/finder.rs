use crate::{
    DirEntryError, Error, SearchConfig, SearchRequest, TraversalError,
    collector::{ResultCollector, SearchResults},
    fs::{DirEntry, FileType, is_hidden_name},
    util::{IgnoreResolver, IgnoreStack},
    walk::{
        finder_builder::FinderBuilder,
        types::{DirTask, RootContext},
    },
};
use crossbeam_channel::{Receiver, Sender, bounded};
use dashmap::DashSet;
use std::{
    ffi::OsString,
    fs::{self, Metadata},
    mem,
    os::unix::fs::MetadataExt as _,
    path::{Component, Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    thread::{self, JoinHandle},
    vec,
};
use thread_local::ThreadLocal;

/// Batches buffered between the workers and the consumer before workers block
const CHANNEL_CAPACITY: usize = 1024;

/**
 The search engine: a validated configuration plus the state shared by its workers.

 `Finder` walks every root on a rayon thread pool. Each directory is one task: it is
 listed, its children are filtered, subdirectories are spawned as new tasks and the
 accepted entries are sent to the consumer in one batch per directory.

 # Examples
 ```no_run
 use fdr_core::Finder;

 let results = Finder::init("src").pattern("*.rs").glob(true).build()?.run();
 for path in results.paths() {
     println!("{}", path.display());
 }
 # Ok::<(), fdr_core::Error>(())
 ```
*/
#[derive(Debug)]
pub struct Finder {
    pub(crate) config: SearchConfig,
    /// Ignore files parsed so far, shared by all workers
    pub(crate) ignore: IgnoreResolver,
    /// Per-worker error logs, only present when errors are collected
    pub(crate) errors: Option<ThreadLocal<Mutex<Vec<TraversalError>>>>,
    /// Set once the consumer dropped the receiving end
    pub(crate) hung_up: AtomicBool,
}

impl Finder {
    /// Starts building a search rooted at `root`.
    #[must_use]
    #[inline]
    pub fn init<P: Into<PathBuf>>(root: P) -> FinderBuilder {
        FinderBuilder::new(root)
    }

    /**
     Validates and compiles a request.

     # Errors
     Returns [`Error::Configuration`] for negative bounds or zero threads and
     [`Error::Search`] for patterns that do not compile.
    */
    pub fn new(request: &SearchRequest) -> Result<Self, Error> {
        SearchConfig::new(request).map(Self::from_config)
    }

    /// Wraps an already validated configuration.
    #[must_use]
    pub fn from_config(config: SearchConfig) -> Self {
        let errors = config.collect_errors.then(ThreadLocal::new);
        Self {
            config,
            ignore: IgnoreResolver::new(),
            errors,
            hung_up: AtomicBool::new(false),
        }
    }

    /// The configuration this finder runs with
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &SearchConfig {
        &self.config
    }

    /**
     Runs the search to completion on the calling thread's behalf.

     Paths are presented in the form of the root they were found under and
     de-duplicated across roots. Their order is unspecified.
    */
    #[must_use]
    pub fn run(self) -> SearchResults {
        if self.config.yields_nothing() {
            tracing::debug!("depth bounds exclude every entry, skipping traversal");
            return SearchResults::default();
        }

        let (sender, receiver) = bounded(CHANNEL_CAPACITY);
        let finder = &self;
        let paths = thread::scope(|scope| {
            // the sender moves into the producer, so the channel closes when the walk ends
            scope.spawn(move || finder.drive(&sender));

            let mut collector = ResultCollector::new(self.config.roots());
            for batch in &receiver {
                collector.extend(batch);
            }
            collector.finish()
        });

        let errors = self.take_errors();
        tracing::debug!(
            results = paths.len(),
            errors = errors.len(),
            cached_ignore_dirs = self.ignore.cached_dirs(),
            "search finished"
        );
        SearchResults::new(paths, errors)
    }

    /**
     Starts the search in the background and returns the entries as they are found.

     Entries arrive in per-directory batches, in no particular order, and are not
     de-duplicated across roots. Dropping the iterator early stops the walk at the
     next batch boundary.
    */
    #[must_use]
    pub fn traverse(self) -> Traversal {
        let finder = Arc::new(self);
        let (sender, receiver) = bounded(CHANNEL_CAPACITY);

        let handle = (!finder.config.yields_nothing()).then(|| {
            let worker = Arc::clone(&finder);
            thread::spawn(move || worker.drive(&sender))
        });

        Traversal {
            finder,
            receiver,
            current: Vec::new().into_iter(),
            handle,
        }
    }

    /// Walks every valid root, sending batches until every spawned task has finished.
    fn drive(&self, sender: &Sender<Vec<DirEntry>>) {
        let seeds: Vec<DirTask> = self
            .config
            .roots()
            .iter()
            .enumerate()
            .filter_map(|(index, root)| self.seed(index, root))
            .collect();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.threads)
            .thread_name(|index| format!("fdr-walker-{index}"))
            .build();

        // the scope returns once the last directory task is done
        match pool {
            Ok(pool) => pool.scope(|scope| self.spawn_all(seeds, scope, sender)),
            Err(err) => {
                tracing::debug!(error = %err, "could not build walker pool, using the global pool");
                rayon::scope(|scope| self.spawn_all(seeds, scope, sender));
            }
        }
    }

    fn spawn_all<'scope>(
        &'scope self,
        tasks: Vec<DirTask>,
        scope: &rayon::Scope<'scope>,
        sender: &'scope Sender<Vec<DirEntry>>,
    ) {
        for task in tasks {
            scope.spawn(move |scope| self.process_directory(task, scope, sender));
        }
    }

    /// Builds the first task for a root, or records why the root cannot be walked
    fn seed(&self, index: usize, root: &Path) -> Option<DirTask> {
        let path = absolute_root(&self.config.snapshot.cwd, root);

        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(err) => {
                self.record(root, err);
                return None;
            }
        };

        if !metadata.is_dir() {
            self.record(root, DirEntryError::NotADirectory);
            return None;
        }

        let canonical = fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
        let visited = self.config.follow_symlinks.then(|| {
            let visited = DashSet::new();
            visited.insert((metadata.dev(), metadata.ino()));
            visited
        });

        tracing::debug!(root = %root.display(), canonical = %canonical.display(), "walking root");

        Some(DirTask {
            path,
            relative: PathBuf::new(),
            canonical,
            depth: 0,
            ignore: IgnoreStack::empty(),
            root: Arc::new(RootContext { index, visited }),
        })
    }

    /**
     Lists one directory.

     Children that survive the pruning rules are spawned as tasks (directories) and/or
     batched for the consumer (entries that pass the filter pipeline).
    */
    fn process_directory<'scope>(
        &'scope self,
        task: DirTask,
        scope: &rayon::Scope<'scope>,
        sender: &'scope Sender<Vec<DirEntry>>,
    ) {
        // nobody is listening, let the remaining tasks drain without I/O
        if self.hung_up.load(Ordering::Relaxed) {
            return;
        }

        let stack = if self.config.respect_ignore {
            self.ignore
                .push_directory(&task.ignore, &task.relative, &task.canonical)
        } else {
            task.ignore.clone()
        };

        let read_dir = match fs::read_dir(&task.path) {
            Ok(read_dir) => read_dir,
            Err(err) => {
                self.record(&task.path, err);
                return;
            }
        };

        let depth = task.depth + 1;
        let mut batch = Vec::new();
        let mut subdirs = Vec::new();

        for child in read_dir {
            match child {
                Ok(child) => subdirs.extend(self.visit_child(
                    &task,
                    &stack,
                    child.file_name(),
                    child.file_type(),
                    depth,
                    &mut batch,
                )),
                Err(err) => self.record(&task.path, err),
            }
        }

        self.spawn_all(subdirs, scope, sender);

        // one send per directory keeps channel traffic low
        if !batch.is_empty() && sender.send(batch).is_err() {
            tracing::debug!("result receiver dropped, stopping traversal");
            self.hung_up.store(true, Ordering::Relaxed);
        }
    }

    /// Filters one child into `batch`, returning the task for a directory to enter
    fn visit_child(
        &self,
        task: &DirTask,
        stack: &IgnoreStack,
        name: OsString,
        raw_type: std::io::Result<fs::FileType>,
        depth: usize,
        batch: &mut Vec<DirEntry>,
    ) -> Option<DirTask> {
        // hidden entries go before any rule or stat work
        if !self.config.hidden && is_hidden_name(&name) {
            return None;
        }

        let path = task.path.join(&name);
        let raw_type = match raw_type {
            Ok(file_type) => FileType::from_std(file_type),
            Err(err) => {
                self.record(&path, err);
                return None;
            }
        };

        let (file_type, metadata) = self.resolve(&path, raw_type)?;

        let relative = task.relative.join(&name);
        let is_dir = file_type.is_dir();

        if self.config.respect_ignore && self.ignore.is_excluded(&name, &relative, is_dir, stack) {
            return None;
        }

        if let Some(exclude) = &self.config.exclude_filter
            && exclude.is_excluded(&name, &relative)
        {
            tracing::trace!(path = %relative.display(), "pruned by exclude pattern");
            return None;
        }

        // a directory seen before is still an entry, it is just not entered twice
        let revisited = is_dir
            && match (&task.root.visited, &metadata) {
                (Some(visited), Some(metadata)) => !visited.insert((metadata.dev(), metadata.ino())),
                _ => false,
            };
        if revisited {
            tracing::trace!(path = %relative.display(), "directory already visited, not descending");
        }

        let canonical = if raw_type.is_symlink() && is_dir {
            fs::canonicalize(&path).unwrap_or_else(|_| task.canonical.join(&name))
        } else {
            task.canonical.join(&name)
        };

        let mut entry = DirEntry::new(path, relative, canonical, file_type, depth, task.root.index);
        if let Some(metadata) = metadata {
            entry = entry.with_metadata(metadata);
        }

        let subdir = (is_dir && !revisited && self.config.can_descend(depth)).then(|| DirTask {
            path: entry.path.clone(),
            relative: entry.relative.clone(),
            canonical: entry.canonical.clone(),
            depth,
            ignore: stack.clone(),
            root: Arc::clone(&task.root),
        });

        if self.config.within_depth(depth) && self.config.accepts(&entry) {
            batch.push(entry);
        }
        subdir
    }

    /**
     Settles the kind of a child when links are followed.

     Symlinks report their target's kind; directories are stat-ed so their identity
     can be checked against the visited set. `None` drops the child: a link whose
     target is gone is skipped without an error.
    */
    fn resolve(&self, path: &Path, raw_type: FileType) -> Option<(FileType, Option<Metadata>)> {
        if !self.config.follow_symlinks || !(raw_type.is_symlink() || raw_type.is_dir()) {
            return Some((raw_type, None));
        }

        match fs::metadata(path) {
            Ok(metadata) => Some((FileType::from_metadata(&metadata), Some(metadata))),
            Err(err) if raw_type.is_symlink() => {
                tracing::trace!(path = %path.display(), error = %err, "skipping broken symlink");
                None
            }
            Err(err) => {
                self.record(path, err);
                None
            }
        }
    }

    /// Logs a traversal failure and keeps it when errors are collected
    fn record<E: Into<DirEntryError>>(&self, path: &Path, error: E) {
        let error = error.into();
        tracing::debug!(path = %path.display(), error = %error, "skipping unreadable entry");

        if let Some(errors) = &self.errors
            && let Ok(mut log) = errors.get_or_default().lock()
        {
            log.push(TraversalError::new(path, error));
        }
    }

    /// Drains every worker's error log
    fn take_errors(&self) -> Vec<TraversalError> {
        self.errors.as_ref().map_or_else(Vec::new, |errors| {
            errors
                .iter()
                .filter_map(|log| log.lock().ok().map(|mut log| mem::take(&mut *log)))
                .flatten()
                .collect()
        })
    }
}

/// Joins a root onto the working directory, dropping `.` components
fn absolute_root(cwd: &Path, root: &Path) -> PathBuf {
    let cleaned: PathBuf = root
        .components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect();
    cwd.join(cleaned)
}

/**
 A running background search, yielding entries as workers find them.

 Created by [`Finder::traverse`]. Once exhausted, [`Traversal::errors`] returns what
 went wrong along the way (when error collection was enabled).
*/
#[derive(Debug)]
pub struct Traversal {
    finder: Arc<Finder>,
    receiver: Receiver<Vec<DirEntry>>,
    current: vec::IntoIter<DirEntry>,
    handle: Option<JoinHandle<()>>,
}

impl Traversal {
    /**
     Waits for the walk to end and returns the recorded traversal errors.

     Entries not yet consumed are discarded.
    */
    #[must_use]
    pub fn errors(mut self) -> Vec<TraversalError> {
        // hang up first so blocked workers can finish
        drop(mem::replace(&mut self.receiver, crossbeam_channel::never()));
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::debug!("traversal thread panicked");
        }
        self.finder.take_errors()
    }
}

impl Iterator for Traversal {
    type Item = DirEntry;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.current.next() {
                return Some(entry);
            }
            self.current = self.receiver.recv().ok()?.into_iter();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn tree(files: usize) -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        for index in 0..files {
            let dir = tmp.path().join(format!("d{}", index % 7));
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join(format!("f{index}.txt")), "").unwrap();
        }
        tmp
    }

    #[test]
    fn absolute_root_drops_current_dir_components() {
        let cwd = Path::new("/work");
        assert_eq!(absolute_root(cwd, Path::new(".")), PathBuf::from("/work"));
        assert_eq!(absolute_root(cwd, Path::new("./lib")), PathBuf::from("/work/lib"));
        assert_eq!(absolute_root(cwd, Path::new("/srv")), PathBuf::from("/srv"));
    }

    #[test]
    fn traversal_reports_errors_after_the_walk() {
        let tmp = tree(3);
        let missing = tmp.path().join("missing");
        let traversal = Finder::init(tmp.path())
            .add_root(&missing)
            .collect_errors(true)
            .build()
            .unwrap()
            .traverse();
        let errors = traversal.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, missing);
    }

    #[test]
    fn dropping_the_stream_early_finishes() {
        let tmp = tree(200);
        let mut traversal = Finder::init(tmp.path()).thread_count(2).build().unwrap().traverse();
        assert!(traversal.next().is_some());
        // joins the producer, which must notice the hang-up
        assert!(traversal.errors().is_empty());
    }

    #[test]
    fn zero_depth_never_spawns_a_walk() {
        let tmp = tree(5);
        let finder = Finder::init(tmp.path()).max_depth(0).build().unwrap();
        assert!(finder.traverse().next().is_none());
    }

    #[test]
    fn single_thread_pool_walks_everything() {
        let tmp = tree(40);
        let results = Finder::init(tmp.path()).thread_count(1).build().unwrap().run();
        // 7 directories plus 40 files
        assert_eq!(results.len(), 47);
    }

    #[test]
    fn several_roots_share_one_pool() {
        let first = tree(10);
        let second = tree(4);
        let results = Finder::init(first.path())
            .add_root(second.path())
            .thread_count(3)
            .build()
            .unwrap()
            .run();
        assert_eq!(results.len(), (7 + 10) + (4 + 4));
    }

    #[test]
    fn errors_are_empty_unless_collected() {
        let results = Finder::init("/definitely/not/here").build().unwrap().run();
        assert!(results.is_empty());
        assert!(results.errors().is_empty());
    }
}
