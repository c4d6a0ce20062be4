use ::ignore::{
    Match,
    gitignore::{Gitignore, GitignoreBuilder},
};
use dashmap::DashMap;
use std::{
    ffi::OsStr,
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

/// Rule files read in every directory, in increasing precedence.
pub const RULE_FILES: [&str; 2] = [".gitignore", ".ignore"];

/// Version-control metadata directories, pruned whenever ignore rules are respected.
pub const VCS_DIRS: [&str; 7] = [".git", ".hg", ".svn", ".bzr", "_darcs", ".jj", ".pijul"];

/**
 Parsed rule files, shared by every worker of one search.

 Each directory's rule files are parsed at most once and cached by canonical
 directory path, so a directory reached from two roots (or through a followed link)
 reuses the same parsed set. Directories without rules cache `None`.
*/
#[derive(Debug, Default)]
pub struct IgnoreResolver {
    cache: DashMap<PathBuf, Option<Arc<Gitignore>>>,
}

impl IgnoreResolver {
    /// Creates an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of directories whose rules have been looked up
    #[must_use]
    pub fn cached_dirs(&self) -> usize {
        self.cache.len()
    }

    /// Returns the rules owned by `canonical_dir`, parsing them on first request.
    pub fn rules_for(&self, canonical_dir: &Path) -> Option<Arc<Gitignore>> {
        if let Some(hit) = self.cache.get(canonical_dir) {
            return hit.value().clone();
        }

        // parse outside the shard lock, the first insert wins
        let parsed = load_rules(canonical_dir).map(Arc::new);
        self.cache
            .entry(canonical_dir.to_path_buf())
            .or_insert(parsed)
            .value()
            .clone()
    }

    /**
     Enters a directory: returns the stack its children are checked against.

     `relative_dir` is the directory's path relative to the search root (empty for the
     root itself). The parent's stack is left untouched, so siblings explored on other
     workers keep their own snapshot.
    */
    #[must_use]
    pub fn push_directory(
        &self,
        stack: &IgnoreStack,
        relative_dir: &Path,
        canonical_dir: &Path,
    ) -> IgnoreStack {
        match self.rules_for(canonical_dir) {
            Some(rules) => stack.push(relative_dir.to_path_buf(), rules),
            None => stack.clone(),
        }
    }

    /// Checks whether an entry is pruned by version-control directory rules or by the stack.
    #[must_use]
    pub fn is_excluded(
        &self,
        file_name: &OsStr,
        relative: &Path,
        is_dir: bool,
        stack: &IgnoreStack,
    ) -> bool {
        if is_dir && is_vcs_dir(file_name) {
            tracing::trace!(path = %relative.display(), "pruned version-control directory");
            return true;
        }

        let excluded = stack.is_excluded(relative, is_dir);
        if excluded {
            tracing::trace!(path = %relative.display(), "pruned by ignore rules");
        }
        excluded
    }
}

/// Returns true for the names in [`VCS_DIRS`]
#[inline]
#[must_use]
pub fn is_vcs_dir(file_name: &OsStr) -> bool {
    VCS_DIRS.iter().any(|vcs| OsStr::new(vcs) == file_name)
}

/// Parses the rule files of one directory, `None` when it has no rules
fn load_rules(dir: &Path) -> Option<Gitignore> {
    let mut builder = GitignoreBuilder::new(dir);
    let mut found_any = false;

    for name in RULE_FILES {
        let rule_file = dir.join(name);
        match builder.add(&rule_file) {
            None => found_any = true,
            Some(err) if is_missing(&err) => {}
            Some(err) => {
                // partial errors still leave the valid lines in the builder
                found_any = true;
                tracing::debug!(file = %rule_file.display(), error = %err, "ignore file partly unreadable");
            }
        }
    }

    if !found_any {
        return None;
    }

    match builder.build() {
        Ok(rules) if rules.is_empty() => None,
        Ok(rules) => Some(rules),
        Err(err) => {
            tracing::debug!(dir = %dir.display(), error = %err, "failed to build ignore rules");
            None
        }
    }
}

fn is_missing(err: &::ignore::Error) -> bool {
    err.io_error()
        .is_some_and(|io_err| io_err.kind() == io::ErrorKind::NotFound)
}

#[derive(Debug)]
struct IgnoreFrame {
    /// Owning directory, relative to the search root
    dir: PathBuf,
    rules: Arc<Gitignore>,
    parent: Option<Arc<IgnoreFrame>>,
}

/**
 The rule sets in force for one directory: its own plus every ancestor's up to the root.

 A persistent linked list: pushing allocates one frame that points at the parent's,
 cloning is a reference-count bump, and a frame disappears once the last subtree
 holding it has been walked.
*/
#[derive(Clone, Debug, Default)]
pub struct IgnoreStack {
    top: Option<Arc<IgnoreFrame>>,
}

impl IgnoreStack {
    /// An empty stack (nothing is excluded)
    #[must_use]
    pub const fn empty() -> Self {
        Self { top: None }
    }

    /// Returns a new stack with `rules` (owned by `dir`) on top
    #[must_use]
    pub fn push(&self, dir: PathBuf, rules: Arc<Gitignore>) -> Self {
        Self {
            top: Some(Arc::new(IgnoreFrame {
                dir,
                rules,
                parent: self.top.clone(),
            })),
        }
    }

    /// Number of rule sets in force
    #[must_use]
    pub fn len(&self) -> usize {
        let mut count = 0;
        let mut frame = self.top.as_deref();
        while let Some(current) = frame {
            count += 1;
            frame = current.parent.as_deref();
        }
        count
    }

    /// True when no directory on the chain owns rules
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.top.is_none()
    }

    /**
     Decides whether the root-relative path is excluded.

     The most specific directory is consulted first and the first rule set with an
     opinion decides, which is the same as evaluating root-most to most specific with
     the last match winning. A whitelist (`!pattern`) in a deeper file therefore
     re-includes what a shallower file excluded.
    */
    #[must_use]
    pub fn is_excluded(&self, relative: &Path, is_dir: bool) -> bool {
        let mut frame = self.top.as_deref();
        while let Some(current) = frame {
            if let Ok(below) = relative.strip_prefix(&current.dir) {
                match current.rules.matched(below, is_dir) {
                    Match::Ignore(_) => return true,
                    Match::Whitelist(_) => return false,
                    Match::None => {}
                }
            }
            frame = current.parent.as_deref();
        }
        false
    }
}
