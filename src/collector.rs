use crate::{TraversalError, fs::DirEntry};
use std::{
    collections::{HashMap, hash_map::Entry},
    path::{Path, PathBuf},
};

/**
 Turns walked entries into the paths a caller sees.

 Each path keeps the shape of the root it was found under: `lib` yields `lib/x`,
 `.` yields `./x` and an absolute root yields absolute paths. With several roots the
 same physical entry can be reached more than once; it is reported once, in the form
 of the earliest root (by argument position) that reached it.
*/
#[derive(Debug)]
pub struct ResultCollector<'roots> {
    roots: &'roots [PathBuf],
    /// Canonical path -> slot in `results`, only used with more than one root
    seen: Option<HashMap<PathBuf, usize>>,
    results: Vec<(usize, PathBuf)>,
}

impl<'roots> ResultCollector<'roots> {
    /// Creates a collector for entries found under `roots`.
    #[must_use]
    pub fn new(roots: &'roots [PathBuf]) -> Self {
        Self {
            roots,
            seen: (roots.len() > 1).then(HashMap::new),
            results: Vec::new(),
        }
    }

    /// Number of distinct paths collected so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// True when nothing has been collected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Adds one entry, replacing an earlier copy found under a later root
    pub fn push(&mut self, entry: DirEntry) {
        let root_index = entry.root_index();
        let display = self.present(&entry);

        let Some(seen) = self.seen.as_mut() else {
            self.results.push((root_index, display));
            return;
        };

        match seen.entry(entry.canonical) {
            Entry::Vacant(vacant) => {
                vacant.insert(self.results.len());
                self.results.push((root_index, display));
            }
            Entry::Occupied(occupied) => {
                let slot = &mut self.results[*occupied.get()];
                if root_index < slot.0 {
                    *slot = (root_index, display);
                }
            }
        }
    }

    /// The collected paths, in arrival order
    #[must_use]
    pub fn finish(self) -> Vec<PathBuf> {
        self.results.into_iter().map(|(_, path)| path).collect()
    }

    fn present(&self, entry: &DirEntry) -> PathBuf {
        self.roots
            .get(entry.root_index())
            .map_or_else(|| entry.path().to_path_buf(), |root| display_path(root, entry.relative_path()))
    }
}

impl Extend<DirEntry> for ResultCollector<'_> {
    fn extend<I: IntoIterator<Item = DirEntry>>(&mut self, entries: I) {
        for entry in entries {
            self.push(entry);
        }
    }
}

/// The root as given joined with the path below it
fn display_path(root: &Path, relative: &Path) -> PathBuf {
    if root.as_os_str().is_empty() {
        relative.to_path_buf()
    } else {
        root.join(relative)
    }
}

/// The outcome of [`Finder::run`](crate::Finder::run).
#[derive(Debug, Default)]
pub struct SearchResults {
    paths: Vec<PathBuf>,
    errors: Vec<TraversalError>,
}

impl SearchResults {
    pub(crate) const fn new(paths: Vec<PathBuf>, errors: Vec<TraversalError>) -> Self {
        Self { paths, errors }
    }

    /// The matching paths, unordered
    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Failures met while walking; always empty unless error collection was enabled
    #[must_use]
    pub fn errors(&self) -> &[TraversalError] {
        &self.errors
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Splits into paths and errors
    #[must_use]
    pub fn into_parts(self) -> (Vec<PathBuf>, Vec<TraversalError>) {
        (self.paths, self.errors)
    }

    /// The paths as strings; names that are not valid UTF-8 are converted lossily
    #[must_use]
    pub fn into_strings(self) -> Vec<String> {
        self.paths
            .into_iter()
            .map(|path| path.to_string_lossy().into_owned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::FileType;

    fn entry(root_index: usize, relative: &str, canonical: &str) -> DirEntry {
        DirEntry::new(
            PathBuf::from("/abs").join(relative),
            PathBuf::from(relative),
            PathBuf::from(canonical),
            FileType::RegularFile,
            1,
            root_index,
        )
    }

    #[test]
    fn keeps_the_shape_of_the_root() {
        let roots = vec![PathBuf::from("."), PathBuf::from("lib"), PathBuf::from("/srv/data")];
        let mut collector = ResultCollector::new(&roots);
        collector.push(entry(0, "a.txt", "/c/a.txt"));
        collector.push(entry(1, "b.txt", "/c/lib/b.txt"));
        collector.push(entry(2, "c.txt", "/srv/data/c.txt"));

        assert_eq!(
            collector.finish(),
            vec![
                PathBuf::from("./a.txt"),
                PathBuf::from("lib/b.txt"),
                PathBuf::from("/srv/data/c.txt"),
            ]
        );
    }

    #[test]
    fn earliest_root_wins_regardless_of_arrival() {
        let roots = vec![PathBuf::from("."), PathBuf::from("sub")];
        let mut collector = ResultCollector::new(&roots);
        // the inner root's copy arrives first
        collector.push(entry(1, "x.txt", "/c/sub/x.txt"));
        collector.push(entry(0, "sub/x.txt", "/c/sub/x.txt"));
        collector.push(entry(1, "x.txt", "/c/sub/x.txt"));

        assert_eq!(collector.len(), 1);
        assert_eq!(collector.finish(), vec![PathBuf::from("./sub/x.txt")]);
    }

    #[test]
    fn single_root_skips_deduplication() {
        let roots = vec![PathBuf::from("root")];
        let mut collector = ResultCollector::new(&roots);
        collector.extend([entry(0, "a", "/c/a"), entry(0, "b", "/c/b")]);
        assert_eq!(collector.len(), 2);
        assert!(collector.seen.is_none());
    }

    #[test]
    fn results_convert_to_strings() {
        let results = SearchResults::new(vec![PathBuf::from("./a"), PathBuf::from("b/c")], Vec::new());
        assert_eq!(results.len(), 2);
        assert!(results.errors().is_empty());
        assert_eq!(results.into_strings(), vec!["./a".to_owned(), "b/c".to_owned()]);
    }
}
