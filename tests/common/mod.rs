#![allow(dead_code)]

use chrono::Utc;
use fdr_core::{Finder, SearchConfig, SearchRequest, SearchResults, Snapshot};
use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};
use tempfile::TempDir;

/// Creates a file (and its parents) holding `len` bytes
pub fn file(root: &Path, relative: &str, len: usize) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, vec![b'x'; len]).unwrap();
    path
}

pub fn dir(root: &Path, relative: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(&path).unwrap();
    path
}

/**
 A small tree used by most tests:

 ```text
 a.txt
 README.md
 .hidden
 dir/b.rs
 dir/sub/c.md
 dir/sub/deeper/d.txt
 ```
*/
pub fn sample_tree() -> TempDir {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    file(root, "a.txt", 10);
    file(root, "README.md", 10);
    file(root, ".hidden", 10);
    file(root, "dir/b.rs", 10);
    file(root, "dir/sub/c.md", 10);
    file(root, "dir/sub/deeper/d.txt", 10);
    tmp
}

pub fn request(root: &Path) -> SearchRequest {
    SearchRequest::new(root)
}

/// Runs a request with `cwd` as the working directory relative roots resolve against
pub fn run_in(cwd: &Path, request: &SearchRequest) -> SearchResults {
    let snapshot = Snapshot {
        now: Utc::now(),
        cwd: cwd.to_path_buf(),
    };
    let config = SearchConfig::with_snapshot(request, snapshot).expect("valid request");
    Finder::from_config(config).run()
}

/// Search results under an absolute root, as root-relative strings
pub fn names(root: &Path, request: &SearchRequest) -> BTreeSet<String> {
    fdr_core::search(request)
        .expect("search should succeed")
        .into_iter()
        .map(|path| relative_to(root, &path))
        .collect()
}

pub fn relative_to(root: &Path, path: &str) -> String {
    Path::new(path)
        .strip_prefix(root)
        .unwrap_or_else(|_| panic!("{path} is not under {}", root.display()))
        .to_string_lossy()
        .into_owned()
}

pub fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|item| (*item).to_owned()).collect()
}
