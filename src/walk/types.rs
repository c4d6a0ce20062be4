use crate::util::IgnoreStack;
use dashmap::DashSet;
use std::{path::PathBuf, sync::Arc};

/// (device, inode) of a directory, used to detect cycles through followed links
pub(crate) type DirIdentity = (u64, u64);

/// Per-root state shared by every directory task spawned under that root
#[derive(Debug)]
pub(crate) struct RootContext {
    /// Position of the root in the request
    pub(crate) index: usize,
    /// Directories already entered, only tracked when following symlinks
    pub(crate) visited: Option<DashSet<DirIdentity>>,
}

/// One unit of work: a directory waiting to be enumerated
#[derive(Debug)]
pub(crate) struct DirTask {
    /// Absolute path as walked
    pub(crate) path: PathBuf,
    /// Path relative to the root, empty for the root itself
    pub(crate) relative: PathBuf,
    pub(crate) canonical: PathBuf,
    pub(crate) depth: usize,
    /// Rules inherited from the ancestors; the directory's own file is pushed when it is entered
    pub(crate) ignore: IgnoreStack,
    pub(crate) root: Arc<RootContext>,
}
