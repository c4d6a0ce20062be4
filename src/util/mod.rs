mod ignore;

pub use self::ignore::{IgnoreResolver, IgnoreStack, RULE_FILES, VCS_DIRS, is_vcs_dir};
