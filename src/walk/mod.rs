mod finder;
mod finder_builder;
mod types;

pub use finder::{Finder, Traversal};
pub use finder_builder::FinderBuilder;
