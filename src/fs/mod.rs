mod dir_entry;
mod file_type;

pub use dir_entry::DirEntry;
pub(crate) use dir_entry::is_hidden_name;
pub use file_type::FileType;
