mod exclude_filter;
mod extension_filter;
mod file_type_filter;
mod size_filter;
mod time_filter;

pub use exclude_filter::ExcludeFilter;
pub use extension_filter::ExtensionFilter;
pub use file_type_filter::TypeFilter;
pub use size_filter::SizeFilter;
pub use time_filter::TimeFilter;
