/**
 An inclusive size window for regular files.

 Directories and symlinks never reach this filter; the pipeline only applies it
 to regular files.

 # Examples

 ```
 use fdr_core::SizeFilter;

 let filter = SizeFilter::new(Some(100), Some(1000)).unwrap();
 assert!(filter.is_within_size(500));
 assert!(!filter.is_within_size(50));
 assert!(!filter.is_within_size(5000));
 ```
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SizeFilter {
    min: Option<u64>,
    max: Option<u64>,
}

impl SizeFilter {
    /// Builds the window, returning `None` when neither bound is set
    #[must_use]
    pub const fn new(min: Option<u64>, max: Option<u64>) -> Option<Self> {
        if min.is_none() && max.is_none() {
            None
        } else {
            Some(Self { min, max })
        }
    }

    /// Checks if the given file size satisfies this size filter
    #[inline]
    #[must_use]
    pub const fn is_within_size(&self, size: u64) -> bool {
        let above_min = match self.min {
            Some(min) => size >= min,
            None => true,
        };
        let below_max = match self.max {
            Some(max) => size <= max,
            None => true,
        };
        above_min && below_max
    }
}
