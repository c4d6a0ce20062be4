use chrono::{DateTime, TimeDelta, Utc};

/**
 A filter for file modification times, relative to a fixed `now`.

 `now` is captured once per search so every worker compares against the same instant.

 # Examples

 ```
 use chrono::{TimeDelta, Utc};
 use fdr_core::TimeFilter;

 let now = Utc::now();
 // Modified within the last hour
 let filter = TimeFilter::new(now, Some(3600), None).unwrap();
 assert!(filter.matches_time(now - TimeDelta::minutes(5)));
 assert!(!filter.matches_time(now - TimeDelta::hours(2)));
 ```
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeFilter {
    now: DateTime<Utc>,
    /// Maximum age in seconds
    within: Option<i64>,
    /// Minimum age in seconds
    before: Option<i64>,
}

impl TimeFilter {
    /**
     Builds a time window.

     `changed_within` keeps entries no older than that many seconds, `changed_before`
     keeps entries at least that old. Both together select a window.
     A `changed_before` of zero places no lower bound on age at all, so it is dropped.
     Returns `None` when no bound remains.
    */
    #[must_use]
    pub fn new(
        now: DateTime<Utc>,
        changed_within: Option<i64>,
        changed_before: Option<i64>,
    ) -> Option<Self> {
        let before = changed_before.filter(|&secs| secs != 0);
        if changed_within.is_none() && before.is_none() {
            return None;
        }

        Some(Self {
            now,
            within: changed_within,
            before,
        })
    }

    /// The reference instant ages are measured from
    #[must_use]
    pub const fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Returns true if an entry modified at `modified` falls inside the window
    #[must_use]
    pub fn matches_time(&self, modified: DateTime<Utc>) -> bool {
        let age: TimeDelta = self.now.signed_duration_since(modified);
        let age_secs = age.num_seconds();

        self.within.is_none_or(|within| age_secs <= within)
            && self.before.is_none_or(|before| age_secs >= before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn no_bounds_means_no_filter() {
        assert!(TimeFilter::new(fixed_now(), None, None).is_none());
        assert!(TimeFilter::new(fixed_now(), None, Some(0)).is_none());
    }

    #[test]
    fn changed_within_keeps_recent_entries() {
        let now = fixed_now();
        let filter = TimeFilter::new(now, Some(60), None).unwrap();
        assert!(filter.matches_time(now));
        assert!(filter.matches_time(now - TimeDelta::seconds(60)));
        assert!(!filter.matches_time(now - TimeDelta::seconds(61)));
    }

    #[test]
    fn changed_before_keeps_old_entries() {
        let now = fixed_now();
        let filter = TimeFilter::new(now, None, Some(3600)).unwrap();
        assert!(filter.matches_time(now - TimeDelta::days(2)));
        assert!(filter.matches_time(now - TimeDelta::seconds(3600)));
        assert!(!filter.matches_time(now - TimeDelta::seconds(10)));
    }

    #[test]
    fn both_bounds_select_a_window() {
        let now = fixed_now();
        let filter = TimeFilter::new(now, Some(7 * 86_400), Some(86_400)).unwrap();
        assert!(filter.matches_time(now - TimeDelta::days(3)));
        assert!(!filter.matches_time(now - TimeDelta::hours(1)));
        assert!(!filter.matches_time(now - TimeDelta::days(8)));
    }

    #[test]
    fn future_timestamps_count_as_recent() {
        let now = fixed_now();
        let filter = TimeFilter::new(now, Some(60), None).unwrap();
        assert!(filter.matches_time(now + TimeDelta::hours(1)));
    }
}
