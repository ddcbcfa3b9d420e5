//! Term-week ranges attached to lectures.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::MAX_WEEK;
use crate::error::{TimetableError, TimetableResult};

/// An inclusive range of term weeks, e.g. weeks 3 to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekRange {
    pub start: u32,
    pub end: u32,
}

impl WeekRange {
    /// Weeks run from 1 to [`MAX_WEEK`].
    pub fn new(start: u32, end: u32) -> TimetableResult<Self> {
        if start == 0 || end < start || end > MAX_WEEK {
            return Err(TimetableError::InvalidWeekRange(format!("{start}-{end}")));
        }
        Ok(WeekRange { start, end })
    }

    pub fn single(week: u32) -> TimetableResult<Self> {
        Self::new(week, week)
    }

    /// Weeks covered by this range, ascending.
    pub fn weeks(&self) -> impl Iterator<Item = u32> {
        self.start..=self.end
    }

    /// Parse a single group: `"7"` or `"3-5"`.
    pub fn parse(s: &str) -> TimetableResult<Self> {
        let invalid = || TimetableError::InvalidWeekRange(s.to_string());

        let parts: Vec<&str> = s.split('-').map(str::trim).collect();
        let parse_week = |p: &str| p.parse::<u32>().map_err(|_| invalid());

        match parts.as_slice() {
            [week] => Self::single(parse_week(week)?).map_err(|_| invalid()),
            [start, end] => Self::new(parse_week(start)?, parse_week(end)?).map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }

    /// Parse a comma-separated list of groups: `"1-5, 7,9-10"`.
    ///
    /// Order is kept as written; overlapping groups are not merged.
    pub fn parse_list(s: &str) -> TimetableResult<Vec<Self>> {
        if s.trim().is_empty() {
            return Err(TimetableError::InvalidWeekRange(s.to_string()));
        }
        s.split(',').map(|group| Self::parse(group.trim())).collect()
    }
}

impl fmt::Display for WeekRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_week() {
        assert_eq!(WeekRange::parse("3").unwrap(), WeekRange { start: 3, end: 3 });
    }

    #[test]
    fn test_parse_hyphenated_range() {
        assert_eq!(WeekRange::parse("3-5").unwrap(), WeekRange { start: 3, end: 5 });
    }

    #[test]
    fn test_parse_list_keeps_written_order() {
        let ranges = WeekRange::parse_list("9-10, 1-5,7").unwrap();
        assert_eq!(
            ranges,
            vec![
                WeekRange { start: 9, end: 10 },
                WeekRange { start: 1, end: 5 },
                WeekRange { start: 7, end: 7 },
            ]
        );
    }

    #[test]
    fn test_parse_rejects_malformed_groups() {
        for bad in ["a", "1-2-3", "5-3", "0", "", " ", "1,,2", "-4"] {
            assert!(
                matches!(
                    WeekRange::parse_list(bad),
                    Err(TimetableError::InvalidWeekRange(_))
                ),
                "expected '{}' to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_rejects_weeks_past_end_of_year() {
        assert!(WeekRange::new(1, MAX_WEEK).is_ok());
        for bad in ["54", "99999999", "1-4000000000", "50-54"] {
            assert!(
                matches!(WeekRange::parse(bad), Err(TimetableError::InvalidWeekRange(_))),
                "expected '{}' to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_display_matches_source_format() {
        assert_eq!(WeekRange::parse("4").unwrap().to_string(), "4");
        assert_eq!(WeekRange::parse("4-9").unwrap().to_string(), "4-9");
    }

    #[test]
    fn test_weeks_iterates_inclusive() {
        let weeks: Vec<u32> = WeekRange::new(3, 5).unwrap().weeks().collect();
        assert_eq!(weeks, vec![3, 4, 5]);
        assert_eq!(WeekRange::single(1).unwrap().weeks().count(), 1);
    }
}
