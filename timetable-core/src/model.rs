//! Departments, modules and lectures as stored after import.

use chrono::{Duration, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{TimetableError, TimetableResult};
use crate::week_range::WeekRange;

/// A department and every module it teaches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub name: String,
    #[serde(default)]
    pub modules: Vec<Module>,
}

/// A taught module, e.g. `CS101 Introduction to Programming`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Teaching weeks from the module header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weeks: Option<WeekRange>,
    #[serde(default)]
    pub lectures: Vec<Lecture>,
}

impl Module {
    /// `CODE name`, or just the code when the module has no name.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => format!("{} {}", self.code, name),
            None => self.code.clone(),
        }
    }
}

/// One weekly teaching slot of a module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lecture {
    pub activity: String,
    pub day: Weekday,
    #[serde(with = "hm_time")]
    pub start: NaiveTime,
    #[serde(with = "hm_time")]
    pub end: NaiveTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff: Option<String>,
    #[serde(default)]
    pub weeks: Vec<WeekRange>,
}

impl Lecture {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Number of slot columns this lecture covers at `increment`.
    ///
    /// Truncates: a 50 minute lecture at 30 minute increments spans 1 column.
    /// Zero or negative for degenerate lectures and increments.
    pub fn col_span(&self, increment: Duration) -> i64 {
        let step = increment.num_seconds();
        if step <= 0 {
            return 0;
        }
        self.duration().num_seconds() / step
    }

    /// Weekday offset from Monday (0 for Monday).
    pub fn day_index(&self) -> u32 {
        self.day.num_days_from_monday()
    }

    /// Week ranges joined for display, e.g. `1-5, 7`.
    pub fn weeks_label(&self) -> String {
        self.weeks
            .iter()
            .map(|w| w.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Parse `HH:MM` (seconds are accepted but not required).
pub fn parse_time(s: &str) -> TimetableResult<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| TimetableError::InvalidTime(s.to_string()))
}

/// Parse a weekday name such as `Monday` or `mon`.
pub fn parse_day(s: &str) -> TimetableResult<Weekday> {
    s.trim()
        .parse::<Weekday>()
        .map_err(|_| TimetableError::InvalidDay(s.trim().to_string()))
}

/// Full English name of a weekday.
pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Serde adapter storing `NaiveTime` as `HH:MM`.
pub mod hm_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_time(&s).map_err(serde::de::Error::custom)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_col_span_truncates_remainder() {
        let l = lecture("Lecture", Weekday::Mon, "09:15", "10:05");
        assert_eq!(l.col_span(Duration::minutes(30)), 1);
        assert_eq!(l.col_span(Duration::minutes(10)), 5);
    }

    #[test]
    fn test_col_span_degenerate_lecture() {
        let l = lecture("Lecture", Weekday::Mon, "10:00", "09:00");
        assert!(l.col_span(Duration::minutes(30)) <= 0);
        assert_eq!(l.col_span(Duration::zero()), 0);
    }

    #[test]
    fn test_parse_time_accepts_hh_mm() {
        assert_eq!(parse_time(" 09:15 ").unwrap(), NaiveTime::from_hms_opt(9, 15, 0).unwrap());
        assert!(matches!(parse_time("9.15"), Err(TimetableError::InvalidTime(_))));
    }

    #[test]
    fn test_parse_day_names() {
        assert_eq!(parse_day("Monday").unwrap(), Weekday::Mon);
        assert_eq!(parse_day("fri").unwrap(), Weekday::Fri);
        assert!(matches!(parse_day("Someday"), Err(TimetableError::InvalidDay(_))));
    }

    #[test]
    fn test_lecture_toml_uses_short_times() {
        let mut l = lecture("Lab", Weekday::Wed, "14:15", "16:15");
        l.weeks = vec![WeekRange { start: 1, end: 5 }, WeekRange { start: 7, end: 7 }];

        let text = toml::to_string(&l).unwrap();
        assert!(text.contains("start = \"14:15\""), "got:\n{}", text);

        let back: Lecture = toml::from_str(&text).unwrap();
        assert_eq!(back, l);
        assert_eq!(back.weeks_label(), "1-5, 7");
    }
}
