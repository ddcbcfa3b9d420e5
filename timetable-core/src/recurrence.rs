//! Week-range expansion for calendar export.
//!
//! Each lecture recurs weekly over one or more inclusive term-week ranges.
//! Given the date of the Monday of week 1 (the anchor), every week in every
//! range becomes one concrete event.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::constants::UID_DOMAIN;
use crate::error::{TimetableError, TimetableResult};
use crate::grid::LectureEntry;
use crate::model::{Module, day_name};
use crate::week_range::WeekRange;

/// One concrete occurrence of a lecture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub uid: String,
    pub summary: String,
    pub description: Option<String>,
    pub location: Option<String>,
    /// Floating local time
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub week: u32,
}

/// Expand `entry` into one event per week of each of its week ranges.
///
/// `day_index` is the lecture's offset from the anchor week's Monday.
/// Ranges are walked in the order they are attached to the lecture and
/// overlapping ranges yield duplicate events.
///
/// Weeks are checked again here since stored data does not pass through
/// [`WeekRange::new`].
pub fn expand(
    entry: &LectureEntry,
    anchor: NaiveDate,
    day_index: u32,
) -> TimetableResult<Vec<CalendarEvent>> {
    let lecture = &entry.lecture;
    let mut events = Vec::new();

    for range in &lecture.weeks {
        WeekRange::new(range.start, range.end)?;

        for week in range.weeks() {
            let offset = Duration::weeks(i64::from(week) - 1) + Duration::days(i64::from(day_index));
            let date = anchor.checked_add_signed(offset).ok_or_else(|| {
                TimetableError::InvalidWeekRange(format!(
                    "week {} of {} is out of the calendar range",
                    week, entry.module.code
                ))
            })?;

            events.push(CalendarEvent {
                uid: event_uid(entry, week),
                summary: event_summary(entry, week),
                description: event_description(entry),
                location: lecture.room.clone().filter(|r| !r.trim().is_empty()),
                start: date.and_time(lecture.start),
                end: date.and_time(lecture.end),
                week,
            });
        }
    }

    Ok(events)
}

/// [`expand`] using the lecture's own weekday.
pub fn expand_lecture(entry: &LectureEntry, anchor: NaiveDate) -> TimetableResult<Vec<CalendarEvent>> {
    expand(entry, anchor, entry.lecture.day_index())
}

/// Expand every lecture of every module, in order.
pub fn expand_modules(modules: &[Module], anchor: NaiveDate) -> TimetableResult<Vec<CalendarEvent>> {
    let mut events = Vec::new();
    for module in modules {
        for lecture in &module.lectures {
            events.extend(expand_lecture(&LectureEntry::new(module, lecture), anchor)?);
        }
    }

    tracing::debug!(
        modules = modules.len(),
        events = events.len(),
        anchor = %anchor,
        "Expanded lectures into calendar events"
    );

    Ok(events)
}

fn event_summary(entry: &LectureEntry, week: u32) -> String {
    match &entry.module.name {
        Some(name) => format!("{} {} - Week {}", entry.module.code, name, week),
        None => format!("{} - Week {}", entry.module.code, week),
    }
}

fn event_description(entry: &LectureEntry) -> Option<String> {
    let lecture = &entry.lecture;
    let mut lines = Vec::new();

    if !lecture.activity.trim().is_empty() {
        lines.push(lecture.activity.trim().to_string());
    }
    if let Some(staff) = &lecture.staff {
        lines.push(format!("Staff: {}", staff));
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

fn event_uid(entry: &LectureEntry, week: u32) -> String {
    format!(
        "{}-{}-{}-w{}@{}",
        entry.module.code.to_lowercase(),
        day_name(entry.lecture.day).to_lowercase(),
        entry.lecture.start.format("%H%M"),
        week,
        UID_DOMAIN
    )
}

#[cfg(test)]
mod tests {
    use chrono::Weekday;

    use super::*;
    use crate::grid::ModuleRef;
    use crate::model::fixtures::{lecture, module, time};
    use crate::week_range::WeekRange;

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2013, 7, 29).unwrap()
    }

    fn entry_with_weeks(weeks: Vec<WeekRange>) -> LectureEntry {
        let mut l = lecture("Lecture", Weekday::Mon, "09:15", "10:15");
        l.weeks = weeks;
        l.room = Some("B.1.01".to_string());
        LectureEntry {
            module: ModuleRef {
                code: "CS101".to_string(),
                name: Some("Programming".to_string()),
            },
            lecture: l,
        }
    }

    #[test]
    fn test_expands_weeks_three_to_five_from_anchor() {
        let entry = entry_with_weeks(vec![WeekRange { start: 3, end: 5 }]);
        let events = expand(&entry, anchor(), 0).unwrap();

        let starts: Vec<_> = events.iter().map(|e| e.start).collect();
        assert_eq!(
            starts,
            vec![
                NaiveDate::from_ymd_opt(2013, 8, 12).unwrap().and_time(time("09:15")),
                NaiveDate::from_ymd_opt(2013, 8, 19).unwrap().and_time(time("09:15")),
                NaiveDate::from_ymd_opt(2013, 8, 26).unwrap().and_time(time("09:15")),
            ]
        );
        assert_eq!(events[0].end.time(), time("10:15"));
        assert_eq!(events[0].summary, "CS101 Programming - Week 3");
        assert_eq!(events[0].location.as_deref(), Some("B.1.01"));
    }

    #[test]
    fn test_single_week_range_yields_one_event() {
        let entry = entry_with_weeks(vec![WeekRange { start: 1, end: 1 }]);
        let events = expand(&entry, anchor(), 0).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].start.date(), anchor());
    }

    #[test]
    fn test_day_index_offsets_from_monday() {
        let entry = entry_with_weeks(vec![WeekRange { start: 2, end: 2 }]);
        let events = expand(&entry, anchor(), 3).unwrap();
        assert_eq!(events[0].start.date(), NaiveDate::from_ymd_opt(2013, 8, 8).unwrap());
    }

    #[test]
    fn test_ranges_walked_in_attachment_order_with_duplicates() {
        let entry = entry_with_weeks(vec![
            WeekRange { start: 5, end: 6 },
            WeekRange { start: 1, end: 1 },
            WeekRange { start: 6, end: 6 },
        ]);
        let weeks: Vec<u32> = expand(&entry, anchor(), 0).unwrap().iter().map(|e| e.week).collect();
        assert_eq!(weeks, vec![5, 6, 1, 6]);
    }

    #[test]
    fn test_blank_room_omits_location() {
        let mut entry = entry_with_weeks(vec![WeekRange { start: 1, end: 1 }]);
        entry.lecture.room = Some("  ".to_string());
        assert_eq!(expand(&entry, anchor(), 0).unwrap()[0].location, None);
    }

    #[test]
    fn test_expand_modules_uses_lecture_weekday() {
        let mut wed = lecture("Lab", Weekday::Wed, "14:15", "16:15");
        wed.staff = Some("Smith, Jones".to_string());
        let modules = vec![module("CS102", vec![wed])];

        let events = expand_modules(&modules, anchor()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].start.date(), NaiveDate::from_ymd_opt(2013, 7, 31).unwrap());
        assert_eq!(events[0].uid, "cs102-wednesday-1415-w1@timetables");
        assert_eq!(
            events[0].description.as_deref(),
            Some("Lab\nStaff: Smith, Jones")
        );
    }

    #[test]
    fn test_out_of_range_weeks_are_errors_not_panics() {
        // Built directly, as if read back from a hand-edited store file
        let entry = entry_with_weeks(vec![WeekRange { start: 99_999_999, end: 99_999_999 }]);
        assert!(matches!(
            expand(&entry, anchor(), 0),
            Err(TimetableError::InvalidWeekRange(_))
        ));

        let huge = entry_with_weeks(vec![WeekRange { start: 1, end: 4_000_000_000 }]);
        assert!(matches!(
            expand(&huge, anchor(), 0),
            Err(TimetableError::InvalidWeekRange(_))
        ));
    }

    #[test]
    fn test_anchor_near_end_of_calendar_is_an_error() {
        let entry = entry_with_weeks(vec![WeekRange { start: 53, end: 53 }]);
        assert!(matches!(
            expand(&entry, NaiveDate::MAX, 0),
            Err(TimetableError::InvalidWeekRange(_))
        ));
    }

    #[test]
    fn test_expand_modules_stops_at_first_bad_lecture() {
        let mut bad = lecture("Lecture", Weekday::Mon, "09:15", "10:15");
        bad.weeks = vec![WeekRange { start: 60, end: 61 }];
        let modules = vec![module("CS101", vec![bad])];

        assert!(expand_modules(&modules, anchor()).is_err());
    }
}
