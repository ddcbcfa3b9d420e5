//! ICS calendar generation.

use chrono::{DateTime, Utc};
use icalendar::{Calendar, Component, EventLike};

use crate::constants::ICS_PRODID;
use crate::error::{TimetableError, TimetableResult};
use crate::recurrence::CalendarEvent;

/// Generate one VCALENDAR holding every event, stamped with the current time.
pub fn generate_calendar(events: &[CalendarEvent]) -> TimetableResult<String> {
    generate_calendar_at(events, Utc::now())
}

/// Generate one VCALENDAR holding every event, with `DTSTAMP` set to `stamp`.
pub fn generate_calendar_at(
    events: &[CalendarEvent],
    stamp: DateTime<Utc>,
) -> TimetableResult<String> {
    let mut cal = Calendar::new();
    let dtstamp = stamp.format("%Y%m%dT%H%M%SZ").to_string();

    for event in events {
        if event.end < event.start {
            return Err(TimetableError::IcsGenerate(format!(
                "Event '{}' ends before it starts",
                event.uid
            )));
        }

        let mut ics_event = icalendar::Event::new();
        ics_event.uid(&event.uid);
        ics_event.summary(&event.summary);
        ics_event.add_property("DTSTAMP", &dtstamp);

        // Floating datetimes: lectures happen at wall-clock time wherever the term runs
        ics_event.add_property("DTSTART", event.start.format("%Y%m%dT%H%M%S").to_string());
        ics_event.add_property("DTEND", event.end.format("%Y%m%dT%H%M%S").to_string());

        if let Some(ref loc) = event.location {
            ics_event.location(loc);
        }

        if let Some(ref desc) = event.description {
            ics_event.description(desc);
        }

        cal.push(ics_event.done());
    }

    let cal = cal.done();

    Ok(strip_ics_bloat(&cal.to_string()))
}

/// Clean up ICS output from the icalendar crate
/// - Replace PRODID with our own
/// - Remove CALSCALE:GREGORIAN (it's the default)
fn strip_ics_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:");
            result.push_str(ICS_PRODID);
            result.push_str("\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use icalendar::parser::{read_calendar, unfold};

    fn make_event(week: u32, day: u32) -> CalendarEvent {
        let date = NaiveDate::from_ymd_opt(2013, 8, day).unwrap();
        CalendarEvent {
            uid: format!("cs101-monday-0915-w{}@timetables", week),
            summary: format!("CS101 Programming - Week {}", week),
            description: Some("Lecture".to_string()),
            location: Some("B.1.01".to_string()),
            start: date.and_hms_opt(9, 15, 0).unwrap(),
            end: date.and_hms_opt(10, 15, 0).unwrap(),
            week,
        }
    }

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2013, 7, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_one_vevent_per_event_with_fixed_prodid() {
        let events = vec![make_event(3, 12), make_event(4, 19), make_event(5, 26)];
        let ics = generate_calendar_at(&events, stamp()).unwrap();

        assert!(ics.contains(&format!("PRODID:{}", ICS_PRODID)), "ICS:\n{}", ics);
        assert!(ics.contains("VERSION:2.0"));
        assert!(!ics.contains("CALSCALE"));

        let unfolded = unfold(&ics);
        let calendar = read_calendar(&unfolded).unwrap();
        let vevents = calendar
            .components
            .iter()
            .filter(|c| c.name == "VEVENT")
            .count();
        assert_eq!(vevents, 3);
    }

    #[test]
    fn test_event_times_are_floating() {
        let ics = generate_calendar_at(&[make_event(3, 12)], stamp()).unwrap();
        assert!(ics.contains("DTSTART:20130812T091500\r\n"), "ICS:\n{}", ics);
        assert!(ics.contains("DTEND:20130812T101500\r\n"), "ICS:\n{}", ics);
        assert!(ics.contains("DTSTAMP:20130701T120000Z"));
        assert!(ics.contains("LOCATION:B.1.01"));
    }

    #[test]
    fn test_empty_export_is_a_valid_calendar() {
        let ics = generate_calendar_at(&[], stamp()).unwrap();
        assert!(ics.starts_with("BEGIN:VCALENDAR"));
        assert!(!ics.contains("BEGIN:VEVENT"));
    }

    #[test]
    fn test_rejects_event_ending_before_start() {
        let mut event = make_event(3, 12);
        std::mem::swap(&mut event.start, &mut event.end);
        assert!(matches!(
            generate_calendar_at(&[event], stamp()),
            Err(TimetableError::IcsGenerate(_))
        ));
    }
}
