//! Shared constants.

use chrono::Weekday;

/// Default start of the teaching day (HH:MM)
pub const DEFAULT_DAY_START: &str = "09:15";

/// Default end of the teaching day (HH:MM)
pub const DEFAULT_DAY_END: &str = "17:45";

/// Default display increment in minutes
pub const DEFAULT_INCREMENT_MINUTES: i64 = 30;

/// Increments are never halved below this many seconds
pub const MIN_INCREMENT_SECONDS: i64 = 60;

/// Highest term week a lecture may be scheduled in
pub const MAX_WEEK: u32 = 53;

/// Days shown in a timetable, in display order
pub const TEACHING_DAYS: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

/// Colours handed out to modules, popped from the back
pub const PALETTE: [&str; 6] = [
    "lightblue",
    "lightcoral",
    "lightgreen",
    "lightsalmon",
    "lightseagreen",
    "lightsteelblue",
];

/// Colour used once the palette is exhausted or too many modules are shown
pub const FLAT_COLOUR: &str = "lightgrey";

/// PRODID written into exported calendars
pub const ICS_PRODID: &str = "-//timetables//timetables 1.0//EN";

/// Domain part of exported event UIDs
pub const UID_DOMAIN: &str = "timetables";
