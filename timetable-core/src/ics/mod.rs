//! ICS calendar generation according to RFC 5545.

mod generate;

pub use generate::{generate_calendar, generate_calendar_at};
