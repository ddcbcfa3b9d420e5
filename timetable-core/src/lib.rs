//! Core library for timetables.
//!
//! - `import` reads HTML spreadsheet exports into a [`model::Department`]
//! - `store` keeps departments on disk and answers module lookups
//! - `grid` and `view` lay a week of lectures out into display rows
//! - `recurrence` and `ics` turn lectures into a calendar export

pub mod colour;
pub mod config;
pub mod constants;
pub mod error;
pub mod grid;
pub mod ics;
pub mod import;
pub mod increment;
pub mod model;
pub mod recurrence;
pub mod store;
pub mod time_slots;
pub mod view;
pub mod week_range;

pub use error::{TimetableError, TimetableResult};
pub use model::{Department, Lecture, Module};
pub use week_range::WeekRange;
