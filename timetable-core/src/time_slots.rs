//! Discrete time columns for a teaching day.

use chrono::{Duration, NaiveTime};

use crate::constants::MIN_INCREMENT_SECONDS;
use crate::error::{TimetableError, TimetableResult};

/// The columns of a day grid: `day_start`, `day_start + increment`, ...
///
/// A slot is generated while the previous one is still before `day_end`, so
/// the last slot is the first one at or past `day_end`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSlots {
    day_start: NaiveTime,
    day_end: NaiveTime,
    increment: Duration,
    times: Vec<NaiveTime>,
}

impl TimeSlots {
    pub fn new(day_start: NaiveTime, day_end: NaiveTime, increment: Duration) -> TimetableResult<Self> {
        if increment.num_seconds() < MIN_INCREMENT_SECONDS {
            return Err(TimetableError::InvalidIncrement(increment.num_seconds()));
        }
        if day_end <= day_start {
            return Err(TimetableError::InvalidDayWindow {
                start: day_start.format("%H:%M").to_string(),
                end: day_end.format("%H:%M").to_string(),
            });
        }

        let mut times = vec![day_start];
        let mut current = day_start;
        while current < day_end {
            let (next, wrapped) = current.overflowing_add_signed(increment);
            if wrapped != 0 {
                break;
            }
            times.push(next);
            current = next;
        }

        Ok(TimeSlots {
            day_start,
            day_end,
            increment,
            times,
        })
    }

    pub fn increment(&self) -> Duration {
        self.increment
    }

    pub fn day_start(&self) -> NaiveTime {
        self.day_start
    }

    pub fn day_end(&self) -> NaiveTime {
        self.day_end
    }

    pub fn times(&self) -> &[NaiveTime] {
        &self.times
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// `HH:MM` label of each slot.
    pub fn labels(&self) -> Vec<String> {
        self.times.iter().map(|t| format_label(*t)).collect()
    }

    /// Index of the slot containing `time`.
    ///
    /// Times between two slots belong to the earlier one. `None` before the
    /// first slot or after the last.
    pub fn index_of(&self, time: NaiveTime) -> Option<usize> {
        let last = *self.times.last()?;
        if time < self.day_start || time > last {
            return None;
        }
        let offset = (time - self.day_start).num_seconds();
        Some((offset / self.increment.num_seconds()) as usize)
    }
}

pub(crate) fn format_label(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}
