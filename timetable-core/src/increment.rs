//! Display increment selection.

use chrono::Duration;

use crate::constants::MIN_INCREMENT_SECONDS;
use crate::error::{TimetableError, TimetableResult};

/// Pick the grid increment for a set of lecture durations.
///
/// Starting from `requested`, the increment is halved while it is longer than
/// the shortest lecture, but never below one minute. Non-positive durations
/// are ignored. Halving works in whole seconds and stops at an odd number of
/// seconds, so every selected increment divides `requested` exactly and a
/// day window divisible by `requested` stays divisible.
pub fn select_increment<I>(requested: Duration, durations: I) -> TimetableResult<Duration>
where
    I: IntoIterator<Item = Duration>,
{
    let min = Duration::seconds(MIN_INCREMENT_SECONDS);
    if requested < min {
        return Err(TimetableError::InvalidIncrement(requested.num_seconds()));
    }

    let Some(shortest) = durations.into_iter().filter(|d| *d > Duration::zero()).min() else {
        return Ok(requested);
    };

    let mut increment = requested;
    while increment > shortest {
        if increment.num_seconds() % 2 != 0 {
            break;
        }
        let halved = Duration::seconds(increment.num_seconds() / 2);
        if halved < min {
            break;
        }
        increment = halved;
    }

    if increment != requested {
        tracing::debug!(
            requested = requested.num_seconds(),
            selected = increment.num_seconds(),
            shortest = shortest.num_seconds(),
            "Shrunk grid increment to fit shortest lecture"
        );
    }

    Ok(increment)
}
