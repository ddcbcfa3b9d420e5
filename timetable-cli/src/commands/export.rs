use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use timetable_core::config::TimetableConfig;
use timetable_core::ics::generate_calendar;
use timetable_core::recurrence::expand_modules;

pub fn run(config: &TimetableConfig, codes: &[String], output: Option<&Path>) -> Result<()> {
    let anchor = config.term_start_date()?;
    let modules = config.store()?.modules_by_codes(codes)?;

    let events = expand_modules(&modules, anchor)?;
    let ics = generate_calendar(&events)?;

    match output {
        Some(path) => {
            std::fs::write(path, &ics)
                .with_context(|| format!("Could not write {}", path.display()))?;
            eprintln!(
                "{} {} {}",
                "✓".green(),
                path.display(),
                format!("({} events)", events.len()).dimmed()
            );
        }
        None => print!("{}", ics),
    }

    Ok(())
}
