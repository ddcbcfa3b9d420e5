use std::path::PathBuf;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use timetable_core::config::TimetableConfig;
use timetable_core::import::import_file;

pub fn run(config: &TimetableConfig, files: &[PathBuf]) -> Result<()> {
    let store = config.store()?;

    for path in files {
        let dept = import_file(path).with_context(|| format!("Failed to import {}", path.display()))?;

        let lectures: usize = dept.modules.iter().map(|m| m.lectures.len()).sum();
        store.save_department(&dept)?;

        println!(
            "{} {} {}",
            "✓".green(),
            dept.name.bold(),
            format!("({} modules, {} lectures)", dept.modules.len(), lectures).dimmed()
        );
    }

    Ok(())
}
