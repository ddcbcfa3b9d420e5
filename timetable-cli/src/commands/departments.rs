use anyhow::Result;
use owo_colors::OwoColorize;
use timetable_core::config::TimetableConfig;

pub fn run(config: &TimetableConfig) -> Result<()> {
    let departments = config.store()?.departments()?;

    if departments.is_empty() {
        println!("{}", "No departments imported yet".dimmed());
        println!("Import one with:\n  timetable import <Department>.html");
        return Ok(());
    }

    for dept in &departments {
        let count = format!("({} modules)", dept.modules.len());
        println!("{} {}", dept.name, count.dimmed());
    }

    Ok(())
}
