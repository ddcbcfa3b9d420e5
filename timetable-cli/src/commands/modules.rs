use anyhow::Result;
use owo_colors::OwoColorize;
use timetable_core::config::TimetableConfig;

pub fn run(config: &TimetableConfig, department: &str) -> Result<()> {
    let dept = config.store()?.department(department)?;

    for module in &dept.modules {
        let name = module.name.as_deref().unwrap_or("");
        println!("{:<12} {}", module.code.bold(), name);
    }

    Ok(())
}
