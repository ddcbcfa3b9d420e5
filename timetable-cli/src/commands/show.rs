use anyhow::Result;
use chrono::{Datelike, Local};
use owo_colors::OwoColorize;
use timetable_core::config::TimetableConfig;
use timetable_core::view::TimetableView;

use crate::render::Render;

pub fn run(config: &TimetableConfig, codes: &[String]) -> Result<()> {
    let modules = config.store()?.modules_by_codes(codes)?;

    if modules.is_empty() {
        println!("{}", "No matching modules".dimmed());
        return Ok(());
    }

    let today = Local::now().weekday();
    let view = TimetableView::build(&modules, &config.view_options()?, today)?;

    println!("{}", view.render());
    Ok(())
}
