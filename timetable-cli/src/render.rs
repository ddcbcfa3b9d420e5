//! Terminal rendering for timetable views.
//!
//! Extension traits that add colored terminal output to timetable-core
//! types using owo_colors.

use owo_colors::{AnsiColors, OwoColorize};
use timetable_core::constants::FLAT_COLOUR;
use timetable_core::grid::{DayGrid, FlatCell};
use timetable_core::model::day_name;
use timetable_core::view::TimetableView;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

/// Closest terminal colour for a palette entry.
fn ansi_for(colour: &str) -> AnsiColors {
    match colour {
        "lightblue" => AnsiColors::BrightBlue,
        "lightcoral" => AnsiColors::BrightRed,
        "lightgreen" => AnsiColors::BrightGreen,
        "lightsalmon" => AnsiColors::Yellow,
        "lightseagreen" => AnsiColors::Cyan,
        "lightsteelblue" => AnsiColors::Blue,
        _ => AnsiColors::White,
    }
}

fn render_cell(view: &TimetableView, cell: &FlatCell) -> String {
    let entry = cell.entry;
    let lecture = &entry.lecture;
    let colour = view.colour_of(&entry.module.code).unwrap_or(FLAT_COLOUR);

    let title = format!("{} {}", entry.module.code, lecture.activity);
    let time = format!(
        "{}-{}",
        lecture.start.format("%H:%M"),
        lecture.end.format("%H:%M")
    );

    let mut line = format!("{} {}", title.color(ansi_for(colour)), time.dimmed());
    if let Some(room) = &lecture.room {
        line.push_str(&format!(" {}", room));
    }
    if let Some(staff) = &lecture.staff {
        line.push_str(&format!(" {}", staff.dimmed()));
    }
    line.push_str(&format!(" {}", format!("weeks {}", lecture.weeks_label()).dimmed()));
    line
}

fn render_day(view: &TimetableView, grid: &DayGrid, lines: &mut Vec<String>) {
    if !grid.has_lessons() {
        lines.push(format!("   {}", "No lectures".dimmed()));
        return;
    }

    for row in grid.flatten_rows() {
        for (i, cell) in row.cells.iter().enumerate() {
            let label = if i == 0 { row.label.clone() } else { String::new() };
            lines.push(format!("   {:>5}  {}", label, render_cell(view, cell)));
        }
    }

    let unplaced = grid.unplaced().count();
    if unplaced > 0 {
        let note = format!("({} outside {}-{})", unplaced, grid.slots().day_start().format("%H:%M"), grid.slots().day_end().format("%H:%M"));
        lines.push(format!("   {}", note.yellow()));
    }
}

impl Render for TimetableView {
    fn render(&self) -> String {
        let mut lines = Vec::new();

        let codes: Vec<&str> = self.modules.iter().map(|m| m.code.as_str()).collect();
        let slot = format!("{} min slots", self.increment().num_minutes());
        lines.push(format!("{} {}", codes.join(", ").bold(), slot.dimmed()));

        for day in &self.days {
            lines.push(String::new());
            let name = day_name(day.day);
            if self.current_day == Some(day.day) {
                lines.push(format!("{} {}", name.bold(), "(today)".green()));
            } else {
                lines.push(name.bold().to_string());
            }
            render_day(self, &day.grid, &mut lines);
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveTime, Weekday};
    use timetable_core::view::ViewOptions;
    use timetable_core::{Lecture, Module, WeekRange};

    use super::*;

    fn module(code: &str, day: Weekday, start: (u32, u32), end: (u32, u32)) -> Module {
        Module {
            code: code.to_string(),
            name: None,
            weeks: None,
            lectures: vec![Lecture {
                activity: "Lecture".to_string(),
                day,
                start: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
                end: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
                room: Some("B.1.01".to_string()),
                staff: None,
                weeks: vec![WeekRange::new(1, 10).unwrap()],
            }],
        }
    }

    #[test]
    fn test_render_lists_lectures_per_day() {
        let modules = vec![
            module("CS101", Weekday::Mon, (9, 15), (10, 15)),
            module("MA201", Weekday::Mon, (9, 15), (10, 15)),
        ];
        let view = TimetableView::build(&modules, &ViewOptions::default(), Weekday::Mon).unwrap();
        let out = view.render();

        assert!(out.contains("Monday"));
        assert!(out.contains("(today)"));
        assert!(out.contains("CS101 Lecture"));
        assert!(out.contains("MA201 Lecture"));
        assert!(out.contains("B.1.01"));
        assert_eq!(out.matches("09:15").count(), 3);
        assert_eq!(out.matches("No lectures").count(), 4);
    }

    #[test]
    fn test_palette_colours_map_to_ansi() {
        assert_eq!(ansi_for("lightblue"), AnsiColors::BrightBlue);
        assert_eq!(ansi_for(FLAT_COLOUR), AnsiColors::White);
    }
}
