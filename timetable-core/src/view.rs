//! A week of day grids for a set of modules.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveTime, Weekday};

use crate::colour::ColourPicker;
use crate::constants::{DEFAULT_INCREMENT_MINUTES, TEACHING_DAYS};
use crate::error::TimetableResult;
use crate::grid::{DayGrid, LectureEntry, ModuleRef};
use crate::increment::select_increment;
use crate::model::Module;
use crate::time_slots::TimeSlots;

/// Day window and requested resolution of a view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewOptions {
    pub day_start: NaiveTime,
    pub day_end: NaiveTime,
    /// Requested increment; shrunk for short lectures
    pub increment: Duration,
}

impl Default for ViewOptions {
    fn default() -> Self {
        ViewOptions {
            day_start: NaiveTime::from_hms_opt(9, 15, 0).unwrap_or(NaiveTime::MIN),
            day_end: NaiveTime::from_hms_opt(17, 45, 0).unwrap_or(NaiveTime::MIN),
            increment: Duration::minutes(DEFAULT_INCREMENT_MINUTES),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DayView {
    pub day: Weekday,
    pub grid: DayGrid,
}

/// Everything needed to render a weekly timetable.
#[derive(Debug, Clone)]
pub struct TimetableView {
    pub modules: Vec<ModuleRef>,
    pub slots: TimeSlots,
    pub days: Vec<DayView>,
    /// Display colour per module code
    pub colours: BTreeMap<String, &'static str>,
    /// Today, when today is a teaching day
    pub current_day: Option<Weekday>,
}

impl TimetableView {
    /// Lay out `modules` Monday to Friday.
    pub fn build(modules: &[Module], options: &ViewOptions, today: Weekday) -> TimetableResult<Self> {
        let durations = modules
            .iter()
            .flat_map(|m| m.lectures.iter().map(|l| l.duration()));
        let increment = select_increment(options.increment, durations)?;
        let slots = TimeSlots::new(options.day_start, options.day_end, increment)?;

        let days = TEACHING_DAYS
            .iter()
            .map(|&day| {
                let entries: Vec<LectureEntry> = modules
                    .iter()
                    .flat_map(|module| {
                        module
                            .lectures
                            .iter()
                            .filter(move |l| l.day == day)
                            .map(move |l| LectureEntry::new(module, l))
                    })
                    .collect();

                DayView {
                    day,
                    grid: DayGrid::layout(entries, slots.clone()),
                }
            })
            .collect();

        let mut picker = ColourPicker::for_module_count(modules.len());
        let colours = modules
            .iter()
            .map(|m| (m.code.clone(), picker.colour_for(&m.code)))
            .collect();

        Ok(TimetableView {
            modules: modules.iter().map(ModuleRef::from).collect(),
            slots,
            days,
            colours,
            current_day: TEACHING_DAYS.contains(&today).then_some(today),
        })
    }

    pub fn increment(&self) -> Duration {
        self.slots.increment()
    }

    pub fn has_lessons(&self) -> bool {
        self.days.iter().any(|d| d.grid.has_lessons())
    }

    pub fn lesson_count(&self) -> usize {
        self.days.iter().map(|d| d.grid.lesson_count()).sum()
    }

    pub fn day(&self, day: Weekday) -> Option<&DayGrid> {
        self.days.iter().find(|d| d.day == day).map(|d| &d.grid)
    }

    pub fn colour_of(&self, code: &str) -> Option<&'static str> {
        self.colours.get(code).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FLAT_COLOUR;
    use crate::model::fixtures::{lecture, module};

    #[test]
    fn test_no_modules_gives_empty_grids() {
        let view = TimetableView::build(&[], &ViewOptions::default(), Weekday::Mon).unwrap();
        assert!(!view.has_lessons());
        assert_eq!(view.days.len(), 5);
        assert!(view.days.iter().all(|d| d.grid.rows().len() == 1));
        assert_eq!(view.increment(), Duration::minutes(30));
    }

    #[test]
    fn test_lectures_land_on_their_weekday() {
        let modules = vec![
            module(
                "CS101",
                vec![
                    lecture("Lecture", Weekday::Mon, "09:15", "10:15"),
                    lecture("Lab", Weekday::Wed, "14:15", "16:15"),
                ],
            ),
            module("MA201", vec![lecture("Lecture", Weekday::Mon, "09:15", "10:15")]),
        ];
        let view = TimetableView::build(&modules, &ViewOptions::default(), Weekday::Sat).unwrap();

        let monday = view.day(Weekday::Mon).unwrap();
        assert_eq!(monday.lesson_count(), 2);
        assert_eq!(monday.rows().len(), 2);
        assert_eq!(view.day(Weekday::Wed).unwrap().lesson_count(), 1);
        assert!(!view.day(Weekday::Fri).unwrap().has_lessons());
        assert_eq!(view.lesson_count(), 3);
        assert_eq!(view.current_day, None);
    }

    #[test]
    fn test_short_lecture_shrinks_increment_for_every_day() {
        let modules = vec![module(
            "CS101",
            vec![
                lecture("Tutorial", Weekday::Tue, "09:15", "09:35"),
                lecture("Lecture", Weekday::Mon, "09:15", "10:15"),
            ],
        )];
        let view = TimetableView::build(&modules, &ViewOptions::default(), Weekday::Tue).unwrap();

        assert_eq!(view.increment(), Duration::minutes(15));
        let monday = view.day(Weekday::Mon).unwrap();
        assert_eq!(monday.placement(0).unwrap().span, 4);
        assert_eq!(view.current_day, Some(Weekday::Tue));
    }

    #[test]
    fn test_colours_follow_module_count() {
        let few: Vec<Module> = (0..2).map(|i| module(&format!("M{}", i), vec![])).collect();
        let view = TimetableView::build(&few, &ViewOptions::default(), Weekday::Mon).unwrap();
        assert_eq!(view.colour_of("M0"), Some("lightsteelblue"));
        assert_eq!(view.colour_of("M1"), Some("lightseagreen"));

        let many: Vec<Module> = (0..7).map(|i| module(&format!("M{}", i), vec![])).collect();
        let view = TimetableView::build(&many, &ViewOptions::default(), Weekday::Mon).unwrap();
        assert!(view.colours.values().all(|c| *c == FLAT_COLOUR));
    }
}
