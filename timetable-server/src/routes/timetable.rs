//! Timetable grid and calendar export for a set of modules.

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use timetable_core::constants::FLAT_COLOUR;
use timetable_core::grid::{Cell, DayGrid, ModuleRef};
use timetable_core::ics::generate_calendar;
use timetable_core::model::{day_name, Module};
use timetable_core::recurrence::expand_modules;
use timetable_core::view::TimetableView;

use super::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct TimetableQuery {
    /// Comma separated module codes
    #[serde(default)]
    pub modules: Option<String>,
}

impl TimetableQuery {
    fn codes(&self) -> Vec<&str> {
        self.modules
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct TimetableResponse {
    pub modules: Vec<ModuleRef>,
    pub increment_minutes: i64,
    /// Start time label of every column
    pub columns: Vec<String>,
    pub current_day: Option<&'static str>,
    pub has_lessons: bool,
    pub days: Vec<DayResponse>,
}

#[derive(Debug, Serialize)]
pub struct DayResponse {
    pub day: &'static str,
    pub has_lessons: bool,
    pub rows: Vec<Vec<CellResponse>>,
    /// Lectures starting outside the day window
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unplaced: Vec<String>,
}

/// A rendered cell. Continuation slots are folded into the lecture's colspan.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CellResponse {
    Empty,
    Lecture(LectureCell),
}

#[derive(Debug, Serialize)]
pub struct LectureCell {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub activity: String,
    pub start: String,
    pub end: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff: Option<String>,
    pub weeks: String,
    pub colour: &'static str,
    pub colspan: usize,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/timetable", get(get_timetable))
        .route("/timetable.ics", get(get_timetable_ics))
}

fn selected_modules(state: &AppState, query: &TimetableQuery) -> Result<Vec<Module>, AppError> {
    Ok(state.store().modules_by_codes(&query.codes())?)
}

fn day_rows(view: &TimetableView, grid: &DayGrid) -> Vec<Vec<CellResponse>> {
    grid.rows()
        .iter()
        .map(|row| {
            row.cells()
                .iter()
                .filter_map(|cell| match *cell {
                    Cell::Empty => Some(CellResponse::Empty),
                    Cell::Continuation(_) => None,
                    Cell::Start(id) => {
                        let entry = &grid.entries()[id];
                        let lecture = &entry.lecture;
                        Some(CellResponse::Lecture(LectureCell {
                            code: entry.module.code.clone(),
                            name: entry.module.name.clone(),
                            activity: lecture.activity.clone(),
                            start: lecture.start.format("%H:%M").to_string(),
                            end: lecture.end.format("%H:%M").to_string(),
                            room: lecture.room.clone(),
                            staff: lecture.staff.clone(),
                            weeks: lecture.weeks_label(),
                            colour: view.colour_of(&entry.module.code).unwrap_or(FLAT_COLOUR),
                            colspan: grid.placement(id).map(|p| p.span).unwrap_or(1),
                        }))
                    }
                })
                .collect()
        })
        .collect()
}

impl From<&TimetableView> for TimetableResponse {
    fn from(view: &TimetableView) -> Self {
        let days = view
            .days
            .iter()
            .map(|d| DayResponse {
                day: day_name(d.day),
                has_lessons: d.grid.has_lessons(),
                rows: day_rows(view, &d.grid),
                unplaced: d
                    .grid
                    .unplaced()
                    .map(|e| format!("{} {}", e.module.code, e.lecture.activity))
                    .collect(),
            })
            .collect();

        TimetableResponse {
            modules: view.modules.clone(),
            increment_minutes: view.increment().num_minutes(),
            columns: view.slots.labels(),
            current_day: view.current_day.map(day_name),
            has_lessons: view.has_lessons(),
            days,
        }
    }
}

async fn get_timetable(
    State(state): State<AppState>,
    Query(query): Query<TimetableQuery>,
) -> Result<Json<TimetableResponse>, AppError> {
    let modules = selected_modules(&state, &query)?;
    let options = state.view_options()?;
    let view = TimetableView::build(&modules, &options, Local::now().weekday())?;

    tracing::debug!(
        modules = modules.len(),
        lessons = view.lesson_count(),
        "Built timetable"
    );

    Ok(Json(TimetableResponse::from(&view)))
}

async fn get_timetable_ics(
    State(state): State<AppState>,
    Query(query): Query<TimetableQuery>,
) -> Result<impl IntoResponse, AppError> {
    let modules = selected_modules(&state, &query)?;
    let anchor = state.config().term_start_date()?;
    let events = expand_modules(&modules, anchor)?;
    let body = generate_calendar(&events)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"timetable.ics\""),
        ],
        body,
    ))
}
