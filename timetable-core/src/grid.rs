//! Day grid layout.
//!
//! A day's lectures are packed into rows of time-slot cells so that no two
//! lectures in one row overlap. Packing is first-fit: each lecture goes into
//! the first row (in creation order) that is free at its start slot, and a
//! new row is appended only when none is. Row identity is stable between
//! renders of the same input. Since slots are visited in ascending order,
//! the row count equals the largest number of lectures covering one slot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Lecture, Module};
use crate::time_slots::{format_label, TimeSlots};

/// The module a lecture belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleRef {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl From<&Module> for ModuleRef {
    fn from(module: &Module) -> Self {
        ModuleRef {
            code: module.code.clone(),
            name: module.name.clone(),
        }
    }
}

/// A lecture together with its owning module, as fed to the layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LectureEntry {
    pub module: ModuleRef,
    pub lecture: Lecture,
}

impl LectureEntry {
    pub fn new(module: &Module, lecture: &Lecture) -> Self {
        LectureEntry {
            module: module.into(),
            lecture: lecture.clone(),
        }
    }
}

/// One cell of a row. Entry ids index into [`DayGrid::entries`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    /// The entry starts in this slot
    Start(usize),
    /// The slot is covered by an entry that started earlier in the row
    Continuation(usize),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn entry_id(&self) -> Option<usize> {
        match self {
            Cell::Empty => None,
            Cell::Start(id) | Cell::Continuation(id) => Some(*id),
        }
    }
}

/// A row of cells, one per time slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    cells: Vec<Cell>,
    lecture_count: usize,
}

impl Row {
    fn new(len: usize) -> Self {
        Row {
            cells: vec![Cell::Empty; len],
            lecture_count: 0,
        }
    }

    fn is_free(&self, index: usize) -> bool {
        self.cells[index].is_empty()
    }

    /// Occupy `index` and the following `span - 1` cells, clamped to the row.
    /// Returns the number of cells taken.
    fn place(&mut self, index: usize, entry_id: usize, span: i64) -> usize {
        self.cells[index] = Cell::Start(entry_id);
        self.lecture_count += 1;

        let end = if span > 1 {
            index.saturating_add(span as usize).min(self.cells.len())
        } else {
            index + 1
        };

        for cell in &mut self.cells[index + 1..end] {
            if cell.is_empty() {
                *cell = Cell::Continuation(entry_id);
            }
        }

        end - index
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Cell {
        self.cells[index]
    }

    /// Number of lectures starting in this row.
    pub fn lecture_count(&self) -> usize {
        self.lecture_count
    }
}

/// Where an entry ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub row: usize,
    pub index: usize,
    /// Cells covered, including the start cell
    pub span: usize,
}

/// A lecture starting at a flattened slot.
#[derive(Debug, Clone, Copy)]
pub struct FlatCell<'a> {
    pub row: usize,
    pub entry_id: usize,
    pub span: usize,
    pub entry: &'a LectureEntry,
}

/// All lectures starting at one slot, across rows.
#[derive(Debug, Clone)]
pub struct FlatRow<'a> {
    pub index: usize,
    pub label: String,
    pub cells: Vec<FlatCell<'a>>,
}

/// The laid-out lectures of a single day.
///
/// Rows are computed once in [`DayGrid::layout`] and never change afterwards.
#[derive(Debug, Clone)]
pub struct DayGrid {
    slots: TimeSlots,
    entries: Vec<LectureEntry>,
    placements: Vec<Option<Placement>>,
    rows: Vec<Row>,
}

impl DayGrid {
    /// Lay out `entries` over `slots`.
    ///
    /// Entries sharing a start slot are placed in the order given. Entries
    /// starting outside the slot window are kept but not placed; see
    /// [`DayGrid::unplaced`].
    pub fn layout(entries: Vec<LectureEntry>, slots: TimeSlots) -> Self {
        let increment = slots.increment();

        let mut by_index: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (id, entry) in entries.iter().enumerate() {
            match slots.index_of(entry.lecture.start) {
                Some(index) => by_index.entry(index).or_default().push(id),
                None => tracing::warn!(
                    module = %entry.module.code,
                    activity = %entry.lecture.activity,
                    start = %entry.lecture.start.format("%H:%M"),
                    "Lecture starts outside the day window, not placed"
                ),
            }
        }

        let mut rows = vec![Row::new(slots.len())];
        let mut placements = vec![None; entries.len()];

        for (index, ids) in by_index {
            for id in ids {
                let span = entries[id].lecture.col_span(increment);

                let row = match rows.iter().position(|r| r.is_free(index)) {
                    Some(row) => row,
                    None => {
                        rows.push(Row::new(slots.len()));
                        rows.len() - 1
                    }
                };

                let covered = rows[row].place(index, id, span);
                placements[id] = Some(Placement {
                    row,
                    index,
                    span: covered,
                });
            }
        }

        tracing::debug!(
            entries = entries.len(),
            rows = rows.len(),
            increment = increment.num_seconds(),
            "Laid out day grid"
        );

        DayGrid {
            slots,
            entries,
            placements,
            rows,
        }
    }

    pub fn slots(&self) -> &TimeSlots {
        &self.slots
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn entries(&self) -> &[LectureEntry] {
        &self.entries
    }

    pub fn placement(&self, entry_id: usize) -> Option<Placement> {
        self.placements.get(entry_id).copied().flatten()
    }

    /// Entries that could not be placed because they start outside the day.
    pub fn unplaced(&self) -> impl Iterator<Item = &LectureEntry> {
        self.entries
            .iter()
            .zip(&self.placements)
            .filter(|(_, p)| p.is_none())
            .map(|(e, _)| e)
    }

    pub fn has_lessons(&self) -> bool {
        self.rows
            .iter()
            .any(|row| row.cells.iter().any(|c| !c.is_empty()))
    }

    /// Number of placed lectures (continuation cells are not counted).
    pub fn lesson_count(&self) -> usize {
        self.rows.iter().map(Row::lecture_count).sum()
    }

    /// Slots where at least one lecture starts, ascending, with the lectures
    /// starting there in row order.
    pub fn flatten_rows(&self) -> impl Iterator<Item = FlatRow<'_>> {
        self.slots.times().iter().enumerate().filter_map(|(index, time)| {
            let cells: Vec<FlatCell<'_>> = self
                .rows
                .iter()
                .enumerate()
                .filter_map(|(row, r)| match r.cell(index) {
                    Cell::Start(id) => Some(FlatCell {
                        row,
                        entry_id: id,
                        span: self.placements[id].map(|p| p.span).unwrap_or(1),
                        entry: &self.entries[id],
                    }),
                    _ => None,
                })
                .collect();

            if cells.is_empty() {
                None
            } else {
                Some(FlatRow {
                    index,
                    label: format_label(*time),
                    cells,
                })
            }
        })
    }
}
