//! Import of HTML timetable spreadsheet exports.
//!
//! An export is one XHTML document per department. The direct children of
//! `<body>` form a flat sequence:
//!
//! ```text
//! <div class="header-border-args">   module header (code, teaching weeks)
//! <p><span class="labelone">Monday   day label
//! <table class="spreadsheet">        lectures of that module on that day
//! <p>...                             next day
//! <table class="spreadsheet">
//! <div class="header-border-args">   next module
//! ```
//!
//! Spreadsheet rows without a `class` attribute hold the cells Activity,
//! Description, Start, End, Weeks, Room, Staff. Everything is validated here,
//! before it reaches the store.

use std::path::Path;

use roxmltree::{Document, Node, ParsingOptions};

use crate::error::{TimetableError, TimetableResult};
use crate::model::{Department, Lecture, Module, parse_day, parse_time};
use crate::week_range::WeekRange;

const SPREADSHEET_COLUMNS: usize = 7;

/// HTML named entities seen in exports, with their code points. XML only
/// knows the five predefined ones.
const HTML_ENTITIES: [(&str, u32); 12] = [
    ("nbsp", 0xa0),
    ("ndash", 0x2013),
    ("mdash", 0x2014),
    ("lsquo", 0x2018),
    ("rsquo", 0x2019),
    ("ldquo", 0x201c),
    ("rdquo", 0x201d),
    ("hellip", 0x2026),
    ("copy", 0xa9),
    ("pound", 0xa3),
    ("eacute", 0xe9),
    ("middot", 0xb7),
];

/// A module header as found in the export.
#[derive(Debug, Clone, PartialEq)]
pub struct RawModule {
    pub code: String,
    pub weeks: String,
    /// Taken from the Description column of the module's rows
    pub name: Option<String>,
    pub days: Vec<RawDay>,
}

/// The rows listed under one day label.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDay {
    pub day: String,
    pub lectures: Vec<RawLecture>,
}

/// A spreadsheet row, still as text.
#[derive(Debug, Clone, PartialEq)]
pub struct RawLecture {
    pub activity: String,
    pub start: String,
    pub end: String,
    pub weeks: String,
    pub room: String,
    pub staff: String,
}

impl RawLecture {
    /// Turn the raw row into a [`Lecture`] held on `day`.
    pub fn validate(&self, day: &str) -> TimetableResult<Lecture> {
        let activity = self.activity.trim().to_string();
        let start = parse_time(&self.start)?;
        let end = parse_time(&self.end)?;

        if end <= start {
            return Err(TimetableError::InvalidLecture(format!(
                "'{}' ends at {} but starts at {}",
                activity,
                end.format("%H:%M"),
                start.format("%H:%M")
            )));
        }

        Ok(Lecture {
            activity,
            day: parse_day(day)?,
            start,
            end,
            room: non_blank(&self.room),
            staff: normalize_staff(&self.staff),
            weeks: WeekRange::parse_list(&self.weeks)?,
        })
    }
}

/// Read and import an export file; the department is named after the file stem.
pub fn import_file(path: &Path) -> TimetableResult<Department> {
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| TimetableError::Import(format!("Invalid file name: {}", path.display())))?;

    let html = std::fs::read_to_string(path)?;
    import_html(name, &html)
}

/// Parse and validate an export into a department.
///
/// Modules without any lectures are left out. A module code listed twice
/// keeps one module with the lectures of both listings.
pub fn import_html(department: &str, html: &str) -> TimetableResult<Department> {
    let raw_modules = parse_html(html)?;
    let mut modules: Vec<Module> = Vec::new();

    for raw in raw_modules {
        let mut lectures = Vec::new();
        for day in &raw.days {
            for lecture in &day.lectures {
                lectures.push(lecture.validate(&day.day)?);
            }
        }

        if lectures.is_empty() {
            tracing::debug!(module = %raw.code, "Skipping module without lectures");
            continue;
        }

        if let Some(existing) = modules.iter_mut().find(|m| m.code == raw.code) {
            existing.lectures.extend(lectures);
            continue;
        }

        let weeks = if raw.weeks.trim().is_empty() {
            None
        } else {
            Some(WeekRange::parse(raw.weeks.trim())?)
        };

        modules.push(Module {
            code: raw.code,
            name: raw.name,
            weeks,
            lectures,
        });
    }

    tracing::info!(
        department = department,
        modules = modules.len(),
        lectures = modules.iter().map(|m| m.lectures.len()).sum::<usize>(),
        "Imported timetable export"
    );

    Ok(Department {
        name: department.to_string(),
        modules,
    })
}

/// Parse an export into raw, unvalidated modules in document order.
pub fn parse_html(html: &str) -> TimetableResult<Vec<RawModule>> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let html = replace_html_entities(html);
    let doc = Document::parse_with_options(&html, options)
        .map_err(|e| TimetableError::Import(format!("Could not parse document: {e}")))?;

    let body = doc
        .descendants()
        .find(|n| n.has_tag_name("body"))
        .ok_or_else(|| TimetableError::Import("Document has no <body>".into()))?;

    let mut modules: Vec<RawModule> = Vec::new();
    let mut current_day: Option<String> = None;

    for node in body.children().filter(Node::is_element) {
        if has_class(node, "header-border-args") {
            modules.push(parse_module_header(node)?);
            current_day = None;
        } else if node.has_tag_name("p") {
            if let Some(label) = find_element(node, "span", "labelone") {
                current_day = Some(text_of(label));
            }
        } else if has_class(node, "spreadsheet") {
            let module = modules.last_mut().ok_or_else(|| {
                TimetableError::Import("Spreadsheet found before any module header".into())
            })?;
            let day = current_day.clone().ok_or_else(|| {
                TimetableError::Import(format!("Spreadsheet for {} has no day label", module.code))
            })?;

            let lectures = parse_spreadsheet(node, module)?;
            if lectures.is_empty() {
                continue;
            }

            match module.days.iter_mut().find(|d| d.day == day) {
                Some(existing) => existing.lectures.extend(lectures),
                None => module.days.push(RawDay { day, lectures }),
            }
        }
    }

    Ok(modules)
}

fn parse_module_header(node: Node) -> TimetableResult<RawModule> {
    let code = find_element(node, "table", "header-0-args")
        .and_then(|table| find_element(table, "span", "header-0-0-0"))
        .map(text_of)
        .filter(|code| !code.is_empty())
        .ok_or_else(|| TimetableError::Import("Module header without a module code".into()))?;

    let weeks = find_element(node, "table", "header-1-args")
        .and_then(|table| find_element(table, "span", "header-1-2-1"))
        .map(text_of)
        .unwrap_or_default();

    Ok(RawModule {
        code,
        weeks,
        name: None,
        days: Vec::new(),
    })
}

fn parse_spreadsheet(node: Node, module: &mut RawModule) -> TimetableResult<Vec<RawLecture>> {
    let mut lectures = Vec::new();

    let rows = node
        .descendants()
        .filter(|n| n.has_tag_name("tr") && n.attribute("class").is_none());

    for row in rows {
        let cells: Vec<String> = row
            .children()
            .filter(|n| n.has_tag_name("td"))
            .map(text_of)
            .collect();

        if cells.len() < SPREADSHEET_COLUMNS {
            return Err(TimetableError::Import(format!(
                "Row for {} has {} cells, expected {}",
                module.code,
                cells.len(),
                SPREADSHEET_COLUMNS
            )));
        }

        if let Some(name) = non_blank(&cells[1]) {
            module.name = Some(name);
        }

        lectures.push(RawLecture {
            activity: cells[0].clone(),
            start: cells[2].clone(),
            end: cells[3].clone(),
            weeks: cells[4].clone(),
            room: cells[5].clone(),
            staff: cells[6].clone(),
        });
    }

    Ok(lectures)
}

/// Rewrite HTML named entities as numeric references.
fn replace_html_entities(html: &str) -> String {
    HTML_ENTITIES
        .iter()
        .fold(html.to_string(), |acc, (name, code)| {
            acc.replace(&format!("&{};", name), &format!("&#{};", code))
        })
}

fn has_class(node: Node, class: &str) -> bool {
    node.attribute("class")
        .is_some_and(|c| c.split_whitespace().any(|c| c == class))
}

fn find_element<'a, 'input>(node: Node<'a, 'input>, tag: &str, class: &str) -> Option<Node<'a, 'input>> {
    node.descendants()
        .find(|n| n.has_tag_name(tag) && has_class(*n, class))
}

/// Concatenated text of a node and its descendants, trimmed. Non-breaking
/// spaces count as plain spaces.
fn text_of(node: Node) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect::<String>()
        .replace('\u{a0}', " ")
        .trim()
        .to_string()
}

fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() { None } else { Some(s.to_string()) }
}

/// Whitespace-only staff is absent; names are re-joined as `A, B`.
fn normalize_staff(staff: &str) -> Option<String> {
    non_blank(staff)?;
    let names: Vec<&str> = staff
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    Some(names.join(", "))
}
