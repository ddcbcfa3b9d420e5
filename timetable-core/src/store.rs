//! File-backed timetable store.
//!
//! Every department lives in its own `<slug>.toml` file inside the data
//! directory. Re-importing a department replaces its file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{TimetableError, TimetableResult};
use crate::model::{Department, Module};

#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    /// Open the store at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> TimetableResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            TimetableError::Store(format!("Could not create {}: {e}", dir.display()))
        })?;
        Ok(Store { dir })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    fn department_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.toml", slug::slugify(name)))
    }

    /// All departments, sorted by name. Unreadable files are skipped.
    pub fn departments(&self) -> TimetableResult<Vec<Department>> {
        let entries = std::fs::read_dir(&self.dir)?;

        let mut departments: Vec<Department> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|e| e == "toml"))
            .filter_map(|path| match load_department(&path) {
                Ok(dept) => Some(dept),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable department file");
                    None
                }
            })
            .collect();

        departments.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(departments)
    }

    pub fn department(&self, name: &str) -> TimetableResult<Department> {
        let path = self.department_path(name);
        if !path.exists() {
            return Err(TimetableError::DepartmentNotFound(name.to_string()));
        }
        let dept = load_department(&path)?;
        if dept.name != name {
            return Err(TimetableError::DepartmentNotFound(name.to_string()));
        }
        Ok(dept)
    }

    /// Modules matching `codes`, in the order requested.
    ///
    /// Unknown codes are skipped and repeated codes collapse to one module.
    pub fn modules_by_codes<S: AsRef<str>>(&self, codes: &[S]) -> TimetableResult<Vec<Module>> {
        let wanted: Vec<&str> = codes
            .iter()
            .map(|c| c.as_ref().trim())
            .filter(|c| !c.is_empty())
            .collect();
        if wanted.is_empty() {
            return Ok(Vec::new());
        }

        let all: Vec<Module> = self
            .departments()?
            .into_iter()
            .flat_map(|d| d.modules)
            .collect();

        let mut seen = HashSet::new();
        let modules: Vec<Module> = wanted
            .into_iter()
            .filter(|code| seen.insert(*code))
            .filter_map(|code| all.iter().find(|m| m.code == code).cloned())
            .collect();

        Ok(modules)
    }

    /// Write `dept`, replacing an earlier import of the same department.
    ///
    /// Fails when the file is already taken by a different department whose
    /// name slugifies the same way.
    pub fn save_department(&self, dept: &Department) -> TimetableResult<()> {
        let path = self.department_path(&dept.name);
        if path.exists() {
            if let Ok(existing) = load_department(&path) {
                if existing.name != dept.name {
                    return Err(TimetableError::Store(format!(
                        "'{}' would overwrite department '{}' stored in {}",
                        dept.name,
                        existing.name,
                        path.display()
                    )));
                }
            }
        }
        let content = toml::to_string_pretty(dept)
            .map_err(|e| TimetableError::Store(format!("Could not serialize {}: {e}", dept.name)))?;

        std::fs::write(&path, content)?;

        tracing::info!(
            department = %dept.name,
            path = %path.display(),
            modules = dept.modules.len(),
            "Saved department"
        );
        Ok(())
    }

    pub fn remove_department(&self, name: &str) -> TimetableResult<()> {
        let path = self.department_path(name);
        if !path.exists() {
            return Err(TimetableError::DepartmentNotFound(name.to_string()));
        }
        std::fs::remove_file(&path)?;
        Ok(())
    }
}

fn load_department(path: &Path) -> TimetableResult<Department> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| TimetableError::Store(format!("Could not read {}: {e}", path.display())))
}
