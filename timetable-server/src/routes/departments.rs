use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use timetable_core::grid::ModuleRef;

use super::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DepartmentInfo {
    pub name: String,
    pub module_count: usize,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/departments", get(list_departments))
        .route("/departments/{name}/modules", get(list_modules))
}

async fn list_departments(State(state): State<AppState>) -> Result<Json<Vec<DepartmentInfo>>, AppError> {
    let departments = state.store().departments()?;

    let infos = departments
        .into_iter()
        .map(|d| DepartmentInfo {
            module_count: d.modules.len(),
            name: d.name,
        })
        .collect();

    Ok(Json(infos))
}

async fn list_modules(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<ModuleRef>>, AppError> {
    let department = state.store().department(&name)?;
    let modules = department.modules.iter().map(ModuleRef::from).collect();
    Ok(Json(modules))
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use super::*;
    use crate::state::fixtures;

    #[tokio::test]
    async fn test_list_departments() {
        let (_dir, state) = fixtures::state(None);
        let Json(infos) = list_departments(State(state)).await.unwrap();

        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].name, "Computing");
        assert_eq!(infos[0].module_count, 2);
    }

    #[tokio::test]
    async fn test_list_modules() {
        let (_dir, state) = fixtures::state(None);
        let Json(modules) = list_modules(State(state), Path("Computing".to_string()))
            .await
            .unwrap();

        let codes: Vec<_> = modules.iter().map(|m| m.code.as_str()).collect();
        assert_eq!(codes, vec!["CS101", "CS102"]);
        assert_eq!(modules[0].name.as_deref(), Some("Programming"));
    }

    #[tokio::test]
    async fn test_unknown_department_is_404() {
        let (_dir, state) = fixtures::state(None);
        let err = list_modules(State(state), Path("History".to_string()))
            .await
            .unwrap_err();

        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
