use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::{Local, Utc};
use serde::Serialize;

use crate::document::labels::format_date_for_file;
use crate::errors::AppError;
use crate::interchange::csv::{export_csv, import_csv, CsvCollection};
use crate::interchange::json::{export_bundle, import_bundle, ImportBundle, ImportSummary};
use crate::state::AppState;

/// GET /api/v1/export/json
pub async fn handle_export_json(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let bundle = export_bundle(state.store.as_ref(), Utc::now()).await?;
    let file_name = format!(
        "resume_backup_{}.json",
        format_date_for_file(Local::now().date_naive())
    );
    Ok((
        [(header::CONTENT_DISPOSITION, attachment(&file_name))],
        Json(bundle),
    ))
}

/// POST /api/v1/import/json
pub async fn handle_import_json(
    State(state): State<AppState>,
    Json(bundle): Json<ImportBundle>,
) -> Result<Json<ImportSummary>, AppError> {
    Ok(Json(import_bundle(state.store.as_ref(), bundle).await?))
}

/// GET /api/v1/export/csv/:collection
pub async fn handle_export_csv(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let collection: CsvCollection = collection.parse()?;
    let body = export_csv(state.store.as_ref(), collection).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, attachment(&collection.file_name())),
        ],
        body,
    ))
}

#[derive(Serialize)]
pub struct CsvImportResponse {
    pub collection: &'static str,
    pub imported: usize,
}

/// POST /api/v1/import/csv/:collection
///
/// The request body is the raw CSV text.
pub async fn handle_import_csv(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    body: String,
) -> Result<Json<CsvImportResponse>, AppError> {
    let collection: CsvCollection = collection.parse()?;
    let imported = import_csv(state.store.as_ref(), collection, &body).await?;
    Ok(Json(CsvImportResponse {
        collection: collection.name(),
        imported,
    }))
}

fn attachment(file_name: &str) -> String {
    format!("attachment; filename=\"{file_name}\"")
}
