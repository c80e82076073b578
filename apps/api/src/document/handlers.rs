use axum::{extract::State, Json};
use chrono::Local;
use serde::Deserialize;

use crate::document::{
    export_documents, preview_documents, DocumentKind, DocumentPreview, ExportedDocuments,
};
use crate::errors::AppError;
use crate::layout::DocumentInput;
use crate::models::{ApplicationProfile, PaginationOptions};
use crate::records::repo;
use crate::state::AppState;

fn default_kind() -> DocumentKind {
    DocumentKind::Both
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRequest {
    /// Application profile whose free text and submission date are used.
    /// Absent → the first stored application, if any.
    pub application_id: Option<i64>,
    #[serde(default = "default_kind")]
    pub kind: DocumentKind,
    /// Overrides the saved pagination settings for this request only.
    pub options: Option<PaginationOptions>,
}

/// POST /api/v1/documents/preview
pub async fn handle_preview(
    State(state): State<AppState>,
    Json(req): Json<DocumentRequest>,
) -> Result<Json<DocumentPreview>, AppError> {
    let input = load_input(&state, &req).await?;
    Ok(Json(preview_documents(&input, req.kind)))
}

/// POST /api/v1/documents/export
pub async fn handle_export(
    State(state): State<AppState>,
    Json(req): Json<DocumentRequest>,
) -> Result<Json<ExportedDocuments>, AppError> {
    let input = load_input(&state, &req).await?;
    let exported = export_documents(
        &input,
        req.kind,
        state.renderer.as_ref(),
        &state.safe_zone,
        &state.settle,
    )
    .await?;
    Ok(Json(exported))
}

/// Snapshots every record a document set is built from.
async fn load_input(state: &AppState, req: &DocumentRequest) -> Result<DocumentInput, AppError> {
    let store = state.store.as_ref();

    let application = match req.application_id {
        Some(id) => Some(
            repo::load_one::<ApplicationProfile>(store, id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("application profile {id} not found")))?,
        ),
        None => repo::load_all::<ApplicationProfile>(store)
            .await?
            .into_iter()
            .next(),
    };
    let options = match &req.options {
        Some(options) => options.clone(),
        None => repo::load_settings(store).await?,
    };

    Ok(DocumentInput {
        profile: repo::load_profile(store).await?.unwrap_or_default(),
        history: repo::load_all(store).await?,
        career: repo::load_all(store).await?,
        qualifications: repo::load_all(store).await?,
        application,
        options,
        today: Local::now().date_naive(),
    })
}
