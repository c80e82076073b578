use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Local;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::{ApplicationProfile, PaginationOptions, Profile};
use crate::records::ordering::{next_order, plan_move, Direction, Sequenced};
use crate::records::{repo, Record};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Profile
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
) -> Result<Json<Profile>, AppError> {
    let profile = repo::load_profile(state.store.as_ref())
        .await?
        .unwrap_or_default();
    Ok(Json(profile))
}

/// PUT /api/v1/profile
pub async fn handle_put_profile(
    State(state): State<AppState>,
    Json(profile): Json<Profile>,
) -> Result<Json<Profile>, AppError> {
    repo::save_profile(state.store.as_ref(), &profile).await?;
    Ok(Json(profile))
}

/// DELETE /api/v1/data
///
/// Clears the profile and every record collection.
pub async fn handle_reset_all(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    repo::reset_all(state.store.as_ref()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/profile
pub async fn handle_reset_profile(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    repo::reset_profile(state.store.as_ref()).await?;
    info!("Profile reset");
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Ordered collections (history, career, qualifications)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct MoveRequest {
    pub direction: Direction,
}

/// GET /api/v1/{history,career,qualifications}
pub async fn handle_list<T: Record>(State(state): State<AppState>) -> Result<Json<Vec<T>>, AppError> {
    Ok(Json(repo::load_all(state.store.as_ref()).await?))
}

/// POST /api/v1/{history,career,qualifications}
///
/// Appends the record at the end of its group; the id and order in the body are ignored.
pub async fn handle_create<T: Sequenced>(
    State(state): State<AppState>,
    Json(record): Json<T>,
) -> Result<(StatusCode, Json<T>), AppError> {
    let saved = repo::insert(state.store.as_ref(), record, |record, existing| {
        let order = next_order(existing, record);
        record.set_order(order);
    })
    .await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// PUT /api/v1/{history,career,qualifications,applications}/:id
pub async fn handle_update<T: Record>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(mut record): Json<T>,
) -> Result<Json<T>, AppError> {
    let store = state.store.as_ref();
    if repo::load_one::<T>(store, id).await?.is_none() {
        return Err(not_found::<T>(id));
    }
    record.set_id(id);
    Ok(Json(repo::save(store, record).await?))
}

/// DELETE /api/v1/{history,career,qualifications,applications}/:id
pub async fn handle_delete<T: Record>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !repo::delete::<T>(state.store.as_ref(), id).await? {
        return Err(not_found::<T>(id));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/{history,career,qualifications}/:id/move
///
/// Returns the whole collection in its new order.
pub async fn handle_move<T: Sequenced + Clone>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<Vec<T>>, AppError> {
    let store = state.store.as_ref();
    let records: Vec<T> = repo::load_all(store).await?;
    let changed = plan_move(&records, id, req.direction).ok_or_else(|| not_found::<T>(id))?;
    for record in changed {
        repo::save(store, record).await?;
    }
    Ok(Json(repo::load_all(store).await?))
}

// ────────────────────────────────────────────────────────────────────────────
// Application profiles
// ────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationRequest {
    pub company_name: String,
}

/// POST /api/v1/applications
pub async fn handle_create_application(
    State(state): State<AppState>,
    Json(req): Json<CreateApplicationRequest>,
) -> Result<(StatusCode, Json<ApplicationProfile>), AppError> {
    let name = req.company_name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("companyName must not be blank".to_string()));
    }
    let app = ApplicationProfile::new(name, Local::now().date_naive());
    let saved = repo::save(state.store.as_ref(), app).await?;
    info!("Created application profile {} for {}", saved.id, saved.company_name);
    Ok((StatusCode::CREATED, Json(saved)))
}

/// GET /api/v1/applications/:id
pub async fn handle_get_application(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApplicationProfile>, AppError> {
    repo::load_one(state.store.as_ref(), id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found::<ApplicationProfile>(id))
}

/// POST /api/v1/applications/:id/copy
pub async fn handle_copy_application(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<ApplicationProfile>), AppError> {
    let store = state.store.as_ref();
    let source: ApplicationProfile = repo::load_one(store, id)
        .await?
        .ok_or_else(|| not_found::<ApplicationProfile>(id))?;
    let copy = repo::save(store, source.duplicate()).await?;
    Ok((StatusCode::CREATED, Json(copy)))
}

// ────────────────────────────────────────────────────────────────────────────
// Settings
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/settings
pub async fn handle_get_settings(
    State(state): State<AppState>,
) -> Result<Json<PaginationOptions>, AppError> {
    Ok(Json(repo::load_settings(state.store.as_ref()).await?))
}

/// PUT /api/v1/settings
pub async fn handle_put_settings(
    State(state): State<AppState>,
    Json(options): Json<PaginationOptions>,
) -> Result<Json<PaginationOptions>, AppError> {
    let options = options.normalized();
    repo::save_settings(state.store.as_ref(), &options).await?;
    Ok(Json(options))
}

fn not_found<T: Record>(id: i64) -> AppError {
    AppError::NotFound(format!("{} record {id} not found", T::COLLECTION))
}
