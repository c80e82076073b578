pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::document::handlers as documents;
use crate::interchange::handlers as interchange;
use crate::models::{ApplicationProfile, CareerEntry, HistoryEntry, QualificationEntry};
use crate::records::handlers as records;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Profile
        .route(
            "/api/v1/profile",
            get(records::handle_get_profile)
                .put(records::handle_put_profile)
                .delete(records::handle_reset_profile),
        )
        .route("/api/v1/data", delete(records::handle_reset_all))
        // History
        .route(
            "/api/v1/history",
            get(records::handle_list::<HistoryEntry>).post(records::handle_create::<HistoryEntry>),
        )
        .route(
            "/api/v1/history/:id",
            put(records::handle_update::<HistoryEntry>)
                .delete(records::handle_delete::<HistoryEntry>),
        )
        .route(
            "/api/v1/history/:id/move",
            post(records::handle_move::<HistoryEntry>),
        )
        // Career
        .route(
            "/api/v1/career",
            get(records::handle_list::<CareerEntry>).post(records::handle_create::<CareerEntry>),
        )
        .route(
            "/api/v1/career/:id",
            put(records::handle_update::<CareerEntry>)
                .delete(records::handle_delete::<CareerEntry>),
        )
        .route(
            "/api/v1/career/:id/move",
            post(records::handle_move::<CareerEntry>),
        )
        // Qualifications
        .route(
            "/api/v1/qualifications",
            get(records::handle_list::<QualificationEntry>)
                .post(records::handle_create::<QualificationEntry>),
        )
        .route(
            "/api/v1/qualifications/:id",
            put(records::handle_update::<QualificationEntry>)
                .delete(records::handle_delete::<QualificationEntry>),
        )
        .route(
            "/api/v1/qualifications/:id/move",
            post(records::handle_move::<QualificationEntry>),
        )
        // Application profiles
        .route(
            "/api/v1/applications",
            get(records::handle_list::<ApplicationProfile>)
                .post(records::handle_create_application),
        )
        .route(
            "/api/v1/applications/:id",
            get(records::handle_get_application)
                .put(records::handle_update::<ApplicationProfile>)
                .delete(records::handle_delete::<ApplicationProfile>),
        )
        .route(
            "/api/v1/applications/:id/copy",
            post(records::handle_copy_application),
        )
        // Settings
        .route(
            "/api/v1/settings/pagination",
            get(records::handle_get_settings).put(records::handle_put_settings),
        )
        // Documents
        .route("/api/v1/documents/preview", post(documents::handle_preview))
        .route("/api/v1/documents/export", post(documents::handle_export))
        // Interchange
        .route("/api/v1/export/json", get(interchange::handle_export_json))
        .route("/api/v1/import/json", post(interchange::handle_import_json))
        .route(
            "/api/v1/export/csv/:collection",
            get(interchange::handle_export_csv),
        )
        .route(
            "/api/v1/import/csv/:collection",
            post(interchange::handle_import_csv),
        )
        .with_state(state)
}
