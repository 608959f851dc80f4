//! Defines the console's routes.
//!
//! ## Structure
//! - **Views**
//!   - `GET  /` -> form index
//!   - `GET  /list_s3?bucket_name=...` -> bucket contents
//!
//! - **Form endpoints** (all POST, redirect on success)
//!   - `/create_bucket`, `/delete_bucket`
//!   - `/create_folder`, `/delete_folder`
//!   - `/upload_file`, `/delete_file`, `/delete_object`, `/move_file`
//!
//! Unmatched paths fall through to the static 404 error page.

use crate::{
    handlers::{
        console_handlers::{
            create_bucket, create_folder, delete_bucket, delete_file, delete_folder,
            delete_object, index, list_objects, move_file, not_found, upload_file,
        },
        health_handlers::{healthz, readyz},
    },
    services::storage_service::StorageService,
};
use axum::{
    Router,
    routing::{get, post},
};

/// Build and return the router for all console routes.
///
/// The router carries shared state (`StorageService`) to all handlers.
pub fn routes() -> Router<StorageService> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // views
        .route("/", get(index))
        .route("/list_s3", get(list_objects))
        // bucket operations
        .route("/create_bucket", post(create_bucket))
        .route("/delete_bucket", post(delete_bucket))
        // folder operations
        .route("/create_folder", post(create_folder))
        .route("/delete_folder", post(delete_folder))
        // object operations
        .route("/upload_file", post(upload_file))
        .route("/delete_file", post(delete_file))
        .route("/delete_object", post(delete_object))
        .route("/move_file", post(move_file))
        .fallback(not_found)
}
