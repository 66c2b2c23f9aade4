pub mod comments;
pub mod error;
pub mod users;

mod validation;

use std::sync::Arc;

use axum::{Json, Router, response::IntoResponse, routing::get};
use tracing::{error, warn};

use murmur_db::{CommentStore, StoreError};

pub use error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: Box<dyn CommentStore>,
    /// Identity served by `/api/current-user`; there is no session system.
    pub current_user_id: i64,
}

impl AppStateInner {
    pub fn new(store: Box<dyn CommentStore>, current_user_id: i64) -> AppState {
        Arc::new(Self {
            store,
            current_user_id,
        })
    }
}

/// All API routes. Layers (CORS, tracing) are added by the binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route("/api/current-user", get(users::current_user))
        .route(
            "/api/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/api/comments/{id}",
            get(comments::get_comment)
                .put(comments::update_comment)
                .delete(comments::delete_comment),
        )
        .route("/health", get(health))
        .with_state(state)
}

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Run a store operation off the async runtime and translate its failure.
/// `op` names the operation in the log line.
pub(crate) async fn run_store<F, T>(state: &AppState, op: &'static str, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&dyn CommentStore) -> murmur_db::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(state.store.as_ref()))
        .await
        .map_err(|e| {
            error!("{}: spawn_blocking join error: {}", op, e);
            ApiError::Internal
        })?
        .map_err(|e| {
            match &e {
                StoreError::StorageUnavailable(_) => error!("{} failed: {}", op, e),
                _ => warn!("{} rejected: {}", op, e),
            }
            ApiError::from(e)
        })
}
