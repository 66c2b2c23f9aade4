use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::WithRejection;
use tracing::debug;

use murmur_types::api::CreateUserRequest;

use crate::validation::required_text;
use crate::{ApiError, AppState, run_store};

pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let users = run_store(&state, "list_users", |store| store.list_users()).await?;

    debug!(count = users.len(), "GET /api/users -> {:?}", users);
    Ok(Json(users))
}

pub async fn create_user(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<CreateUserRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    debug!("POST /api/users <- {:?}", req);

    let name = required_text("create_user", "name", req.name)?;
    let image = required_text("create_user", "image", req.image)?;

    let user = run_store(&state, "create_user", move |store| {
        store.create_user(&name, &image)
    })
    .await?;

    debug!("POST /api/users -> {:?}", user);
    Ok((StatusCode::CREATED, Json(user)))
}

/// The fixed identity the front end posts as.
pub async fn current_user(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let id = state.current_user_id;
    let user = run_store(&state, "current_user", move |store| store.get_user(id)).await?;

    debug!("GET /api/current-user -> {:?}", user);
    Ok(Json(user))
}
