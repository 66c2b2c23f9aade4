use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use tracing::{debug, info};

use murmur_types::api::{CreateCommentRequest, UpdateCommentRequest};
use murmur_types::models::NewComment;

use crate::validation::{required, required_text};
use crate::{ApiError, AppState, run_store};

type CommentId = WithRejection<Path<i64>, ApiError>;

pub async fn list_comments(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let comments = run_store(&state, "list_comments", |store| store.list_comments()).await?;

    debug!(count = comments.len(), "GET /api/comments -> {:?}", comments);
    Ok(Json(comments))
}

pub async fn get_comment(
    State(state): State<AppState>,
    WithRejection(Path(id), _): CommentId,
) -> Result<impl IntoResponse, ApiError> {
    let comment = run_store(&state, "get_comment", move |store| store.get_comment(id)).await?;

    debug!("GET /api/comments/{} -> {:?}", id, comment);
    Ok(Json(comment))
}

pub async fn create_comment(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<CreateCommentRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    debug!("POST /api/comments <- {:?}", req);

    let new = NewComment {
        content: required_text("create_comment", "content", req.content)?,
        user_id: required("create_comment", "userId", req.user_id)?,
        parent_id: req.parent_id,
    };

    let comment = run_store(&state, "create_comment", move |store| store.create_comment(new)).await?;

    info!(
        "Comment {} created by user {} (parent {:?})",
        comment.id, comment.user_id, comment.parent_id
    );
    debug!("POST /api/comments -> {:?}", comment);
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn update_comment(
    State(state): State<AppState>,
    WithRejection(Path(id), _): CommentId,
    WithRejection(Json(req), _): WithRejection<Json<UpdateCommentRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    debug!("PUT /api/comments/{} <- {:?}", id, req);

    let content = required_text("update_comment", "content", req.content)?;

    let comment = run_store(&state, "update_comment", move |store| {
        store.update_comment(id, &content)
    })
    .await?;

    debug!("PUT /api/comments/{} -> {:?}", id, comment);
    Ok(Json(comment))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    WithRejection(Path(id), _): CommentId,
) -> Result<impl IntoResponse, ApiError> {
    let removed = run_store(&state, "delete_comment", move |store| store.delete_comment(id)).await?;

    info!("Comment {} deleted", removed.id);
    debug!("DELETE /api/comments/{} -> {:?}", id, removed);
    Ok(StatusCode::NO_CONTENT)
}
