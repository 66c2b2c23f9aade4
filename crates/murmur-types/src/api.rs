use serde::{Deserialize, Serialize};

// Required fields are `Option` so a missing field reaches the handler's
// validation (400 with a message) instead of failing inside the extractor.

// -- Users --

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub image: Option<String>,
}

// -- Comments --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub content: Option<String>,
    pub user_id: Option<i64>,
    #[serde(default)]
    pub parent_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    pub content: Option<String>,
}

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
