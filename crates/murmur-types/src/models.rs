use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub image: String,
}

/// A user-authored comment. `parent_id` points at the comment this one
/// replies to; threads are rebuilt by clients from that link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub user_id: i64,
    pub parent_id: Option<i64>,
}

/// Input for creating a comment, after the HTTP layer has validated it.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub content: String,
    pub user_id: i64,
    pub parent_id: Option<i64>,
}
