//! Database row types. These map directly to SQLite rows and are
//! converted into murmur-types models before leaving the crate.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use murmur_types::models::{Comment, User};
use rusqlite::Row;
use tracing::warn;

pub const USER_COLUMNS: &str = "id, name, image";
pub const COMMENT_COLUMNS: &str = "id, content, user_id, parent_id, created_at";

pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub image: String,
}

impl UserRow {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            image: row.get(2)?,
        })
    }
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            image: row.image,
        }
    }
}

pub struct CommentRow {
    pub id: i64,
    pub content: String,
    pub user_id: i64,
    pub parent_id: Option<i64>,
    pub created_at: String,
}

impl CommentRow {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            content: row.get(1)?,
            user_id: row.get(2)?,
            parent_id: row.get(3)?,
            created_at: row.get(4)?,
        })
    }
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        let created_at = parse_timestamp(&row.created_at).unwrap_or_else(|| {
            warn!("Corrupt created_at '{}' on comment {}", row.created_at, row.id);
            DateTime::default()
        });

        Comment {
            id: row.id,
            content: row.content,
            created_at,
            user_id: row.user_id,
            parent_id: row.parent_id,
        }
    }
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Accepts RFC 3339 (what the store writes) and SQLite's own
/// `datetime('now')` format, which has no timezone and is UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|ndt| ndt.and_utc())
        })
}
