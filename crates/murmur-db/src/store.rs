use chrono::{DateTime, SubsecRound, Utc};
use murmur_types::models::{Comment, NewComment, User};

use crate::error::{Result, StoreError};

/// Owner of the user and comment records.
///
/// Operations are synchronous; async callers run them on a blocking task.
/// Implementations must assign strictly increasing ids even when called
/// from several threads at once, and must never hand out a deleted
/// comment's id again.
pub trait CommentStore: Send + Sync {
    /// All users, ascending by id.
    fn list_users(&self) -> Result<Vec<User>>;

    fn get_user(&self, id: i64) -> Result<User>;

    /// Fails with `InvalidInput` when `name` or `image` is empty.
    fn create_user(&self, name: &str, image: &str) -> Result<User>;

    /// All comments, ascending by id (creation order, not thread order).
    fn list_comments(&self) -> Result<Vec<Comment>>;

    fn get_comment(&self, id: i64) -> Result<Comment>;

    /// Assigns a fresh id and the current timestamp. The author and the
    /// parent (when given) must already exist.
    fn create_comment(&self, new: NewComment) -> Result<Comment>;

    /// Replaces the content only; author, parent and timestamp stay as
    /// they were.
    fn update_comment(&self, id: i64, content: &str) -> Result<Comment>;

    /// Hard-deletes the comment and returns it. Replies keep their
    /// `parent_id` pointing at the removed id.
    fn delete_comment(&self, id: i64) -> Result<Comment>;

    /// Inserts the demo dataset. Safe to run repeatedly.
    fn seed(&self) -> Result<SeedReport>;

    /// Removes the highest-id user and rewinds the user id counter so the
    /// next created user gets that id again. `None` when there are no users.
    fn remove_latest_user(&self) -> Result<Option<User>>;
}

/// Rows written by [`CommentStore::seed`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub comments: usize,
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(StoreError::InvalidInput(format!("{} is required", field)));
    }
    Ok(())
}

/// Current time at millisecond precision, which is what survives a round
/// trip through the SQLite text column.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
