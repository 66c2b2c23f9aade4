use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use murmur_types::models::{Comment, NewComment, User};
use tracing::info;

use crate::error::{Entity, Result, StoreError};
use crate::seed;
use crate::store::{self, CommentStore, SeedReport};

/// Process-lifetime store. Everything lives behind one mutex; the
/// `BTreeMap`s keep records in ascending id order.
pub struct MemoryStore {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    users: BTreeMap<i64, User>,
    comments: BTreeMap<i64, Comment>,
    next_user_id: i64,
    next_comment_id: i64,
}

impl MemoryStore {
    /// An empty store. Ids start at 1.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_user_id: 1,
                next_comment_id: 1,
                ..State::default()
            }),
        }
    }

    /// A store pre-loaded with the demo dataset, counters positioned after it.
    pub fn seeded() -> Self {
        let store = Self::new();
        if let Ok(mut state) = store.state.lock() {
            state.load_seed();
        }
        store
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|e| StoreError::StorageUnavailable(format!("store lock poisoned: {}", e)))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl State {
    fn load_seed(&mut self) -> SeedReport {
        let mut report = SeedReport::default();

        for user in seed::USERS {
            if self.users.contains_key(&user.id) {
                continue;
            }
            self.users.insert(
                user.id,
                User {
                    id: user.id,
                    name: user.name.to_string(),
                    image: user.image.to_string(),
                },
            );
            self.next_user_id = self.next_user_id.max(user.id + 1);
            report.users += 1;
        }

        if self.comments.is_empty() {
            let now = store::now();
            for comment in seed::COMMENTS {
                let id = self.next_comment_id;
                self.next_comment_id += 1;
                self.comments.insert(
                    id,
                    Comment {
                        id,
                        content: comment.content.to_string(),
                        created_at: comment.created_at(now),
                        user_id: comment.user_id,
                        parent_id: None,
                    },
                );
                report.comments += 1;
            }
        }

        report
    }
}

impl CommentStore for MemoryStore {
    fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.lock()?.users.values().cloned().collect())
    }

    fn get_user(&self, id: i64) -> Result<User> {
        self.lock()?
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::user_not_found(id))
    }

    fn create_user(&self, name: &str, image: &str) -> Result<User> {
        store::require_text("name", name)?;
        store::require_text("image", image)?;

        let mut state = self.lock()?;
        let id = state.next_user_id;
        state.next_user_id += 1;

        let user = User {
            id,
            name: name.to_string(),
            image: image.to_string(),
        };
        state.users.insert(id, user.clone());
        Ok(user)
    }

    fn list_comments(&self) -> Result<Vec<Comment>> {
        Ok(self.lock()?.comments.values().cloned().collect())
    }

    fn get_comment(&self, id: i64) -> Result<Comment> {
        self.lock()?
            .comments
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::comment_not_found(id))
    }

    fn create_comment(&self, new: NewComment) -> Result<Comment> {
        store::require_text("content", &new.content)?;

        let mut state = self.lock()?;
        if !state.users.contains_key(&new.user_id) {
            return Err(StoreError::InvalidReference {
                entity: Entity::User,
                id: new.user_id,
            });
        }
        if let Some(parent_id) = new.parent_id {
            if !state.comments.contains_key(&parent_id) {
                return Err(StoreError::InvalidReference {
                    entity: Entity::Comment,
                    id: parent_id,
                });
            }
        }

        let id = state.next_comment_id;
        state.next_comment_id += 1;

        let comment = Comment {
            id,
            content: new.content,
            created_at: store::now(),
            user_id: new.user_id,
            parent_id: new.parent_id,
        };
        state.comments.insert(id, comment.clone());
        Ok(comment)
    }

    fn update_comment(&self, id: i64, content: &str) -> Result<Comment> {
        store::require_text("content", content)?;

        let mut state = self.lock()?;
        let comment = state
            .comments
            .get_mut(&id)
            .ok_or_else(|| StoreError::comment_not_found(id))?;
        comment.content = content.to_string();
        Ok(comment.clone())
    }

    fn delete_comment(&self, id: i64) -> Result<Comment> {
        self.lock()?
            .comments
            .remove(&id)
            .ok_or_else(|| StoreError::comment_not_found(id))
    }

    fn seed(&self) -> Result<SeedReport> {
        let report = self.lock()?.load_seed();
        info!(
            "Seeded {} users and {} comments",
            report.users, report.comments
        );
        Ok(report)
    }

    fn remove_latest_user(&self) -> Result<Option<User>> {
        let mut state = self.lock()?;
        let Some(id) = state.users.keys().next_back().copied() else {
            return Ok(None);
        };

        if state.comments.values().any(|c| c.user_id == id) {
            return Err(StoreError::UserHasComments(id));
        }

        let user = state.users.remove(&id);
        state.next_user_id = state.users.keys().next_back().map_or(1, |max| max + 1);

        info!("Removed user {} and reset the user id counter", id);
        Ok(user)
    }
}
