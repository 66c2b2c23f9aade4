use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Which record kind an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Comment,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::User => f.write_str("user"),
            Entity::Comment => f.write_str("comment"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// A required field was missing or empty.
    #[error("{0}")]
    InvalidInput(String),

    /// The record addressed by the operation does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: Entity, id: i64 },

    /// A field of the new record points at a record that does not exist.
    #[error("referenced {entity} {id} does not exist")]
    InvalidReference { entity: Entity, id: i64 },

    #[error("user {0} still authors comments")]
    UserHasComments(i64),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl StoreError {
    pub fn comment_not_found(id: i64) -> Self {
        StoreError::NotFound {
            entity: Entity::Comment,
            id,
        }
    }

    pub fn user_not_found(id: i64) -> Self {
        StoreError::NotFound {
            entity: Entity::User,
            id,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::StorageUnavailable(err.to_string())
    }
}
