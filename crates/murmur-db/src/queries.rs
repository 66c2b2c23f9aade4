use murmur_types::models::{Comment, NewComment, User};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::info;

use crate::error::{Entity, Result, StoreError};
use crate::models::{COMMENT_COLUMNS, CommentRow, USER_COLUMNS, UserRow, format_timestamp};
use crate::seed;
use crate::store::{self, CommentStore, SeedReport};
use crate::Database;

impl CommentStore for Database {
    // -- Users --

    fn list_users(&self) -> Result<Vec<User>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {} FROM users ORDER BY id ASC", USER_COLUMNS))?;
            let rows = stmt
                .query_map([], UserRow::from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows.into_iter().map(User::from).collect())
        })
    }

    fn get_user(&self, id: i64) -> Result<User> {
        self.with_conn(|conn| {
            query_user(conn, id)?.ok_or_else(|| StoreError::user_not_found(id))
        })
    }

    fn create_user(&self, name: &str, image: &str) -> Result<User> {
        store::require_text("name", name)?;
        store::require_text("image", image)?;

        self.with_conn(|conn| {
            let row = conn.query_row(
                &format!(
                    "INSERT INTO users (name, image) VALUES (?1, ?2) RETURNING {}",
                    USER_COLUMNS
                ),
                params![name, image],
                UserRow::from_row,
            )?;
            Ok(row.into())
        })
    }

    // -- Comments --

    fn list_comments(&self) -> Result<Vec<Comment>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM comments ORDER BY id ASC",
                COMMENT_COLUMNS
            ))?;
            let rows = stmt
                .query_map([], CommentRow::from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows.into_iter().map(Comment::from).collect())
        })
    }

    fn get_comment(&self, id: i64) -> Result<Comment> {
        self.with_conn(|conn| {
            query_comment(conn, id)?.ok_or_else(|| StoreError::comment_not_found(id))
        })
    }

    fn create_comment(&self, new: NewComment) -> Result<Comment> {
        store::require_text("content", &new.content)?;

        // Existence checks and the insert share one lock, so a parent
        // cannot vanish between the check and the write.
        self.with_conn(|conn| {
            if query_user(conn, new.user_id)?.is_none() {
                return Err(StoreError::InvalidReference {
                    entity: Entity::User,
                    id: new.user_id,
                });
            }
            if let Some(parent_id) = new.parent_id {
                if query_comment(conn, parent_id)?.is_none() {
                    return Err(StoreError::InvalidReference {
                        entity: Entity::Comment,
                        id: parent_id,
                    });
                }
            }

            let row = conn.query_row(
                &format!(
                    "INSERT INTO comments (content, user_id, parent_id, created_at)
                     VALUES (?1, ?2, ?3, ?4)
                     RETURNING {}",
                    COMMENT_COLUMNS
                ),
                params![
                    new.content,
                    new.user_id,
                    new.parent_id,
                    format_timestamp(&store::now())
                ],
                CommentRow::from_row,
            )?;
            Ok(row.into())
        })
    }

    fn update_comment(&self, id: i64, content: &str) -> Result<Comment> {
        store::require_text("content", content)?;

        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    &format!(
                        "UPDATE comments SET content = ?1 WHERE id = ?2 RETURNING {}",
                        COMMENT_COLUMNS
                    ),
                    params![content, id],
                    CommentRow::from_row,
                )
                .optional()?;

            row.map(Comment::from)
                .ok_or_else(|| StoreError::comment_not_found(id))
        })
    }

    fn delete_comment(&self, id: i64) -> Result<Comment> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    &format!("DELETE FROM comments WHERE id = ?1 RETURNING {}", COMMENT_COLUMNS),
                    [id],
                    CommentRow::from_row,
                )
                .optional()?;

            row.map(Comment::from)
                .ok_or_else(|| StoreError::comment_not_found(id))
        })
    }

    // -- Maintenance --

    fn seed(&self) -> Result<SeedReport> {
        self.with_conn(|conn| {
            let mut report = SeedReport::default();

            for user in seed::USERS {
                report.users += conn.execute(
                    "INSERT OR IGNORE INTO users (id, name, image) VALUES (?1, ?2, ?3)",
                    params![user.id, user.name, user.image],
                )?;
            }

            let existing: i64 = conn.query_row("SELECT COUNT(*) FROM comments", [], |r| r.get(0))?;
            if existing == 0 {
                let now = store::now();
                for comment in seed::COMMENTS {
                    conn.execute(
                        "INSERT INTO comments (content, user_id, parent_id, created_at)
                         VALUES (?1, ?2, NULL, ?3)",
                        params![
                            comment.content,
                            comment.user_id,
                            format_timestamp(&comment.created_at(now))
                        ],
                    )?;
                    report.comments += 1;
                }
            }

            info!(
                "Seeded {} users and {} comments",
                report.users, report.comments
            );
            Ok(report)
        })
    }

    fn remove_latest_user(&self) -> Result<Option<User>> {
        self.with_conn(|conn| {
            let latest = conn
                .query_row(
                    &format!("SELECT {} FROM users ORDER BY id DESC LIMIT 1", USER_COLUMNS),
                    [],
                    UserRow::from_row,
                )
                .optional()?;

            let Some(user) = latest else {
                return Ok(None);
            };

            let authored: i64 = conn.query_row(
                "SELECT COUNT(*) FROM comments WHERE user_id = ?1",
                [user.id],
                |r| r.get(0),
            )?;
            if authored > 0 {
                return Err(StoreError::UserHasComments(user.id));
            }

            conn.execute("DELETE FROM users WHERE id = ?1", [user.id])?;
            conn.execute(
                "UPDATE sqlite_sequence
                 SET seq = (SELECT COALESCE(MAX(id), 0) FROM users)
                 WHERE name = 'users'",
                [],
            )?;

            info!("Removed user {} and reset the user id sequence", user.id);
            Ok(Some(user.into()))
        })
    }
}

fn query_user(conn: &Connection, id: i64) -> Result<Option<User>> {
    let row = conn
        .query_row(
            &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
            [id],
            UserRow::from_row,
        )
        .optional()?;

    Ok(row.map(User::from))
}

fn query_comment(conn: &Connection, id: i64) -> Result<Option<Comment>> {
    let row = conn
        .query_row(
            &format!("SELECT {} FROM comments WHERE id = ?1", COMMENT_COLUMNS),
            [id],
            CommentRow::from_row,
        )
        .optional()?;

    Ok(row.map(Comment::from))
}
