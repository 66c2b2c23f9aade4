//! Behaviour every `CommentStore` backend must share. Each backend's test
//! module expands `conformance_tests!` with a constructor for a fresh store.

use murmur_types::models::NewComment;

use crate::error::{Entity, StoreError};
use crate::store::CommentStore;

macro_rules! conformance_tests {
    ($make:expr) => {
        mod conformance {
            use super::*;
            use crate::conformance as suite;

            #[test]
            fn create_then_get_returns_same_comment() {
                suite::create_then_get_returns_same_comment(&$make);
            }

            #[test]
            fn listing_stays_ascending_across_deletes() {
                suite::listing_stays_ascending_across_deletes(&$make);
            }

            #[test]
            fn deleted_comment_is_gone() {
                suite::deleted_comment_is_gone(&$make);
            }

            #[test]
            fn update_changes_content_only() {
                suite::update_changes_content_only(&$make);
            }

            #[test]
            fn update_rejects_empty_content_and_unknown_ids() {
                suite::update_rejects_empty_content_and_unknown_ids(&$make);
            }

            #[test]
            fn create_user_requires_name_and_image() {
                suite::create_user_requires_name_and_image(&$make);
            }

            #[test]
            fn create_comment_checks_references() {
                suite::create_comment_checks_references(&$make);
            }

            #[test]
            fn replies_keep_parent_id_after_parent_deleted() {
                suite::replies_keep_parent_id_after_parent_deleted(&$make);
            }

            #[test]
            fn concurrent_creates_get_distinct_ids() {
                suite::concurrent_creates_get_distinct_ids(&$make);
            }

            #[test]
            fn seed_is_idempotent() {
                suite::seed_is_idempotent(&$make);
            }

            #[test]
            fn remove_latest_user_rewinds_counter() {
                suite::remove_latest_user_rewinds_counter(&$make);
            }
        }
    };
}

pub(crate) use conformance_tests;

fn author(store: &dyn CommentStore) -> i64 {
    store.create_user("a", "u").unwrap().id
}

fn post(store: &dyn CommentStore, user_id: i64, content: &str, parent_id: Option<i64>) -> i64 {
    store
        .create_comment(NewComment {
            content: content.into(),
            user_id,
            parent_id,
        })
        .unwrap()
        .id
}

fn listed_ids(store: &dyn CommentStore) -> Vec<i64> {
    store.list_comments().unwrap().iter().map(|c| c.id).collect()
}

pub fn create_then_get_returns_same_comment(store: &dyn CommentStore) {
    let user_id = author(store);
    let created = store
        .create_comment(NewComment {
            content: "hi".into(),
            user_id,
            parent_id: None,
        })
        .unwrap();

    assert!(created.parent_id.is_none());

    let fetched = store.get_comment(created.id).unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.content, "hi");
    assert_eq!(fetched.user_id, user_id);
}

pub fn listing_stays_ascending_across_deletes(store: &dyn CommentStore) {
    let user_id = author(store);
    let ids: Vec<i64> = (0..5)
        .map(|i| post(store, user_id, &format!("c{}", i), None))
        .collect();

    store.delete_comment(ids[1]).unwrap();
    store.delete_comment(ids[3]).unwrap();
    let late = post(store, user_id, "late", None);

    assert!(late > ids[4], "deleted ids must not be reused");
    assert_eq!(listed_ids(store), vec![ids[0], ids[2], ids[4], late]);
}

pub fn deleted_comment_is_gone(store: &dyn CommentStore) {
    let user_id = author(store);
    let id = post(store, user_id, "short-lived", None);

    let removed = store.delete_comment(id).unwrap();
    assert_eq!(removed.id, id);
    assert_eq!(removed.content, "short-lived");

    assert!(matches!(
        store.get_comment(id),
        Err(StoreError::NotFound { entity: Entity::Comment, id: missing }) if missing == id
    ));
    assert!(!listed_ids(store).contains(&id));
    assert!(matches!(
        store.delete_comment(id),
        Err(StoreError::NotFound { .. })
    ));
}

pub fn update_changes_content_only(store: &dyn CommentStore) {
    let user_id = author(store);
    let parent = post(store, user_id, "parent", None);
    let reply = store
        .create_comment(NewComment {
            content: "first draft".into(),
            user_id,
            parent_id: Some(parent),
        })
        .unwrap();

    let updated = store.update_comment(reply.id, "second draft").unwrap();

    assert_eq!(updated.content, "second draft");
    assert_eq!(updated.id, reply.id);
    assert_eq!(updated.user_id, reply.user_id);
    assert_eq!(updated.parent_id, Some(parent));
    assert_eq!(updated.created_at, reply.created_at);
    assert_eq!(store.get_comment(reply.id).unwrap(), updated);
}

pub fn update_rejects_empty_content_and_unknown_ids(store: &dyn CommentStore) {
    let user_id = author(store);
    let id = post(store, user_id, "keep me", None);

    assert!(matches!(
        store.update_comment(id, ""),
        Err(StoreError::InvalidInput(_))
    ));
    assert!(matches!(
        store.update_comment(id, "   "),
        Err(StoreError::InvalidInput(_))
    ));
    assert_eq!(store.get_comment(id).unwrap().content, "keep me");

    assert!(matches!(
        store.update_comment(id + 100, "anything"),
        Err(StoreError::NotFound { entity: Entity::Comment, .. })
    ));
}

pub fn create_user_requires_name_and_image(store: &dyn CommentStore) {
    assert!(matches!(
        store.create_user("", "img"),
        Err(StoreError::InvalidInput(_))
    ));
    assert!(matches!(
        store.create_user("name", ""),
        Err(StoreError::InvalidInput(_))
    ));
    assert!(store.list_users().unwrap().is_empty());

    let user = store.create_user("name", "img").unwrap();
    assert_eq!(user.name, "name");
    assert_eq!(user.image, "img");
    assert_eq!(store.get_user(user.id).unwrap(), user);
    assert!(matches!(
        store.get_user(user.id + 1),
        Err(StoreError::NotFound { entity: Entity::User, .. })
    ));
}

pub fn create_comment_checks_references(store: &dyn CommentStore) {
    let user_id = author(store);

    let missing_user = store.create_comment(NewComment {
        content: "orphan".into(),
        user_id: user_id + 50,
        parent_id: None,
    });
    assert!(matches!(
        missing_user,
        Err(StoreError::InvalidReference { entity: Entity::User, .. })
    ));

    let missing_parent = store.create_comment(NewComment {
        content: "reply to nothing".into(),
        user_id,
        parent_id: Some(999),
    });
    assert!(matches!(
        missing_parent,
        Err(StoreError::InvalidReference { entity: Entity::Comment, id: 999 })
    ));

    let empty = store.create_comment(NewComment {
        content: String::new(),
        user_id,
        parent_id: None,
    });
    assert!(matches!(empty, Err(StoreError::InvalidInput(_))));

    assert!(store.list_comments().unwrap().is_empty());
}

pub fn replies_keep_parent_id_after_parent_deleted(store: &dyn CommentStore) {
    let user_id = author(store);
    let parent = post(store, user_id, "parent", None);
    let reply = post(store, user_id, "reply", Some(parent));

    store.delete_comment(parent).unwrap();

    let reply = store.get_comment(reply).unwrap();
    assert_eq!(reply.parent_id, Some(parent));

    // The dangling parent can no longer be replied to.
    assert!(matches!(
        store.create_comment(NewComment {
            content: "too late".into(),
            user_id,
            parent_id: Some(parent),
        }),
        Err(StoreError::InvalidReference { .. })
    ));
}

pub fn concurrent_creates_get_distinct_ids(store: &dyn CommentStore) {
    let user_id = author(store);

    let mut ids: Vec<i64> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|i| s.spawn(move || post(store, user_id, &format!("racer {}", i), None)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 8);
    for id in &ids {
        assert!(store.get_comment(*id).is_ok());
    }
    assert_eq!(listed_ids(store), ids);
}

pub fn seed_is_idempotent(store: &dyn CommentStore) {
    let first = store.seed().unwrap();
    assert_eq!(first.users, 3);
    assert_eq!(first.comments, 2);

    let second = store.seed().unwrap();
    assert_eq!(second.users, 0);
    assert_eq!(second.comments, 0);

    assert_eq!(store.list_users().unwrap().len(), 3);
    let comments = store.list_comments().unwrap();
    assert_eq!(comments.len(), 2);
    assert!(comments[0].created_at < comments[1].created_at);
}

pub fn remove_latest_user_rewinds_counter(store: &dyn CommentStore) {
    assert!(store.remove_latest_user().unwrap().is_none());

    store.seed().unwrap();
    // The seed's last user authored a comment.
    assert!(matches!(
        store.remove_latest_user(),
        Err(StoreError::UserHasComments(3))
    ));

    let added = store.create_user("temp", "img").unwrap();
    let removed = store.remove_latest_user().unwrap().unwrap();
    assert_eq!(removed, added);
    assert!(store.get_user(added.id).is_err());

    let again = store.create_user("again", "img").unwrap();
    assert_eq!(again.id, added.id);
}
