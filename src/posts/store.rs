use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use time::OffsetDateTime;

use crate::error::NotFound;
use crate::users::store::UserId;

pub type PostId = u64;

/// Post record owned by the store. `author_id` and `created_at` never
/// change after creation.
#[derive(Debug, Clone, Serialize)]
pub struct PostRecord {
    pub id: PostId,
    pub author_id: UserId,
    pub title: String,
    pub body: String,
    pub like_giver_ids: BTreeSet<UserId>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Default)]
struct PostTable {
    next_id: PostId,
    posts: BTreeMap<PostId, PostRecord>,
}

/// In-memory post store, same locking discipline as the user store: one
/// non-suspending critical section per mutation.
#[derive(Clone, Default)]
pub struct PostStore {
    inner: Arc<RwLock<PostTable>>,
}

impl PostStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_by_id(&self, id: PostId) -> Option<PostRecord> {
        self.inner.read().posts.get(&id).cloned()
    }

    pub fn find_by_author(&self, author_id: UserId) -> Vec<PostRecord> {
        self.inner
            .read()
            .posts
            .values()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect()
    }

    pub fn all(&self) -> Vec<PostRecord> {
        self.inner.read().posts.values().cloned().collect()
    }

    /// Ids come from a counter that only grows; an id freed by `delete` is
    /// never handed out again.
    pub fn create(&self, author_id: UserId, title: &str, body: &str) -> PostRecord {
        let mut table = self.inner.write();
        table.next_id += 1;
        let post = PostRecord {
            id: table.next_id,
            author_id,
            title: title.to_string(),
            body: body.to_string(),
            like_giver_ids: BTreeSet::new(),
            created_at: OffsetDateTime::now_utc(),
        };
        table.posts.insert(post.id, post.clone());
        post
    }

    /// Involutive toggle: removes the user from the liker set if present,
    /// inserts otherwise. Applying it twice restores the original set.
    pub fn toggle_like(&self, post_id: PostId, user_id: UserId) -> Result<PostRecord, NotFound> {
        let mut table = self.inner.write();
        let Some(post) = table.posts.get_mut(&post_id) else {
            return Err(NotFound::Post);
        };
        if !post.like_giver_ids.remove(&user_id) {
            post.like_giver_ids.insert(user_id);
        }
        Ok(post.clone())
    }

    /// Removes and returns the post. Authorship is the ownership gate's
    /// job; the store only guarantees the post existed.
    pub fn delete(&self, post_id: PostId) -> Result<PostRecord, NotFound> {
        self.inner
            .write()
            .posts
            .remove(&post_id)
            .ok_or(NotFound::Post)
    }
}
