use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::posts::store::{PostId, PostRecord};
use crate::users::dto::PublicUser;
use crate::users::store::UserStore;

/// Request body for creating a post.
#[derive(Debug, Deserialize)]
pub struct AddPostRequest {
    pub title: String,
    pub body: String,
}

/// Flat projection used inside user details.
#[derive(Debug, Serialize)]
pub struct PostSummary {
    pub id: PostId,
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<&PostRecord> for PostSummary {
    fn from(post: &PostRecord) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            created_at: post.created_at,
        }
    }
}

/// Post with author and like-givers expanded.
#[derive(Debug, Serialize)]
pub struct PostDetails {
    pub id: PostId,
    pub title: String,
    pub body: String,
    pub author: Option<PublicUser>,
    pub like_givers: Vec<PublicUser>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl PostDetails {
    pub fn expand(post: &PostRecord, users: &UserStore) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            body: post.body.clone(),
            author: users.find_by_id(post.author_id).map(|u| PublicUser::from(&u)),
            like_givers: users
                .find_many(&post.like_giver_ids)
                .iter()
                .map(PublicUser::from)
                .collect(),
            created_at: post.created_at,
        }
    }
}
