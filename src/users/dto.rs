use serde::{Deserialize, Serialize};

use crate::posts::dto::PostSummary;
use crate::posts::store::PostStore;
use crate::users::store::{UserId, UserRecord, UserStore};

/// Public projection of a user; never carries credential material.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub age: Option<u8>,
}

impl From<&UserRecord> for PublicUser {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            age: user.age,
        }
    }
}

/// User with friends and posts expanded for detail endpoints.
#[derive(Debug, Serialize)]
pub struct UserDetails {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub age: Option<u8>,
    pub friends: Vec<PublicUser>,
    pub posts: Vec<PostSummary>,
}

impl UserDetails {
    pub fn expand(user: &UserRecord, users: &UserStore, posts: &PostStore) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            age: user.age,
            friends: users
                .find_many(&user.friend_ids)
                .iter()
                .map(PublicUser::from)
                .collect(),
            posts: posts
                .find_by_author(user.id)
                .iter()
                .map(PostSummary::from)
                .collect(),
        }
    }
}

/// Patch body for `PATCH /me`; absent fields stay untouched.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub age: Option<u8>,
}
