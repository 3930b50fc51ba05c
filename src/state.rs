use std::sync::Arc;

use crate::config::AppConfig;
use crate::posts::store::PostStore;
use crate::users::store::UserStore;

/// Process-wide shared state. The stores live for the process lifetime and
/// exclusively own every user and post record.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: UserStore,
    pub posts: PostStore,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        Ok(Self {
            config,
            users: UserStore::new(),
            posts: PostStore::new(),
        })
    }

    pub fn from_parts(config: Arc<AppConfig>, users: UserStore, posts: PostStore) -> Self {
        Self {
            config,
            users,
            posts,
        }
    }

    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            jwt: crate::config::JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
            },
        });
        Self {
            config,
            users: UserStore::new(),
            posts: PostStore::new(),
        }
    }
}
