use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;

use crate::error::{ApiError, Conflict, NotFound};

pub type UserId = u64;

/// User record owned by the store. Lookups hand out clones; no reference
/// into the table ever leaves the store.
#[derive(Debug, Clone, Serialize)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub age: Option<u8>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub friend_ids: BTreeSet<UserId>,
}

/// Patch for `UserStore::update`: only the provided fields are applied.
#[derive(Debug, Default, Clone)]
pub struct UserPatch {
    pub name: Option<String>,
    pub age: Option<u8>,
}

#[derive(Debug, Default)]
struct UserTable {
    next_id: UserId,
    users: BTreeMap<UserId, UserRecord>,
}

/// In-memory user store. Every mutation runs inside one write-lock critical
/// section with no suspension point, so check-then-act sequences (duplicate
/// email, friend symmetry) cannot interleave with other requests.
#[derive(Clone, Default)]
pub struct UserStore {
    inner: Arc<RwLock<UserTable>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_by_id(&self, id: UserId) -> Option<UserRecord> {
        self.inner.read().users.get(&id).cloned()
    }

    pub fn find_by_email(&self, email: &str) -> Option<UserRecord> {
        let table = self.inner.read();
        table.users.values().find(|u| u.email == email).cloned()
    }

    pub fn find_by_name(&self, name: &str) -> Option<UserRecord> {
        let table = self.inner.read();
        table.users.values().find(|u| u.name == name).cloned()
    }

    /// Resolves a set of ids to records, silently skipping unknown ids.
    pub fn find_many(&self, ids: &BTreeSet<UserId>) -> Vec<UserRecord> {
        let table = self.inner.read();
        ids.iter()
            .filter_map(|id| table.users.get(id).cloned())
            .collect()
    }

    pub fn all(&self) -> Vec<UserRecord> {
        self.inner.read().users.values().cloned().collect()
    }

    /// Atomic check-and-insert: the duplicate-email check and the insert
    /// share one lock acquisition, so two racing sign-ups cannot both pass.
    pub fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRecord, Conflict> {
        let mut table = self.inner.write();
        if table.users.values().any(|u| u.email == email) {
            return Err(Conflict::DuplicateEmail(email.to_string()));
        }
        table.next_id += 1;
        let user = UserRecord {
            id: table.next_id,
            email: email.to_string(),
            name: name.to_string(),
            age: None,
            password_hash: password_hash.to_string(),
            friend_ids: BTreeSet::new(),
        };
        table.users.insert(user.id, user.clone());
        Ok(user)
    }

    /// Inserts both directions of the friendship under the same lock; a
    /// half-written edge is never observable. Returns the updated `a`.
    pub fn add_friend_edge(&self, a: UserId, b: UserId) -> Result<UserRecord, ApiError> {
        let mut table = self.inner.write();
        match table.users.get(&a) {
            None => return Err(NotFound::User.into()),
            // A user is trivially linked to themselves.
            Some(me) if a == b || me.friend_ids.contains(&b) => {
                return Err(Conflict::AlreadyFriends(b).into());
            }
            Some(_) => {}
        }
        if !table.users.contains_key(&b) {
            return Err(NotFound::User.into());
        }
        if let Some(friend) = table.users.get_mut(&b) {
            friend.friend_ids.insert(a);
        }
        match table.users.get_mut(&a) {
            Some(me) => {
                me.friend_ids.insert(b);
                Ok(me.clone())
            }
            None => Err(NotFound::User.into()),
        }
    }

    /// Merges only the provided fields; everything else is left untouched.
    pub fn update(&self, id: UserId, patch: UserPatch) -> Result<UserRecord, NotFound> {
        let mut table = self.inner.write();
        let Some(user) = table.users.get_mut(&id) else {
            return Err(NotFound::User);
        };
        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(age) = patch.age {
            user.age = Some(age);
        }
        Ok(user.clone())
    }
}
