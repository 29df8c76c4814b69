use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::UserId;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub display_name: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Returns `false` if the username is already taken
    /// (case-insensitive).
    async fn insert(&self, user: User) -> bool;

    async fn find(&self, id: UserId) -> Option<User>;

    async fn find_by_username(&self, username: &str) -> Option<User>;
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: DashMap<UserId, User>,
    by_username: DashMap<String, UserId>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: User) -> bool {
        match self.by_username.entry(user.username.to_lowercase()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(user.id);
                self.users.insert(user.id, user);
                true
            }
        }
    }

    async fn find(&self, id: UserId) -> Option<User> {
        self.users.get(&id).map(|u| u.clone())
    }

    async fn find_by_username(&self, username: &str) -> Option<User> {
        let id = *self.by_username.get(&username.to_lowercase())?;
        self.find(id).await
    }
}
