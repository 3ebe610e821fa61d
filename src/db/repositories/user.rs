use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::db::{StoreError, StoreResult};
use crate::domain::UserId;
use crate::models::{NewUser, User};

#[derive(Default)]
pub struct UserTable {
    rows: HashMap<UserId, User>,
    by_username: HashMap<String, UserId>,
}

pub struct UserRepository<'a> {
    table: &'a RwLock<UserTable>,
}

impl<'a> UserRepository<'a> {
    #[must_use]
    pub const fn new(table: &'a RwLock<UserTable>) -> Self {
        Self { table }
    }

    pub async fn get(&self, id: &UserId) -> Option<User> {
        self.table.read().await.rows.get(id).cloned()
    }

    pub async fn get_by_username(&self, username: &str) -> Option<User> {
        let table = self.table.read().await;
        table
            .by_username
            .get(username)
            .and_then(|id| table.rows.get(id))
            .cloned()
    }

    pub async fn create(&self, new: NewUser) -> StoreResult<User> {
        let mut table = self.table.write().await;
        if table.by_username.contains_key(&new.username) {
            return Err(StoreError::Conflict {
                entity: "User",
                key: new.username,
            });
        }

        let user = User {
            id: UserId::generate(),
            username: new.username,
            password: new.password,
        };
        table.by_username.insert(user.username.clone(), user.id.clone());
        table.rows.insert(user.id.clone(), user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use crate::db::{Store, StoreError};
    use crate::models::NewUser;

    fn alice() -> NewUser {
        NewUser {
            username: "alice".to_string(),
            password: "secret".to_string(),
        }
    }

    #[tokio::test]
    async fn create_and_lookup() {
        let store = Store::new();
        let user = store.create_user(alice()).await.unwrap();

        assert_eq!(store.get_user(&user.id).await, Some(user.clone()));
        assert_eq!(store.get_user_by_username("alice").await, Some(user));
        assert_eq!(store.get_user_by_username("bob").await, None);
    }

    #[tokio::test]
    async fn usernames_are_unique() {
        let store = Store::new();
        store.create_user(alice()).await.unwrap();
        let err = store.create_user(alice()).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict { entity: "User", .. }));
    }
}
