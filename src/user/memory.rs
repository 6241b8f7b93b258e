//! In-process store for tests and postgres-less runs.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{Result, ServerError};
use crate::user::store::{UserPage, UserStore, total_pages};
use crate::user::{NewUser, User};

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, HashMap<Uuid, User>>> {
        self.users.read().map_err(|_| poisoned())
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<Uuid, User>>> {
        self.users.write().map_err(|_| poisoned())
    }
}

fn poisoned() -> ServerError {
    ServerError::Internal {
        details: "user store lock poisoned".into(),
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.read()?.get(&id).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User> {
        let user = User {
            id: Uuid::new_v4(),
            login: user.login,
            first_name: user.first_name,
            last_name: user.last_name,
        };
        self.write()?.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_or_insert(&self, user: &User) -> Result<bool> {
        Ok(self.write()?.insert(user.id, user.clone()).is_none())
    }

    async fn update(&self, user: &User) -> Result<()> {
        self.write()?.insert(user.id, user.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.write()?.remove(&id);
        Ok(())
    }

    async fn get_page(&self, page_number: i64, page_size: i64) -> Result<UserPage> {
        let mut items: Vec<User> = self.read()?.values().cloned().collect();
        items.sort_by(|a, b| (&a.login, a.id).cmp(&(&b.login, b.id)));

        let total_count = items.len() as i64;
        // `page_number` is unbounded, so the offset must not overflow.
        let offset = (page_number - 1).saturating_mul(page_size) as usize;
        let items = items
            .into_iter()
            .skip(offset)
            .take(page_size as usize)
            .collect();

        Ok(UserPage {
            items,
            total_count,
            total_pages: total_pages(total_count, page_size),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(login: &str) -> NewUser {
        NewUser {
            login: login.into(),
            first_name: Some("A".into()),
            last_name: Some("B".into()),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_find_roundtrip() {
        let store = MemoryUserStore::default();
        let user = store.insert(named("ab1")).await.unwrap();
        let found = store.find_by_id(user.id).await.unwrap();
        assert_eq!(found, Some(user));
    }

    #[tokio::test]
    async fn test_update_or_insert_reports_insertion() {
        let store = MemoryUserStore::default();
        let user = User {
            id: Uuid::new_v4(),
            login: "ab1".into(),
            first_name: Some("A".into()),
            last_name: Some("B".into()),
        };
        assert!(store.update_or_insert(&user).await.unwrap());
        assert!(!store.update_or_insert(&user).await.unwrap());
    }

    #[tokio::test]
    async fn test_get_page_is_ordered_and_bounded() {
        let store = MemoryUserStore::default();
        for login in ["carol", "alice", "bob", "dave", "erin"] {
            store.insert(named(login)).await.unwrap();
        }

        let page = store.get_page(1, 2).await.unwrap();
        assert_eq!(page.total_count, 5);
        assert_eq!(page.total_pages, 3);
        let logins: Vec<_> = page.items.iter().map(|u| u.login.as_str()).collect();
        assert_eq!(logins, ["alice", "bob"]);

        // Past the last page.
        let page = store.get_page(4, 2).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 5);

        // Offset computation must survive the largest page number.
        let page = store.get_page(i64::MAX, 20).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 5);
    }
}
