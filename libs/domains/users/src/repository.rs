use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::{same_email, CreateUser, UpdateUser, User};

/// Repository trait for User persistence
///
/// Implementations own id and timestamp assignment and must reject a second
/// row whose email matches an existing one case-insensitively.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users, most recently created first
    async fn list(&self) -> UserResult<Vec<User>>;

    async fn get_by_id(&self, id: i32) -> UserResult<Option<User>>;

    /// Insert a user; fails with `DuplicateEmail` on a uniqueness violation
    async fn create(&self, input: CreateUser) -> UserResult<User>;

    /// Overwrite name and email and refresh `updated_on`
    async fn update(&self, id: i32, input: UpdateUser) -> UserResult<User>;

    /// Returns false when no row matched
    async fn delete(&self, id: i32) -> UserResult<bool>;

    async fn exists(&self, id: i32) -> UserResult<bool>;

    /// Case-insensitive email lookup, optionally ignoring one user id
    async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> UserResult<bool>;
}

#[derive(Default)]
struct InMemoryState {
    users: HashMap<i32, User>,
    next_id: i32,
}

/// In-memory implementation of UserRepository (for testing/development)
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    state: Arc<RwLock<InMemoryState>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list(&self) -> UserResult<Vec<User>> {
        let state = self.state.read().await;
        let mut users: Vec<User> = state.users.values().cloned().collect();
        users.sort_by(|a, b| b.created_on.cmp(&a.created_on).then(b.id.cmp(&a.id)));
        Ok(users)
    }

    async fn get_by_id(&self, id: i32) -> UserResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.get(&id).cloned())
    }

    async fn create(&self, input: CreateUser) -> UserResult<User> {
        let mut state = self.state.write().await;

        if state.users.values().any(|u| same_email(&u.email, &input.email)) {
            return Err(UserError::DuplicateEmail(input.email));
        }

        state.next_id += 1;
        let now = Utc::now();
        let user = User {
            id: state.next_id,
            name: input.name,
            email: input.email,
            created_on: now,
            updated_on: now,
        };

        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: i32, input: UpdateUser) -> UserResult<User> {
        let mut state = self.state.write().await;

        if state
            .users
            .values()
            .any(|u| u.id != id && same_email(&u.email, &input.email))
        {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let user = state.users.get_mut(&id).ok_or(UserError::NotFound(id))?;
        user.name = input.name;
        user.email = input.email;
        user.updated_on = Utc::now();

        Ok(user.clone())
    }

    async fn delete(&self, id: i32) -> UserResult<bool> {
        let mut state = self.state.write().await;
        Ok(state.users.remove(&id).is_some())
    }

    async fn exists(&self, id: i32) -> UserResult<bool> {
        let state = self.state.read().await;
        Ok(state.users.contains_key(&id))
    }

    async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> UserResult<bool> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .any(|u| Some(u.id) != exclude_id && same_email(&u.email, email)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, email: &str) -> CreateUser {
        CreateUser {
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids_and_timestamps() {
        let repo = InMemoryUserRepository::new();

        let ada = repo.create(input("Ada", "ada@x.com")).await.unwrap();
        let bea = repo.create(input("Bea", "bea@x.com")).await.unwrap();

        assert_eq!(ada.id, 1);
        assert_eq!(bea.id, 2);
        assert_eq!(ada.created_on, ada.updated_on);
    }

    #[tokio::test]
    async fn test_create_rejects_case_insensitive_duplicate() {
        let repo = InMemoryUserRepository::new();
        repo.create(input("Ada", "ada@x.com")).await.unwrap();

        let err = repo.create(input("Bea", "ADA@x.com")).await.unwrap_err();
        assert!(matches!(err, UserError::DuplicateEmail(email) if email == "ADA@x.com"));
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let repo = InMemoryUserRepository::new();
        for i in 0..3 {
            repo.create(input("User", &format!("u{i}@x.com"))).await.unwrap();
        }

        let ids: Vec<i32> = repo.list().await.unwrap().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_update_keeps_created_on() {
        let repo = InMemoryUserRepository::new();
        let user = repo.create(input("Ada", "ada@x.com")).await.unwrap();

        let updated = repo
            .update(
                user.id,
                UpdateUser {
                    name: "Ada King".into(),
                    email: "ADA@x.com".into(),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.created_on, user.created_on);
        assert!(updated.updated_on >= user.updated_on);
        assert_eq!(updated.email, "ADA@x.com");
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let repo = InMemoryUserRepository::new();
        let err = repo
            .update(
                7,
                UpdateUser {
                    name: "Nobody".into(),
                    email: "n@x.com".into(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::NotFound(7)));
    }

    #[tokio::test]
    async fn test_email_exists_with_exclusion() {
        let repo = InMemoryUserRepository::new();
        let ada = repo.create(input("Ada", "ada@x.com")).await.unwrap();

        assert!(repo.email_exists("Ada@X.com", None).await.unwrap());
        assert!(!repo.email_exists("ada@x.com", Some(ada.id)).await.unwrap());
        assert!(!repo.email_exists("bea@x.com", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_then_exists() {
        let repo = InMemoryUserRepository::new();
        let ada = repo.create(input("Ada", "ada@x.com")).await.unwrap();

        assert!(repo.exists(ada.id).await.unwrap());
        assert!(repo.delete(ada.id).await.unwrap());
        assert!(!repo.exists(ada.id).await.unwrap());
        assert!(!repo.delete(ada.id).await.unwrap());
    }
}
