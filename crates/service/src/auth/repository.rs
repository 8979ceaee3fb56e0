use async_trait::async_trait;
use models::user::User;
use uuid::Uuid;

use super::errors::AuthError;

/// Repository abstraction for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError>;
    /// Insert a new user; `Conflict` when the email is taken.
    async fn create(&self, user: User) -> Result<User, AuthError>;
    async fn set_token(&self, id: Uuid, token: Option<String>) -> Result<(), AuthError>;
    async fn set_avatar_url(&self, id: Uuid, avatar_url: &str) -> Result<User, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Mutex, MutexGuard};

    #[derive(Default)]
    pub struct MockUserRepository {
        users: Mutex<HashMap<Uuid, User>>, // key: user id
    }

    impl MockUserRepository {
        fn users(&self) -> MutexGuard<'_, HashMap<Uuid, User>> {
            self.users.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
        }
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
            Ok(self.users().values().find(|u| u.email == email).cloned())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
            Ok(self.users().get(&id).cloned())
        }

        async fn create(&self, user: User) -> Result<User, AuthError> {
            let mut users = self.users();
            if users.values().any(|u| u.email == user.email) {
                return Err(AuthError::Conflict);
            }
            users.insert(user.id, user.clone());
            Ok(user)
        }

        async fn set_token(&self, id: Uuid, token: Option<String>) -> Result<(), AuthError> {
            let mut users = self.users();
            let user = users.get_mut(&id).ok_or(AuthError::NotFound)?;
            user.token = token;
            Ok(())
        }

        async fn set_avatar_url(&self, id: Uuid, avatar_url: &str) -> Result<User, AuthError> {
            let mut users = self.users();
            let user = users.get_mut(&id).ok_or(AuthError::NotFound)?;
            user.avatar_url = avatar_url.to_string();
            Ok(user.clone())
        }
    }
}
