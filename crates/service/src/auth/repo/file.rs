use std::path::PathBuf;

use async_trait::async_trait;
use models::user::User;
use uuid::Uuid;

use crate::auth::errors::AuthError;
use crate::auth::repository::UserRepository;
use crate::storage::{JsonListStore, StoreError};

/// Users persisted as a JSON array, one document per deployment.
pub struct FileUserRepository {
    store: JsonListStore<User>,
}

impl FileUserRepository {
    /// Wrap an existing users file. The file is not created here.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { store: JsonListStore::new(path) }
    }

    async fn modify<F>(&self, id: Uuid, f: F) -> Result<User, AuthError>
    where
        F: FnOnce(&mut User) + Send,
    {
        let user = self
            .store
            .mutate(|users| {
                let user = users
                    .iter_mut()
                    .find(|u| u.id == id)
                    .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
                f(user);
                Ok(user.clone())
            })
            .await?;
        Ok(user)
    }
}

#[async_trait]
impl UserRepository for FileUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        Ok(self.store.load().await?.into_iter().find(|u| u.email == email))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
        Ok(self.store.load().await?.into_iter().find(|u| u.id == id))
    }

    async fn create(&self, user: User) -> Result<User, AuthError> {
        let created = self
            .store
            .mutate(move |users| {
                // checked under the write lock so two signups cannot both win
                if users.iter().any(|u| u.email == user.email) {
                    return Err(StoreError::Duplicate(user.email));
                }
                users.push(user.clone());
                Ok(user)
            })
            .await?;
        Ok(created)
    }

    async fn set_token(&self, id: Uuid, token: Option<String>) -> Result<(), AuthError> {
        self.modify(id, move |u| u.token = token).await?;
        Ok(())
    }

    async fn set_avatar_url(&self, id: Uuid, avatar_url: &str) -> Result<User, AuthError> {
        let url = avatar_url.to_string();
        self.modify(id, move |u| u.avatar_url = url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_repo() -> (FileUserRepository, PathBuf) {
        let path = std::env::temp_dir().join(format!("users_{}.json", Uuid::new_v4()));
        tokio::fs::write(&path, "[]").await.expect("seed users file");
        (FileUserRepository::new(&path), path)
    }

    #[tokio::test]
    async fn create_find_and_modify_persist() -> Result<(), anyhow::Error> {
        let (repo, path) = setup_repo().await;
        let user = repo.create(User::new("ann@x.com", "hash".into(), "g".into())).await?;

        assert_eq!(repo.find_by_email("ann@x.com").await?.map(|u| u.id), Some(user.id));
        repo.set_token(user.id, Some("t".into())).await?;
        let updated = repo.set_avatar_url(user.id, "/avatars/a.png").await?;
        assert_eq!(updated.token.as_deref(), Some("t"));
        assert_eq!(updated.avatar_url, "/avatars/a.png");

        let reloaded = FileUserRepository::new(&path);
        let found = reloaded.find_by_id(user.id).await?.expect("persisted user");
        assert_eq!(found, updated);
        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() -> Result<(), anyhow::Error> {
        let (repo, path) = setup_repo().await;
        repo.create(User::new("ann@x.com", "h".into(), String::new())).await?;
        let res = repo.create(User::new("ann@x.com", "h2".into(), String::new())).await;
        assert!(matches!(res, Err(AuthError::Conflict)));
        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn modifying_unknown_user_is_not_found() -> Result<(), anyhow::Error> {
        let (repo, path) = setup_repo().await;
        let res = repo.set_token(Uuid::new_v4(), None).await;
        assert!(matches!(res, Err(AuthError::NotFound)));
        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }
}
