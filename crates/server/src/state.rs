use std::sync::Arc;

use configs::AppConfig;
use service::auth::{
    repo::FileUserRepository,
    repository::UserRepository,
    service::{AuthConfig, AuthService},
};
use service::avatars::AvatarService;
use service::contacts::{ContactRepository, ContactService, ContactStore};

/// Shared handler state; cheap to clone.
#[derive(Clone)]
pub struct ServerState {
    pub contacts: ContactService,
    pub auth: Arc<AuthService<dyn UserRepository>>,
    pub avatars: AvatarService,
}

impl ServerState {
    /// Wire stores and services from configuration. Backing files must already exist.
    pub fn from_config(cfg: &AppConfig) -> Self {
        let contact_store: Arc<dyn ContactRepository> = ContactStore::new(&cfg.storage.contacts_path);
        let users: Arc<dyn UserRepository> = Arc::new(FileUserRepository::new(&cfg.storage.users_path));
        let auth_cfg = AuthConfig {
            jwt_secret: cfg.auth.jwt_secret.clone(),
            token_ttl: chrono::Duration::hours(cfg.auth.token_ttl_hours),
        };
        Self {
            contacts: ContactService::new(contact_store),
            auth: Arc::new(AuthService::new(users, auth_cfg)),
            avatars: AvatarService::new(
                &cfg.storage.temp_dir,
                cfg.storage.avatars_dir(),
                cfg.upload.max_avatar_bytes,
            ),
        }
    }
}
