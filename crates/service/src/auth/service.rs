use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use models::user::{Credentials, PublicUser, User};
use rand::rngs::OsRng;
use tracing::{info, debug, instrument};
use uuid::Uuid;

use super::domain::AuthSession;
use super::errors::AuthError;
use super::gravatar::gravatar_url;
use super::repository::UserRepository;
use super::token::TokenKeys;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: chrono::Duration,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self { jwt_secret: jwt_secret.into(), token_ttl: chrono::Duration::hours(12) }
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: UserRepository + ?Sized> {
    repo: Arc<R>,
    keys: TokenKeys,
}

impl<R: UserRepository + ?Sized> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self {
        let keys = TokenKeys::new(&cfg.jwt_secret, cfg.token_ttl);
        Self { repo, keys }
    }

    /// Register a new user with a hashed password and a gravatar avatar.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockUserRepository};
    /// use models::user::Credentials;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockUserRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig::new("secret"));
    /// let input = Credentials { email: "user@example.com".into(), password: "Secret123".into() };
    /// let user = tokio_test::block_on(svc.signup(input)).unwrap();
    /// assert_eq!(user.email, "user@example.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn signup(&self, input: Credentials) -> Result<PublicUser, AuthError> {
        if input.password.is_empty() {
            return Err(AuthError::Validation("\"password\" is required".into()));
        }
        if let Some(existing) = self.repo.find_by_email(&input.email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();

        let user = self
            .repo
            .create(User::new(&input.email, hash, gravatar_url(&input.email)))
            .await?;
        info!(user_id = %user.id, email = %user.email, "user_registered");
        Ok(PublicUser::from(&user))
    }

    /// Authenticate a user, issue a token and remember it on the user.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockUserRepository};
    /// use models::user::Credentials;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockUserRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig::new("secret"));
    /// let creds = Credentials { email: "u@e.com".into(), password: "Passw0rd".into() };
    /// let _ = tokio_test::block_on(svc.signup(creds.clone()));
    /// let session = tokio_test::block_on(svc.login(creds)).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert!(!session.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: Credentials) -> Result<AuthSession, AuthError> {
        let user = self
            .repo
            .find_by_email(&input.email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&user.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::Unauthorized);
        }

        let token = self.keys.issue(&user)?;
        self.repo.set_token(user.id, Some(token.clone())).await?;
        info!(user_id = %user.id, "user_logged_in");
        Ok(AuthSession { token, user: PublicUser::from(&user) })
    }

    /// Resolve a bearer token to its user. The token must verify and still be
    /// the one stored on the user, so logging out invalidates it.
    pub async fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.keys.verify(token)?;
        let id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;
        let user = self.repo.find_by_id(id).await?.ok_or(AuthError::InvalidToken)?;
        if user.token.as_deref() != Some(token) {
            debug!(user_id = %user.id, "token no longer current");
            return Err(AuthError::InvalidToken);
        }
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn logout(&self, user_id: Uuid) -> Result<(), AuthError> {
        self.repo.set_token(user_id, None).await?;
        info!(%user_id, "user_logged_out");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn update_avatar(&self, user_id: Uuid, avatar_url: &str) -> Result<PublicUser, AuthError> {
        let user = self.repo.set_avatar_url(user_id, avatar_url).await?;
        info!(%user_id, "avatar_updated");
        Ok(PublicUser::from(&user))
    }
}
