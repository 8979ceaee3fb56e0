use models::user::{PublicUser, Subscription};
use serde::{Deserialize, Serialize};

/// Login result (session)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: PublicUser,
}

/// JWT claims carried by session tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub email: String,
    pub subscription: Subscription,
    pub iat: usize,
    pub exp: usize,
}
