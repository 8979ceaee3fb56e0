use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::validation::{as_object, required_string, validate_email};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subscription {
    #[default]
    Starter,
    Pro,
    Business,
}

impl fmt::Display for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Subscription::Starter => "starter",
            Subscription::Pro => "pro",
            Subscription::Business => "business",
        };
        f.write_str(s)
    }
}

/// A user account as persisted in the users document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub subscription: Subscription,
    #[serde(rename = "avatarURL", default)]
    pub avatar_url: String,
    #[serde(default)]
    pub token: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: &str, password_hash: String, avatar_url: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: normalize_email(email),
            password_hash,
            subscription: Subscription::default(),
            avatar_url,
            token: None,
            created_at: Utc::now(),
        }
    }
}

/// What clients get to see of a user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub email: String,
    pub subscription: Subscription,
    #[serde(rename = "avatarURL")]
    pub avatar_url: String,
}

impl From<&User> for PublicUser {
    fn from(u: &User) -> Self {
        Self { email: u.email.clone(), subscription: u.subscription, avatar_url: u.avatar_url.clone() }
    }
}

/// Email + password body shared by signup and login.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn from_json(body: &serde_json::Value) -> Result<Self, ModelError> {
        let obj = as_object(body)?;
        let email = required_string(obj, "email")?;
        validate_email("email", &email)?;
        let password = required_string(obj, "password")?;
        Ok(Self { email: normalize_email(&email), password })
    }
}

/// Emails are compared case-insensitively; store them trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_user_defaults_to_starter_without_token() {
        let u = User::new(" Ann@X.com ", "hash".into(), "//avatar".into());
        assert_eq!(u.email, "ann@x.com");
        assert_eq!(u.subscription, Subscription::Starter);
        assert!(u.token.is_none());
    }

    #[test]
    fn public_view_uses_avatar_url_key() {
        let u = User::new("ann@x.com", "hash".into(), "//avatar".into());
        let v = serde_json::to_value(PublicUser::from(&u)).unwrap();
        assert_eq!(v, json!({"email": "ann@x.com", "subscription": "starter", "avatarURL": "//avatar"}));
    }

    #[test]
    fn credentials_validation() {
        assert!(Credentials::from_json(&json!({"email": "a@b.co"})).is_err());
        assert!(Credentials::from_json(&json!({"email": "nope", "password": "x"})).is_err());
        let c = Credentials::from_json(&json!({"email": "A@B.co", "password": "x"})).unwrap();
        assert_eq!(c.email, "a@b.co");
    }
}
