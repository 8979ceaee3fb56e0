use models::user::normalize_email;
use sha2::{Digest, Sha256};

const GRAVATAR_BASE: &str = "https://www.gravatar.com/avatar";

/// Default avatar for an email: Gravatar keyed by the SHA-256 of the
/// trimmed, lowercased address.
pub fn gravatar_url(email: &str) -> String {
    let digest = Sha256::digest(normalize_email(email).as_bytes());
    format!("{}/{}", GRAVATAR_BASE, hex::encode(digest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_ignores_case_and_whitespace() {
        assert_eq!(gravatar_url(" Ann@X.com "), gravatar_url("ann@x.com"));
    }

    #[test]
    fn url_carries_sha256_hex() {
        let url = gravatar_url("ann@x.com");
        let hash = url.rsplit('/').next().unwrap();
        assert!(url.starts_with("https://www.gravatar.com/avatar/"));
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
