use axum::{extract::{Request, State}, http::{header, HeaderMap}, middleware::Next, response::Response};
use axum_extra::extract::cookie::CookieJar;
use models::user::User;

use crate::errors::JsonApiError;
use crate::state::ServerState;

/// Cookie set on login and accepted in place of an `Authorization` header.
pub const AUTH_COOKIE: &str = "auth_token";

/// Authenticated user, inserted into request extensions by [`require_user`].
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// Bearer token from `Authorization`, falling back to the `auth_token` cookie.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(h) = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        return h
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
    }
    CookieJar::from_headers(headers)
        .get(AUTH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
}

/// Route middleware: resolve the caller's token to a user or answer 401.
pub async fn require_user(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let path = req.uri().path().to_string();
    let Some(token) = extract_token(req.headers()) else {
        tracing::warn!(%path, "missing Authorization header and auth_token cookie");
        return Err(JsonApiError::not_authorized());
    };

    match state.auth.authenticate(&token).await {
        Ok(user) => {
            req.extensions_mut().insert(CurrentUser(user));
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(%path, err = %e, "token validation failed");
            Err(JsonApiError::from(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_header_wins_over_cookie() {
        let mut h = HeaderMap::new();
        h.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        h.insert(header::COOKIE, HeaderValue::from_static("auth_token=zzz"));
        assert_eq!(extract_token(&h).as_deref(), Some("abc"));
    }

    #[test]
    fn cookie_fallback_and_malformed_header() {
        let mut h = HeaderMap::new();
        h.insert(header::COOKIE, HeaderValue::from_static("theme=dark; auth_token=zzz"));
        assert_eq!(extract_token(&h).as_deref(), Some("zzz"));

        let mut bad = HeaderMap::new();
        bad.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(extract_token(&bad), None);
        assert_eq!(extract_token(&HeaderMap::new()), None);
    }
}
