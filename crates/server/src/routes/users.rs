use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    http::StatusCode,
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use common::types::MessageBody;
use models::user::{Credentials, PublicUser};
use serde::Serialize;
use serde_json::Value;
use service::avatars::{AvatarUpload, NOT_A_PHOTO};

use super::auth::{CurrentUser, AUTH_COOKIE};
use crate::errors::JsonApiError;
use crate::state::ServerState;

#[derive(Serialize)]
pub struct SignupOutput { pub user: PublicUser }

#[derive(Serialize)]
pub struct LoginOutput { pub token: String, pub user: PublicUser }

#[derive(Serialize)]
pub struct AvatarOutput {
    #[serde(rename = "avatarURL")]
    pub avatar_url: String,
}

/// Multipart field carrying the avatar image.
const AVATAR_FIELD: &str = "picture";

fn credentials(payload: Result<Json<Value>, JsonRejection>) -> Result<Credentials, JsonApiError> {
    let Json(body) = payload?;
    Credentials::from_json(&body).map_err(|e| JsonApiError::bad_request(e.to_string()))
}

#[utoipa::path(post, path = "/api/users/signup", tag = "users",
    request_body = crate::openapi::CredentialsDoc,
    responses(
        (status = 201, description = "Registered"),
        (status = 400, description = "Bad Request", body = crate::openapi::MessageDoc),
        (status = 409, description = "Email in use", body = crate::openapi::MessageDoc)
    ))]
pub async fn signup(
    State(state): State<ServerState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<SignupOutput>), JsonApiError> {
    let input = credentials(payload)?;
    let user = state.auth.signup(input).await?;
    Ok((StatusCode::CREATED, Json(SignupOutput { user })))
}

#[utoipa::path(post, path = "/api/users/login", tag = "users",
    request_body = crate::openapi::CredentialsDoc,
    responses(
        (status = 200, description = "Logged in"),
        (status = 400, description = "Bad Request", body = crate::openapi::MessageDoc),
        (status = 401, description = "Email or password is wrong", body = crate::openapi::MessageDoc)
    ))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(CookieJar, Json<LoginOutput>), JsonApiError> {
    let input = credentials(payload)?;
    let session = state.auth.login(input).await?;

    let mut cookie = Cookie::new(AUTH_COOKIE, session.token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    let jar = jar.add(cookie);
    Ok((jar, Json(LoginOutput { token: session.token, user: session.user })))
}

#[utoipa::path(get, path = "/api/users/logout", tag = "users",
    responses(
        (status = 200, description = "Logged out", body = crate::openapi::MessageDoc),
        (status = 401, description = "Not authorized", body = crate::openapi::MessageDoc)
    ))]
pub async fn logout(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<MessageBody>), JsonApiError> {
    state.auth.logout(user.id).await?;
    let jar = jar.remove(Cookie::build(AUTH_COOKIE).path("/"));
    Ok((jar, Json(MessageBody::new("user logged out"))))
}

#[utoipa::path(get, path = "/api/users/current", tag = "users",
    responses(
        (status = 200, description = "Current user"),
        (status = 401, description = "Not authorized", body = crate::openapi::MessageDoc)
    ))]
pub async fn current(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<PublicUser> {
    Json(PublicUser::from(&user))
}

#[utoipa::path(post, path = "/api/users/avatars", tag = "users",
    request_body(content = String, content_type = "multipart/form-data", description = "`picture` image field"),
    responses(
        (status = 200, description = "Avatar updated"),
        (status = 400, description = "File isn't a photo", body = crate::openapi::MessageDoc),
        (status = 401, description = "Not authorized", body = crate::openapi::MessageDoc),
        (status = 413, description = "File too large", body = crate::openapi::MessageDoc)
    ))]
pub async fn upload_avatar(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> Result<Json<AvatarOutput>, JsonApiError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| JsonApiError::new(e.status(), e.body_text()))?
    {
        if field.name() != Some(AVATAR_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| JsonApiError::new(e.status(), e.body_text()))?;
        upload = Some(AvatarUpload { file_name, content_type, bytes: bytes.to_vec() });
        break;
    }

    let upload = upload.ok_or_else(|| JsonApiError::bad_request(NOT_A_PHOTO))?;
    let avatar_url = state.avatars.store(upload).await?;
    let public = state.auth.update_avatar(user.id, &avatar_url).await?;
    Ok(Json(AvatarOutput { avatar_url: public.avatar_url }))
}
