use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct MessageDoc { pub message: String }

#[derive(ToSchema)]
pub struct ContactDoc { pub id: String, pub name: String, pub email: String, pub phone: String }

#[derive(ToSchema)]
pub struct ContactBodyDoc { pub name: String, pub email: String, pub phone: String }

#[derive(ToSchema)]
pub struct ContactPatchDoc {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(ToSchema)]
pub struct CredentialsDoc { pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct PublicUserDoc {
    pub email: String,
    pub subscription: String,
    #[schema(rename = "avatarURL")]
    pub avatar_url: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::contacts::list,
        crate::routes::contacts::get,
        crate::routes::contacts::create,
        crate::routes::contacts::remove,
        crate::routes::contacts::replace,
        crate::routes::contacts::patch,
        crate::routes::users::signup,
        crate::routes::users::login,
        crate::routes::users::logout,
        crate::routes::users::current,
        crate::routes::users::upload_avatar,
    ),
    components(
        schemas(
            HealthResponse,
            MessageDoc,
            ContactDoc,
            ContactBodyDoc,
            ContactPatchDoc,
            CredentialsDoc,
            PublicUserDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "contacts"),
        (name = "users")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for p in [
            "/health",
            "/api/contacts",
            "/api/contacts/{id}",
            "/api/users/signup",
            "/api/users/login",
            "/api/users/logout",
            "/api/users/current",
            "/api/users/avatars",
        ] {
            assert!(paths.iter().any(|k| k.as_str() == p), "missing {p}");
        }
    }
}
