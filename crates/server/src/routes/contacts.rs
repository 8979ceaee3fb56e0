use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use common::types::MessageBody;
use models::contact::Contact;
use serde_json::Value;
use service::errors::ServiceError;
use tracing::info;

use crate::errors::JsonApiError;
use crate::state::ServerState;

fn not_found() -> JsonApiError {
    JsonApiError::not_found("not found")
}

#[utoipa::path(get, path = "/api/contacts", tag = "contacts",
    responses((status = 200, description = "All contacts", body = [crate::openapi::ContactDoc])))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Contact>>, JsonApiError> {
    let contacts = state.contacts.list().await?;
    info!(count = contacts.len(), "list contacts");
    Ok(Json(contacts))
}

#[utoipa::path(get, path = "/api/contacts/{id}", tag = "contacts",
    params(("id" = String, Path, description = "Contact id")),
    responses(
        (status = 200, description = "Contact", body = crate::openapi::ContactDoc),
        (status = 404, description = "Not found", body = crate::openapi::MessageDoc)
    ))]
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Contact>, JsonApiError> {
    match state.contacts.get(&id).await? {
        Some(contact) => Ok(Json(contact)),
        None => Err(JsonApiError::not_found("Not found")),
    }
}

#[utoipa::path(post, path = "/api/contacts", tag = "contacts",
    request_body = crate::openapi::ContactBodyDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::ContactDoc),
        (status = 400, description = "Validation error", body = crate::openapi::MessageDoc)
    ))]
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Contact>), JsonApiError> {
    let Json(body) = payload?;
    let contact = state.contacts.create(&body).await?;
    Ok((StatusCode::CREATED, Json(contact)))
}

#[utoipa::path(delete, path = "/api/contacts/{id}", tag = "contacts",
    params(("id" = String, Path, description = "Contact id")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::MessageDoc),
        (status = 404, description = "Not found", body = crate::openapi::MessageDoc)
    ))]
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, JsonApiError> {
    match state.contacts.delete(&id).await {
        Ok(()) => Ok(Json(MessageBody::new("Contact deleted"))),
        Err(ServiceError::NotFound(_)) => Err(not_found()),
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(put, path = "/api/contacts/{id}", tag = "contacts",
    params(("id" = String, Path, description = "Contact id")),
    request_body = crate::openapi::ContactBodyDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ContactDoc),
        (status = 400, description = "missing fields", body = crate::openapi::MessageDoc),
        (status = 404, description = "Not found", body = crate::openapi::MessageDoc)
    ))]
pub async fn replace(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Contact>, JsonApiError> {
    let Json(body) = payload.map_err(|_| JsonApiError::bad_request("missing fields"))?;
    match state.contacts.replace(&id, &body).await {
        Ok(contact) => Ok(Json(contact)),
        Err(ServiceError::Model(_) | ServiceError::Validation(_)) => Err(JsonApiError::bad_request("missing fields")),
        Err(ServiceError::NotFound(_)) => Err(not_found()),
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(patch, path = "/api/contacts/{id}", tag = "contacts",
    params(("id" = String, Path, description = "Contact id")),
    request_body = crate::openapi::ContactPatchDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ContactDoc),
        (status = 400, description = "Validation error", body = crate::openapi::MessageDoc),
        (status = 404, description = "Not found", body = crate::openapi::MessageDoc)
    ))]
pub async fn patch(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Contact>, JsonApiError> {
    let Json(body) = payload?;
    match state.contacts.patch(&id, &body).await {
        Ok(contact) => Ok(Json(contact)),
        Err(ServiceError::NotFound(_)) => Err(not_found()),
        Err(e) => Err(e.into()),
    }
}
