use axum::{
    extract::{OriginalUri, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use axum_helpers::{
    errors::responses::{BadRequestIdResponse, BadRequestValidationResponse},
    IdPath, ServiceResponse, ValidatedJson,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::entity;
use crate::models::{CreateUser, UpdateUser, User};
use crate::repository::UserRepository;
use crate::service::UserService;

/// OpenAPI documentation for Users API
#[derive(OpenApi)]
#[openapi(
    paths(list_users, create_user, get_user, update_user, delete_user),
    components(
        schemas(User, CreateUser, UpdateUser),
        responses(BadRequestValidationResponse, BadRequestIdResponse)
    ),
    tags(
        (name = entity::Model::TAG, description = "User management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the user router with all HTTP endpoints
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_users).post(create_user))
        .route(
            "/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .with_state(shared_service)
}

/// List all users, newest first
#[utoipa::path(
    get,
    path = "",
    tag = entity::Model::TAG,
    responses(
        (status = 200, description = "List of users", body = ServiceResponse<Vec<User>>),
        (status = 500, description = "Store failure", body = ServiceResponse<Vec<User>>)
    )
)]
async fn list_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
) -> ServiceResponse<Vec<User>> {
    service.list_users().await
}

/// Create a new user
///
/// Answers `201` with a `Location` header pointing at the new resource.
#[utoipa::path(
    post,
    path = "",
    tag = entity::Model::TAG,
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created successfully", body = ServiceResponse<User>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, description = "Email already in use", body = ServiceResponse<User>),
        (status = 500, description = "Store failure", body = ServiceResponse<User>)
    )
)]
async fn create_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    OriginalUri(uri): OriginalUri,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> Response {
    let envelope = service.create_user(input).await;

    match envelope.result.as_ref().map(|user| user.id) {
        Some(id) if envelope.success => {
            let location = format!("{}/{}", uri.path().trim_end_matches('/'), id);
            (
                StatusCode::CREATED,
                [(header::LOCATION, location)],
                Json(envelope),
            )
                .into_response()
        }
        _ => envelope.into_response(),
    }
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = entity::Model::TAG,
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = ServiceResponse<User>),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, description = "User not found", body = ServiceResponse<User>),
        (status = 500, description = "Store failure", body = ServiceResponse<User>)
    )
)]
async fn get_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    IdPath(id): IdPath,
) -> ServiceResponse<User> {
    service.get_user(id).await
}

/// Replace a user's name and email
#[utoipa::path(
    put,
    path = "/{id}",
    tag = entity::Model::TAG,
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated successfully", body = ServiceResponse<User>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, description = "User not found", body = ServiceResponse<User>),
        (status = 409, description = "Email already in use", body = ServiceResponse<User>),
        (status = 500, description = "Store failure", body = ServiceResponse<User>)
    )
)]
async fn update_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateUser>,
) -> ServiceResponse<User> {
    service.update_user(id, input).await
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = entity::Model::TAG,
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted successfully", body = ServiceResponse<bool>),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, description = "User not found", body = ServiceResponse<bool>),
        (status = 500, description = "Store failure", body = ServiceResponse<bool>)
    )
)]
async fn delete_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    IdPath(id): IdPath,
) -> ServiceResponse<bool> {
    service.delete_user(id).await
}
