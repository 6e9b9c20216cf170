use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        response::{ApiResponse, PaginationQuery},
        user_dto::{
            CreateUserPayload, CreateUserResponse, LoginPayload, LoginResponse, RegisterPayload,
            RegisterResponse, UpdateUserPayload, UpdateUserResponse, UserResponse,
        },
    },
    error::Result,
    AppState,
};

#[utoipa::path(
    post,
    path = "/user/register",
    request_body = RegisterPayload,
    responses(
        (status = 201, description = "User registered successfully", body = Json<RegisterResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Username, email, or phone number already exists")
    )
)]
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let result = state.user_service.register(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(result, "User registered successfully")),
    ))
}

#[utoipa::path(
    post,
    path = "/user/login",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Login successful", body = Json<LoginResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let result = state.user_service.login(payload).await?;
    Ok(Json(ApiResponse::success(result, "Login successful")))
}

#[utoipa::path(
    post,
    path = "/user",
    request_body = CreateUserPayload,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "User created successfully", body = Json<CreateUserResponse>),
        (status = 401, description = "Missing or invalid token"),
        (status = 409, description = "Username or email already exists")
    )
)]
#[axum::debug_handler]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let result = state.user_service.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(result, "Create user successfully")),
    ))
}

#[utoipa::path(
    patch,
    path = "/user",
    request_body = UpdateUserPayload,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User updated successfully", body = Json<UpdateUserResponse>),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Username or email already in use")
    )
)]
#[axum::debug_handler]
pub async fn update_user(
    State(state): State<AppState>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let result = state.user_service.update(payload).await?;
    Ok(Json(ApiResponse::success(result, "User updated successfully")))
}

#[utoipa::path(
    get,
    path = "/user/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User found", body = Json<UserResponse>),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let result = state.user_service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(result, "Get user successfully")))
}

#[utoipa::path(
    get,
    path = "/user",
    params(
        ("page" = Option<i64>, Query, description = "Page number, 1-based"),
        ("size" = Option<i64>, Query, description = "Items per page")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Paginated user list"),
        (status = 401, description = "Missing or invalid token")
    )
)]
#[axum::debug_handler]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<impl IntoResponse> {
    let result = state
        .user_service
        .get_all(query.page.unwrap_or(1), query.size.unwrap_or(10))
        .await?;
    Ok(Json(ApiResponse::success(result, "Get users successfully")))
}

#[utoipa::path(
    delete,
    path = "/user/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User soft-deleted", body = Json<UserResponse>),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let result = state.user_service.delete(id).await?;
    Ok(Json(ApiResponse::success(result, "User deleted successfully")))
}
