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
        role_dto::{CreateRolePayload, RoleResponse, UpdateRolePayload},
    },
    error::Result,
    AppState,
};

#[utoipa::path(
    post,
    path = "/role",
    request_body = CreateRolePayload,
    responses(
        (status = 201, description = "Role created successfully", body = Json<RoleResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Role name already exists")
    )
)]
#[axum::debug_handler]
pub async fn create_role(
    State(state): State<AppState>,
    Json(payload): Json<CreateRolePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let role = state.role_service.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(role, "Role created successfully")),
    ))
}

#[utoipa::path(
    put,
    path = "/role",
    request_body = UpdateRolePayload,
    responses(
        (status = 200, description = "Role updated successfully", body = Json<RoleResponse>),
        (status = 404, description = "Role not found"),
        (status = 409, description = "Role name already exists")
    )
)]
#[axum::debug_handler]
pub async fn update_role(
    State(state): State<AppState>,
    Json(payload): Json<UpdateRolePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let role = state.role_service.update(payload).await?;
    Ok(Json(ApiResponse::success(role, "Role updated successfully")))
}

#[utoipa::path(
    delete,
    path = "/role/{id}",
    params(
        ("id" = Uuid, Path, description = "Role ID")
    ),
    responses(
        (status = 200, description = "Role deleted successfully", body = Json<RoleResponse>),
        (status = 404, description = "Role not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let role = state.role_service.delete(id).await?;
    Ok(Json(ApiResponse::success(role, "Role deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/role",
    params(
        ("page" = Option<i64>, Query, description = "Page number, 1-based"),
        ("size" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Paginated role list")
    )
)]
#[axum::debug_handler]
pub async fn list_roles(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<impl IntoResponse> {
    let result = state
        .role_service
        .get_all(query.page.unwrap_or(1), query.size.unwrap_or(10))
        .await?;
    Ok(Json(ApiResponse::success(result, "Get roles successfully")))
}

#[utoipa::path(
    get,
    path = "/role/filter",
    params(
        ("page" = Option<i64>, Query, description = "Page number; non-positive returns everything"),
        ("size" = Option<i64>, Query, description = "Items per page; non-positive returns everything")
    ),
    responses(
        (status = 200, description = "Label/value role listing")
    )
)]
#[axum::debug_handler]
pub async fn filter_roles(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<impl IntoResponse> {
    let result = state
        .role_service
        .get_filter(query.page.unwrap_or(0), query.size.unwrap_or(0))
        .await?;
    Ok(Json(ApiResponse::success(
        result,
        "Get role filter successfully",
    )))
}
