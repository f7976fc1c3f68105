// handlers/protected/users.rs - /api/v1/users handlers

use axum::extract::State;
use serde_json::{json, Value};

use crate::api::{ApiJson, ApiPath, ApiQuery, ApiResponse, ApiResult, PageQuery};
use crate::auth::TenantContext;
use crate::database::models::{User, UserInput};
use crate::routes::AppState;
use crate::services::users::UserKey;
use crate::services::UserService;

/// GET /users?start&length
pub async fn user_list(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Vec<User>> {
    let page = query.page(state.page_length);
    let users = UserService::new(state.pool()).list(&ctx, page).await?;
    Ok(ApiResponse::success(users))
}

/// GET /users/:id
pub async fn user_get(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<User> {
    let user = UserService::new(state.pool()).get(&ctx, id).await?;
    Ok(ApiResponse::success(user))
}

/// GET /users/username/:username
pub async fn user_get_by_username(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(username): ApiPath<String>,
) -> ApiResult<User> {
    let user = UserService::new(state.pool()).get_by_username(&ctx, &username).await?;
    Ok(ApiResponse::success(user))
}

/// POST /users/add
pub async fn user_create(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiJson(input): ApiJson<UserInput>,
) -> ApiResult<Value> {
    let id = UserService::new(state.pool()).create(&ctx, &input).await?;
    Ok(ApiResponse::success(json!({ "id": id })).with_desc("Create successfully"))
}

/// PATCH /users/:id
pub async fn user_update(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<UserInput>,
) -> ApiResult<Value> {
    UserService::new(state.pool()).update(&ctx, UserKey::Id(id), &input).await?;
    Ok(ApiResponse::done("Update successfully"))
}

/// PATCH /users/username/:username
pub async fn user_update_by_username(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(username): ApiPath<String>,
    ApiJson(input): ApiJson<UserInput>,
) -> ApiResult<Value> {
    UserService::new(state.pool())
        .update(&ctx, UserKey::Username(&username), &input)
        .await?;
    Ok(ApiResponse::done("Update successfully"))
}

/// DELETE /users/:id
pub async fn user_delete(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Value> {
    UserService::new(state.pool()).delete(&ctx, id).await?;
    Ok(ApiResponse::done("Delete successfully"))
}
