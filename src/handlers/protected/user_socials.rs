// handlers/protected/user_socials.rs - /api/v1/users_with_socials handlers

use axum::extract::State;
use serde_json::{json, Value};

use crate::api::{ApiJson, ApiPath, ApiQuery, ApiResponse, ApiResult, PageQuery};
use crate::auth::TenantContext;
use crate::database::models::{UserSocial, UserSocialInput, UserSocialUpdate};
use crate::routes::AppState;
use crate::services::UserSocialService;

pub async fn social_list(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Vec<UserSocial>> {
    let socials = UserSocialService::new(state.pool())
        .list(&ctx, query.page(state.page_length))
        .await?;
    Ok(ApiResponse::success(socials))
}

pub async fn social_get(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<UserSocial> {
    let social = UserSocialService::new(state.pool()).get(&ctx, id).await?;
    Ok(ApiResponse::success(social))
}

pub async fn social_by_username(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(username): ApiPath<String>,
) -> ApiResult<Vec<UserSocial>> {
    let socials = UserSocialService::new(state.pool()).by_username(&ctx, &username).await?;
    Ok(ApiResponse::success(socials))
}

pub async fn social_create(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiJson(input): ApiJson<UserSocialInput>,
) -> ApiResult<Value> {
    let id = UserSocialService::new(state.pool()).create(&ctx, &input).await?;
    Ok(ApiResponse::success(json!({ "id": id })).with_desc("Create successfully"))
}

pub async fn social_update(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<UserSocialUpdate>,
) -> ApiResult<Value> {
    UserSocialService::new(state.pool()).update(&ctx, id, &input).await?;
    Ok(ApiResponse::done("Update successfully"))
}

pub async fn social_delete(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Value> {
    UserSocialService::new(state.pool()).delete(&ctx, id).await?;
    Ok(ApiResponse::done("Delete successfully"))
}
