// handlers/protected/user_contacts.rs - /api/v1/users_with_contacts handlers

use axum::extract::State;
use serde_json::{json, Value};

use crate::api::{ApiJson, ApiPath, ApiQuery, ApiResponse, ApiResult, PageQuery};
use crate::auth::TenantContext;
use crate::database::models::{UserContact, UserContactInput, UserContactUpdate};
use crate::routes::AppState;
use crate::services::UserContactService;

pub async fn contact_list(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Vec<UserContact>> {
    let contacts = UserContactService::new(state.pool())
        .list(&ctx, query.page(state.page_length))
        .await?;
    Ok(ApiResponse::success(contacts))
}

pub async fn contact_get(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<UserContact> {
    let contact = UserContactService::new(state.pool()).get(&ctx, id).await?;
    Ok(ApiResponse::success(contact))
}

pub async fn contact_by_username(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(username): ApiPath<String>,
) -> ApiResult<Vec<UserContact>> {
    let contacts = UserContactService::new(state.pool()).by_username(&ctx, &username).await?;
    Ok(ApiResponse::success(contacts))
}

pub async fn contact_create(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiJson(input): ApiJson<UserContactInput>,
) -> ApiResult<Value> {
    let id = UserContactService::new(state.pool()).create(&ctx, &input).await?;
    Ok(ApiResponse::success(json!({ "id": id })).with_desc("Create successfully"))
}

pub async fn contact_update(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<UserContactUpdate>,
) -> ApiResult<Value> {
    UserContactService::new(state.pool()).update(&ctx, id, &input).await?;
    Ok(ApiResponse::done("Update successfully"))
}

pub async fn contact_delete(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Value> {
    UserContactService::new(state.pool()).delete(&ctx, id).await?;
    Ok(ApiResponse::done("Delete successfully"))
}
