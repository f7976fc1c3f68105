// handlers/protected/user_skills.rs - /api/v1/users_with_skills handlers

use axum::extract::State;
use serde_json::{json, Value};

use crate::api::{ApiJson, ApiPath, ApiQuery, ApiResponse, ApiResult, PageQuery};
use crate::auth::TenantContext;
use crate::database::models::{UserSkill, UserSkillInput, UserSkillUpdate};
use crate::routes::AppState;
use crate::services::UserSkillService;

pub async fn skill_list(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Vec<UserSkill>> {
    let skills = UserSkillService::new(state.pool())
        .list(&ctx, query.page(state.page_length))
        .await?;
    Ok(ApiResponse::success(skills))
}

pub async fn skill_get(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<UserSkill> {
    let skill = UserSkillService::new(state.pool()).get(&ctx, id).await?;
    Ok(ApiResponse::success(skill))
}

pub async fn skill_by_username(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(username): ApiPath<String>,
) -> ApiResult<Vec<UserSkill>> {
    let skills = UserSkillService::new(state.pool()).by_username(&ctx, &username).await?;
    Ok(ApiResponse::success(skills))
}

pub async fn skill_by_skill_id(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(skill_id): ApiPath<String>,
) -> ApiResult<Vec<UserSkill>> {
    let skills = UserSkillService::new(state.pool()).by_skill_id(&ctx, &skill_id).await?;
    Ok(ApiResponse::success(skills))
}

pub async fn skill_create(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiJson(input): ApiJson<UserSkillInput>,
) -> ApiResult<Value> {
    let id = UserSkillService::new(state.pool()).create(&ctx, &input).await?;
    Ok(ApiResponse::success(json!({ "id": id })).with_desc("Create successfully"))
}

pub async fn skill_update(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<UserSkillUpdate>,
) -> ApiResult<Value> {
    UserSkillService::new(state.pool()).update(&ctx, id, &input).await?;
    Ok(ApiResponse::done("Update successfully"))
}

pub async fn skill_delete(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Value> {
    UserSkillService::new(state.pool()).delete(&ctx, id).await?;
    Ok(ApiResponse::done("Delete successfully"))
}
