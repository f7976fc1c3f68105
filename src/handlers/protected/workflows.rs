// handlers/protected/workflows.rs - /api/v1/workflows handlers

use axum::extract::State;
use serde_json::{json, Value};

use crate::api::{ApiJson, ApiPath, ApiResponse, ApiResult};
use crate::auth::TenantContext;
use crate::database::models::{Workflow, WorkflowInput};
use crate::routes::AppState;
use crate::services::WorkflowService;

/// GET /workflows
pub async fn workflow_list(State(state): State<AppState>, ctx: TenantContext) -> ApiResult<Vec<Workflow>> {
    let workflows = WorkflowService::new(state.pool()).list(&ctx).await?;
    Ok(ApiResponse::success(workflows))
}

/// GET /workflows/:id
pub async fn workflow_get(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(wf_id): ApiPath<String>,
) -> ApiResult<Workflow> {
    let workflow = WorkflowService::new(state.pool()).get(&ctx, &wf_id).await?;
    Ok(ApiResponse::success(workflow))
}

/// POST /workflows
pub async fn workflow_create(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiJson(input): ApiJson<WorkflowInput>,
) -> ApiResult<Value> {
    let wf_id = WorkflowService::new(state.pool()).create(&ctx, &input).await?;
    Ok(ApiResponse::success(json!({ "wfId": wf_id })).with_desc("Create successfully"))
}

/// PATCH /workflows/:id
pub async fn workflow_update(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(wf_id): ApiPath<String>,
    ApiJson(input): ApiJson<WorkflowInput>,
) -> ApiResult<Value> {
    WorkflowService::new(state.pool()).update(&ctx, &wf_id, &input).await?;
    Ok(ApiResponse::done("Update successfully"))
}

/// DELETE /workflows/:id
pub async fn workflow_delete(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(wf_id): ApiPath<String>,
) -> ApiResult<Value> {
    WorkflowService::new(state.pool()).delete(&ctx, &wf_id).await?;
    Ok(ApiResponse::done("Delete successfully"))
}
