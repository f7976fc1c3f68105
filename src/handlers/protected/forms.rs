// handlers/protected/forms.rs - /api/v1/forms handlers

use axum::extract::State;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::{ApiJson, ApiPath, ApiQuery, ApiResponse, ApiResult};
use crate::auth::TenantContext;
use crate::database::models::{Form, FormActive, FormByCaseSubtype, FormInput, FormLock, FormPublish, FormSummary};
use crate::error::ApiError;
use crate::routes::AppState;
use crate::services::{FormFlag, FormService};

#[derive(Debug, Deserialize)]
pub struct FormQuery {
    pub id: Option<String>,
    pub version: Option<String>,
}

fn parse_form_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::bad_request(format!("Invalid form id '{}'", raw)))
}

/// GET /forms?id&version - one form at one version (draft when omitted)
pub async fn form_get(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiQuery(query): ApiQuery<FormQuery>,
) -> ApiResult<Form> {
    let id = query.id.as_deref().ok_or_else(|| ApiError::bad_request("id is required"))?;
    let form_id = parse_form_id(id)?;
    let version = query.version.as_deref().filter(|v| !v.is_empty()).unwrap_or("draft");

    let form = FormService::new(state.pool()).get(&ctx, form_id, version).await?;
    Ok(ApiResponse::success(form))
}

/// GET /forms/getAllForms
pub async fn form_list(State(state): State<AppState>, ctx: TenantContext) -> ApiResult<Vec<FormSummary>> {
    let forms = FormService::new(state.pool()).list(&ctx).await?;
    Ok(ApiResponse::success(forms))
}

/// POST /forms
pub async fn form_create(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiJson(input): ApiJson<FormInput>,
) -> ApiResult<Value> {
    let form_id = FormService::new(state.pool()).create(&ctx, &input).await?;

    Ok(ApiResponse::success(json!({ "formId": form_id })).with_desc("Create successfully"))
}

/// PATCH /forms/:id
pub async fn form_update(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<String>,
    ApiJson(input): ApiJson<FormInput>,
) -> ApiResult<Value> {
    let form_id = parse_form_id(&id)?;
    FormService::new(state.pool()).update(&ctx, form_id, &input).await?;
    Ok(ApiResponse::done("Update successfully"))
}

/// PATCH /forms/publish
pub async fn form_publish(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiJson(input): ApiJson<FormPublish>,
) -> ApiResult<Value> {
    FormService::new(state.pool())
        .set_flag(&ctx, input.form_id, FormFlag::Publish, input.publish)
        .await?;
    Ok(ApiResponse::done("Update successfully"))
}

/// PATCH /forms/lock
pub async fn form_lock(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiJson(input): ApiJson<FormLock>,
) -> ApiResult<Value> {
    FormService::new(state.pool())
        .set_flag(&ctx, input.form_id, FormFlag::Lock, input.locks)
        .await?;
    Ok(ApiResponse::done("Update successfully"))
}

/// PATCH /forms/active
pub async fn form_active(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiJson(input): ApiJson<FormActive>,
) -> ApiResult<Value> {
    FormService::new(state.pool())
        .set_flag(&ctx, input.form_id, FormFlag::Active, input.active)
        .await?;
    Ok(ApiResponse::done("Update successfully"))
}

/// DELETE /forms/:id
pub async fn form_delete(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Value> {
    let form_id = parse_form_id(&id)?;
    FormService::new(state.pool()).delete(&ctx, form_id).await?;
    Ok(ApiResponse::done("Delete successfully"))
}

/// POST /forms/casesubtype
pub async fn form_by_case_subtype(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiJson(input): ApiJson<FormByCaseSubtype>,
) -> ApiResult<Form> {
    if input.case_sub_type.trim().is_empty() {
        return Err(ApiError::bad_request("caseSubType is required"));
    }

    let form = FormService::new(state.pool())
        .by_case_subtype(&ctx, input.case_sub_type.trim())
        .await?;
    Ok(ApiResponse::success(form))
}
