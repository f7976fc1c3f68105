// handlers/protected/notifications.rs - /api/v1/notifications handlers

use axum::extract::State;
use serde_json::Value;

use crate::api::{ApiJson, ApiPath, ApiResponse, ApiResult};
use crate::auth::TenantContext;
use crate::database::models::{Notification, NotificationInput};
use crate::routes::AppState;
use crate::services::NotificationService;

/// GET /notifications/noti/:id
pub async fn notification_get(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Notification> {
    let notification = NotificationService::new(state.pool()).get(&ctx, &id).await?;
    Ok(ApiResponse::success(notification))
}

/// GET /notifications/recipient/:username
pub async fn notification_by_recipient(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(username): ApiPath<String>,
) -> ApiResult<Vec<Notification>> {
    let notifications = NotificationService::new(state.pool()).by_recipient(&ctx, &username).await?;
    Ok(ApiResponse::success(notifications))
}

/// POST /notifications/new
///
/// The record is pushed to the recipient's live sockets after it is stored.
/// That push is queued and its outcome never reaches this response.
pub async fn notification_create(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiJson(input): ApiJson<NotificationInput>,
) -> ApiResult<Notification> {
    let notification = NotificationService::new(state.pool()).create(&ctx, &input).await?;

    state.hub.deliver(&ctx.org_id, &notification);

    Ok(ApiResponse::success(notification).with_desc("Create successfully"))
}

/// PUT /notifications/edit/:id
pub async fn notification_update(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<String>,
    ApiJson(input): ApiJson<NotificationInput>,
) -> ApiResult<Notification> {
    let notification = NotificationService::new(state.pool()).update(&ctx, &id, &input).await?;
    Ok(ApiResponse::success(notification).with_desc("Update successfully"))
}

/// DELETE /notifications/delete/:id
pub async fn notification_delete(
    State(state): State<AppState>,
    ctx: TenantContext,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Value> {
    NotificationService::new(state.pool()).delete(&ctx, &id).await?;
    Ok(ApiResponse::done("Delete successfully"))
}
