use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub case_id: String,
    pub case_type: String,
    pub case_detail: String,
    pub recipient: String,
    pub sender: String,
    pub message: String,
    pub event_type: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
    pub redirect_url: String,
}

/// Client-supplied fields. `id`, `caseId` and `createdAt` are always server-generated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationInput {
    pub case_type: String,
    pub case_detail: String,
    pub recipient: String,
    pub sender: String,
    pub message: String,
    pub event_type: String,
    pub read: bool,
    pub redirect_url: String,
}
