use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserSocial {
    pub id: i64,
    pub org_id: String,
    pub username: String,
    pub social_type: String,
    pub social_id: String,
    pub social_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_by: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSocialInput {
    pub username: String,
    #[serde(default)]
    pub social_type: String,
    #[serde(default)]
    pub social_id: String,
    #[serde(default)]
    pub social_name: String,
}

/// `username` may be moved to another user; omitted keeps the current owner
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSocialUpdate {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub social_type: String,
    #[serde(default)]
    pub social_id: String,
    #[serde(default)]
    pub social_name: String,
}
