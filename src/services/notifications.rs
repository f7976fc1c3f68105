use chrono::{DateTime, Timelike, Utc};
use rand::{distributions::Uniform, Rng};
use sqlx::PgPool;

use crate::auth::TenantContext;
use crate::database::models::{Notification, NotificationInput};
use crate::database::row::{map_row, map_rows};

use super::{require_affected, ServiceError};

const NOTIFICATION_COLUMNS: &str = "id, case_id, case_type, case_detail, recipient, sender, message, \
                                    event_type, created_at, read, redirect_url";

const CASE_ID_LEN: usize = 10;

/// `D` + `yyMMddHHmmss` + seven digits of sub-second ticks (100ns)
pub fn notification_id(at: DateTime<Utc>) -> String {
    let ticks = (at.nanosecond() / 100).min(9_999_999);
    format!("D{}{:07}", at.format("%y%m%d%H%M%S"), ticks)
}

/// Random lowercase case reference
pub fn random_case_id() -> String {
    rand::thread_rng()
        .sample_iter(Uniform::new_inclusive(b'a', b'z'))
        .take(CASE_ID_LEN)
        .map(char::from)
        .collect()
}

pub struct NotificationService {
    pool: PgPool,
}

impl NotificationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, ctx: &TenantContext, id: &str) -> Result<Notification, ServiceError> {
        let sql = format!("SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = $1 AND org_id = $2");
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(&ctx.org_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("notification"))?;

        map_row(&row, "notification")
    }

    /// Newest first
    pub async fn by_recipient(&self, ctx: &TenantContext, recipient: &str) -> Result<Vec<Notification>, ServiceError> {
        if recipient.trim().is_empty() {
            return Err(ServiceError::invalid("recipient is required"));
        }

        let sql = format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications \
             WHERE recipient = $1 AND org_id = $2 ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(recipient)
            .bind(&ctx.org_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(map_rows(&rows, "notification"))
    }

    /// Persist a notification with a server-generated id, case id and timestamp
    pub async fn create(&self, ctx: &TenantContext, input: &NotificationInput) -> Result<Notification, ServiceError> {
        if input.recipient.trim().is_empty() {
            return Err(ServiceError::invalid("recipient is required"));
        }

        let now = Utc::now();
        let id = notification_id(now);
        let case_id = random_case_id();

        let sql = format!(
            "INSERT INTO notifications \
             (id, org_id, case_id, case_type, case_detail, recipient, sender, message, event_type, created_at, read, redirect_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, FALSE, $11) \
             RETURNING {NOTIFICATION_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(&id)
            .bind(&ctx.org_id)
            .bind(&case_id)
            .bind(&input.case_type)
            .bind(&input.case_detail)
            .bind(&input.recipient)
            .bind(&input.sender)
            .bind(&input.message)
            .bind(&input.event_type)
            .bind(now)
            .bind(&input.redirect_url)
            .fetch_one(&self.pool)
            .await?;

        tracing::info!("Created notification {} for {} in org {}", id, input.recipient, ctx.org_id);
        map_row(&row, "notification")
    }

    /// Replace the editable fields and return the stored record
    pub async fn update(&self, ctx: &TenantContext, id: &str, input: &NotificationInput) -> Result<Notification, ServiceError> {
        let sql = format!(
            "UPDATE notifications \
             SET case_type = $3, case_detail = $4, recipient = $5, sender = $6, message = $7, \
                 event_type = $8, read = $9, redirect_url = $10 \
             WHERE id = $1 AND org_id = $2 \
             RETURNING {NOTIFICATION_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(&ctx.org_id)
            .bind(&input.case_type)
            .bind(&input.case_detail)
            .bind(&input.recipient)
            .bind(&input.sender)
            .bind(&input.message)
            .bind(&input.event_type)
            .bind(input.read)
            .bind(&input.redirect_url)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("notification"))?;

        map_row(&row, "notification")
    }

    pub async fn delete(&self, ctx: &TenantContext, id: &str) -> Result<(), ServiceError> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND org_id = $2")
            .bind(id)
            .bind(&ctx.org_id)
            .execute(&self.pool)
            .await?;

        require_affected(result.rows_affected(), "notification")
    }
}
