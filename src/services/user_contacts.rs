use chrono::Utc;
use sqlx::PgPool;

use crate::api::Page;
use crate::auth::TenantContext;
use crate::database::models::{UserContact, UserContactInput, UserContactUpdate};
use crate::database::row::{map_row, map_rows};

use super::{require_affected, ServiceError};

const CONTACT_COLUMNS: &str = "id, org_id, username, contact_name, contact_phone, contact_addr, \
                               created_at, updated_at, created_by, updated_by";

pub struct UserContactService {
    pool: PgPool,
}

impl UserContactService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, ctx: &TenantContext, page: Page) -> Result<Vec<UserContact>, ServiceError> {
        let sql = format!(
            "SELECT {CONTACT_COLUMNS} FROM um_user_contacts WHERE org_id = $1 ORDER BY id LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query(&sql)
            .bind(&ctx.org_id)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(map_rows(&rows, "user contact"))
    }

    pub async fn get(&self, ctx: &TenantContext, id: i64) -> Result<UserContact, ServiceError> {
        let sql = format!("SELECT {CONTACT_COLUMNS} FROM um_user_contacts WHERE id = $1 AND org_id = $2");
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(&ctx.org_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("user contact"))?;

        map_row(&row, "user contact")
    }

    pub async fn by_username(&self, ctx: &TenantContext, username: &str) -> Result<Vec<UserContact>, ServiceError> {
        let sql = format!(
            "SELECT {CONTACT_COLUMNS} FROM um_user_contacts WHERE username = $1 AND org_id = $2 ORDER BY id"
        );
        let rows = sqlx::query(&sql)
            .bind(username)
            .bind(&ctx.org_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(map_rows(&rows, "user contact"))
    }

    pub async fn create(&self, ctx: &TenantContext, input: &UserContactInput) -> Result<i64, ServiceError> {
        if input.username.trim().is_empty() {
            return Err(ServiceError::invalid("username is required"));
        }

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO um_user_contacts \
             (org_id, username, contact_name, contact_phone, contact_addr, created_at, updated_at, created_by, updated_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $6, $7, $7) RETURNING id",
        )
        .bind(&ctx.org_id)
        .bind(&input.username)
        .bind(&input.contact_name)
        .bind(&input.contact_phone)
        .bind(&input.contact_addr)
        .bind(Utc::now())
        .bind(&ctx.username)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    pub async fn update(&self, ctx: &TenantContext, id: i64, input: &UserContactUpdate) -> Result<(), ServiceError> {
        let result = sqlx::query(
            "UPDATE um_user_contacts \
             SET contact_name = $3, contact_phone = $4, contact_addr = $5, updated_at = $6, updated_by = $7 \
             WHERE id = $1 AND org_id = $2",
        )
        .bind(id)
        .bind(&ctx.org_id)
        .bind(&input.contact_name)
        .bind(&input.contact_phone)
        .bind(&input.contact_addr)
        .bind(Utc::now())
        .bind(&ctx.username)
        .execute(&self.pool)
        .await?;

        require_affected(result.rows_affected(), "user contact")
    }

    pub async fn delete(&self, ctx: &TenantContext, id: i64) -> Result<(), ServiceError> {
        sqlx::query("DELETE FROM um_user_contacts WHERE id = $1 AND org_id = $2")
            .bind(id)
            .bind(&ctx.org_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
