use chrono::Utc;
use sqlx::PgPool;

use crate::api::Page;
use crate::auth::TenantContext;
use crate::database::models::{UserSocial, UserSocialInput, UserSocialUpdate};
use crate::database::row::{map_row, map_rows};

use super::{require_affected, ServiceError};

const SOCIAL_COLUMNS: &str =
    "id, org_id, username, social_type, social_id, social_name, created_at, updated_at, created_by, updated_by";

pub struct UserSocialService {
    pool: PgPool,
}

impl UserSocialService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, ctx: &TenantContext, page: Page) -> Result<Vec<UserSocial>, ServiceError> {
        let sql = format!(
            "SELECT {SOCIAL_COLUMNS} FROM um_user_with_socials WHERE org_id = $1 ORDER BY id LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query(&sql)
            .bind(&ctx.org_id)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(map_rows(&rows, "user social"))
    }

    pub async fn get(&self, ctx: &TenantContext, id: i64) -> Result<UserSocial, ServiceError> {
        let sql = format!("SELECT {SOCIAL_COLUMNS} FROM um_user_with_socials WHERE id = $1 AND org_id = $2");
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(&ctx.org_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("user social"))?;

        map_row(&row, "user social")
    }

    pub async fn by_username(&self, ctx: &TenantContext, username: &str) -> Result<Vec<UserSocial>, ServiceError> {
        let sql = format!(
            "SELECT {SOCIAL_COLUMNS} FROM um_user_with_socials WHERE username = $1 AND org_id = $2 ORDER BY id"
        );
        let rows = sqlx::query(&sql)
            .bind(username)
            .bind(&ctx.org_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(map_rows(&rows, "user social"))
    }

    pub async fn create(&self, ctx: &TenantContext, input: &UserSocialInput) -> Result<i64, ServiceError> {
        if input.username.trim().is_empty() {
            return Err(ServiceError::invalid("username is required"));
        }

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO um_user_with_socials \
             (org_id, username, social_type, social_id, social_name, created_at, updated_at, created_by, updated_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $6, $7, $7) RETURNING id",
        )
        .bind(&ctx.org_id)
        .bind(&input.username)
        .bind(&input.social_type)
        .bind(&input.social_id)
        .bind(&input.social_name)
        .bind(Utc::now())
        .bind(&ctx.username)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// Full replace; an omitted `username` leaves the owner unchanged
    pub async fn update(&self, ctx: &TenantContext, id: i64, input: &UserSocialUpdate) -> Result<(), ServiceError> {
        let owner = input.username.as_deref().filter(|u| !u.trim().is_empty());

        let result = sqlx::query(
            "UPDATE um_user_with_socials \
             SET username = COALESCE($3, username), social_type = $4, social_id = $5, social_name = $6, \
                 updated_at = $7, updated_by = $8 \
             WHERE id = $1 AND org_id = $2",
        )
        .bind(id)
        .bind(&ctx.org_id)
        .bind(owner)
        .bind(&input.social_type)
        .bind(&input.social_id)
        .bind(&input.social_name)
        .bind(Utc::now())
        .bind(&ctx.username)
        .execute(&self.pool)
        .await?;

        require_affected(result.rows_affected(), "user social")
    }

    pub async fn delete(&self, ctx: &TenantContext, id: i64) -> Result<(), ServiceError> {
        sqlx::query("DELETE FROM um_user_with_socials WHERE id = $1 AND org_id = $2")
            .bind(id)
            .bind(&ctx.org_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
