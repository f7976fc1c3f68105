use chrono::Utc;
use sqlx::PgPool;

use crate::api::Page;
use crate::auth::TenantContext;
use crate::database::models::{UserSkill, UserSkillInput, UserSkillUpdate};
use crate::database::row::{map_row, map_rows};

use super::{require_affected, ServiceError};

const SKILL_COLUMNS: &str =
    "id, org_id, user_name, skill_id, active, created_at, updated_at, created_by, updated_by";

pub struct UserSkillService {
    pool: PgPool,
}

impl UserSkillService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, ctx: &TenantContext, page: Page) -> Result<Vec<UserSkill>, ServiceError> {
        let sql = format!(
            "SELECT {SKILL_COLUMNS} FROM um_user_with_skills WHERE org_id = $1 ORDER BY id LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query(&sql)
            .bind(&ctx.org_id)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(map_rows(&rows, "user skill"))
    }

    pub async fn get(&self, ctx: &TenantContext, id: i64) -> Result<UserSkill, ServiceError> {
        let sql = format!("SELECT {SKILL_COLUMNS} FROM um_user_with_skills WHERE id = $1 AND org_id = $2");
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(&ctx.org_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("user skill"))?;

        map_row(&row, "user skill")
    }

    pub async fn by_username(&self, ctx: &TenantContext, username: &str) -> Result<Vec<UserSkill>, ServiceError> {
        let sql = format!(
            "SELECT {SKILL_COLUMNS} FROM um_user_with_skills WHERE user_name = $1 AND org_id = $2 ORDER BY id"
        );
        let rows = sqlx::query(&sql)
            .bind(username)
            .bind(&ctx.org_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(map_rows(&rows, "user skill"))
    }

    /// Every user holding the given skill
    pub async fn by_skill_id(&self, ctx: &TenantContext, skill_id: &str) -> Result<Vec<UserSkill>, ServiceError> {
        let sql = format!(
            "SELECT {SKILL_COLUMNS} FROM um_user_with_skills WHERE skill_id = $1 AND org_id = $2 ORDER BY id"
        );
        let rows = sqlx::query(&sql)
            .bind(skill_id)
            .bind(&ctx.org_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(map_rows(&rows, "user skill"))
    }

    pub async fn create(&self, ctx: &TenantContext, input: &UserSkillInput) -> Result<i64, ServiceError> {
        if input.user_name.trim().is_empty() || input.skill_id.trim().is_empty() {
            return Err(ServiceError::invalid("userName and skillId are required"));
        }

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO um_user_with_skills \
             (org_id, user_name, skill_id, active, created_at, updated_at, created_by, updated_by) \
             VALUES ($1, $2, $3, $4, $5, $5, $6, $6) RETURNING id",
        )
        .bind(&ctx.org_id)
        .bind(&input.user_name)
        .bind(&input.skill_id)
        .bind(input.active)
        .bind(Utc::now())
        .bind(&ctx.username)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Added skill {} to {} in org {}", input.skill_id, input.user_name, ctx.org_id);
        Ok(id)
    }

    pub async fn update(&self, ctx: &TenantContext, id: i64, input: &UserSkillUpdate) -> Result<(), ServiceError> {
        let result = sqlx::query(
            "UPDATE um_user_with_skills SET skill_id = $3, active = $4, updated_at = $5, updated_by = $6 \
             WHERE id = $1 AND org_id = $2",
        )
        .bind(id)
        .bind(&ctx.org_id)
        .bind(&input.skill_id)
        .bind(input.active)
        .bind(Utc::now())
        .bind(&ctx.username)
        .execute(&self.pool)
        .await?;

        require_affected(result.rows_affected(), "user skill")
    }

    pub async fn delete(&self, ctx: &TenantContext, id: i64) -> Result<(), ServiceError> {
        sqlx::query("DELETE FROM um_user_with_skills WHERE id = $1 AND org_id = $2")
            .bind(id)
            .bind(&ctx.org_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
