use chrono::Utc;
use sqlx::PgPool;

use crate::api::Page;
use crate::auth::password::hash_password;
use crate::auth::TenantContext;
use crate::database::models::{User, UserInput};
use crate::database::row::{map_row, map_rows};

use super::{conflict_on_unique, require_affected, ServiceError};

/// Every column a client may see. `password` is deliberately absent.
const USER_SELECT: &str = r#"
    SELECT u.id, u.org_id, o.name AS org_name, u.display_name, u.title, u.first_name, u.middle_name,
           u.last_name, u.citizen_id, u.bod, u.blood, u.gender, u.mobile_no, u.address, u.photo,
           u.username, u.email, u.role_id, r.role_name, u.user_type, u.emp_id, u.dept_id, u.comm_id,
           u.stn_id, u.active, u.activation_token, u.last_activation_request, u.lost_password_request,
           u.signup_stamp, u.islogin, u.last_login, u.created_at, u.updated_at, u.created_by, u.updated_by
    FROM um_users u
    LEFT JOIN organizations o ON o.id = u.org_id
    LEFT JOIN um_roles r ON r.id = u.role_id AND r.org_id = u.org_id
"#;

/// Selects the row an update applies to
#[derive(Debug, Clone, Copy)]
pub enum UserKey<'a> {
    Id(i64),
    Username(&'a str),
}

pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, ctx: &TenantContext, page: Page) -> Result<Vec<User>, ServiceError> {
        let sql = format!("{USER_SELECT} WHERE u.org_id = $1 ORDER BY u.id LIMIT $2 OFFSET $3");
        tracing::debug!("Query: {} [{:?}]", sql, page);

        let rows = sqlx::query(&sql)
            .bind(&ctx.org_id)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(map_rows(&rows, "user"))
    }

    pub async fn get(&self, ctx: &TenantContext, id: i64) -> Result<User, ServiceError> {
        let sql = format!("{USER_SELECT} WHERE u.id = $1 AND u.org_id = $2");

        let row = sqlx::query(&sql)
            .bind(id)
            .bind(&ctx.org_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("user"))?;

        map_row(&row, "user")
    }

    pub async fn get_by_username(&self, ctx: &TenantContext, username: &str) -> Result<User, ServiceError> {
        let sql = format!("{USER_SELECT} WHERE u.username = $1 AND u.org_id = $2");

        let row = sqlx::query(&sql)
            .bind(username)
            .bind(&ctx.org_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("user"))?;

        map_row(&row, "user")
    }

    /// Insert a user with a freshly hashed password. The caller's bearer token
    /// is recorded as the activation token.
    pub async fn create(&self, ctx: &TenantContext, input: &UserInput) -> Result<i64, ServiceError> {
        if input.username.trim().is_empty() {
            return Err(ServiceError::invalid("username is required"));
        }
        let password = input
            .new_password()
            .ok_or_else(|| ServiceError::invalid("password is required"))?;
        let hash = hash_password(password)?;
        let now = Utc::now();

        tracing::debug!("Creating user {:?} in org {}", input, ctx.org_id);

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO um_users \
             (org_id, display_name, title, first_name, middle_name, last_name, citizen_id, bod, blood, gender, \
              mobile_no, address, photo, username, password, email, role_id, user_type, emp_id, dept_id, comm_id, \
              stn_id, active, activation_token, last_activation_request, lost_password_request, signup_stamp, \
              islogin, last_login, created_at, updated_at, created_by, updated_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, \
                     $21, $22, $23, $24, $25, $26, $27, $28, $29, $30, $30, $31, $31) \
             RETURNING id",
        )
        .bind(&ctx.org_id)
        .bind(&input.display_name)
        .bind(&input.title)
        .bind(&input.first_name)
        .bind(&input.middle_name)
        .bind(&input.last_name)
        .bind(&input.citizen_id)
        .bind(input.bod)
        .bind(&input.blood)
        .bind(input.gender)
        .bind(&input.mobile_no)
        .bind(&input.address)
        .bind(&input.photo)
        .bind(&input.username)
        .bind(&hash)
        .bind(&input.email)
        .bind(&input.role_id)
        .bind(input.user_type)
        .bind(&input.emp_id)
        .bind(&input.dept_id)
        .bind(&input.comm_id)
        .bind(&input.stn_id)
        .bind(input.active)
        .bind(&ctx.token)
        .bind(input.last_activation_request)
        .bind(input.lost_password_request)
        .bind(input.signup_stamp)
        .bind(input.is_login)
        .bind(input.last_login)
        .bind(now)
        .bind(&ctx.username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "username already exists"))?;

        tracing::info!("Created user {} ({}) in org {}", input.username, id, ctx.org_id);
        Ok(id)
    }

    /// Full replace of the profile. The stored hash is kept unless a new password is given.
    pub async fn update(&self, ctx: &TenantContext, key: UserKey<'_>, input: &UserInput) -> Result<(), ServiceError> {
        let hash = input.new_password().map(hash_password).transpose()?;

        let filter = match key {
            UserKey::Id(_) => "id = $1",
            UserKey::Username(_) => "username = $1",
        };
        let sql = format!(
            "UPDATE um_users \
             SET display_name = $3, title = $4, first_name = $5, middle_name = $6, last_name = $7, citizen_id = $8, \
                 bod = $9, blood = $10, gender = $11, mobile_no = $12, address = $13, photo = $14, email = $15, \
                 role_id = $16, user_type = $17, emp_id = $18, dept_id = $19, comm_id = $20, stn_id = $21, \
                 active = $22, last_activation_request = $23, lost_password_request = $24, signup_stamp = $25, \
                 islogin = $26, last_login = $27, password = COALESCE($28, password), \
                 updated_at = $29, updated_by = $30 \
             WHERE {filter} AND org_id = $2"
        );

        let query = match key {
            UserKey::Id(id) => sqlx::query(&sql).bind(id),
            UserKey::Username(username) => sqlx::query(&sql).bind(username.to_string()),
        };

        let result = query
            .bind(&ctx.org_id)
            .bind(&input.display_name)
            .bind(&input.title)
            .bind(&input.first_name)
            .bind(&input.middle_name)
            .bind(&input.last_name)
            .bind(&input.citizen_id)
            .bind(input.bod)
            .bind(&input.blood)
            .bind(input.gender)
            .bind(&input.mobile_no)
            .bind(&input.address)
            .bind(&input.photo)
            .bind(&input.email)
            .bind(&input.role_id)
            .bind(input.user_type)
            .bind(&input.emp_id)
            .bind(&input.dept_id)
            .bind(&input.comm_id)
            .bind(&input.stn_id)
            .bind(input.active)
            .bind(input.last_activation_request)
            .bind(input.lost_password_request)
            .bind(input.signup_stamp)
            .bind(input.is_login)
            .bind(input.last_login)
            .bind(hash)
            .bind(Utc::now())
            .bind(&ctx.username)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Updated user {:?} in org {}", key, ctx.org_id);
        require_affected(result.rows_affected(), "user")
    }

    /// Hard delete. Succeeds whether or not the user existed.
    pub async fn delete(&self, ctx: &TenantContext, id: i64) -> Result<(), ServiceError> {
        let result = sqlx::query("DELETE FROM um_users WHERE id = $1 AND org_id = $2")
            .bind(id)
            .bind(&ctx.org_id)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Deleted {} user row(s) for id {}", result.rows_affected(), id);
        Ok(())
    }
}
