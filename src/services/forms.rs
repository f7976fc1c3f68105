use chrono::Utc;
use serde_json::Value;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use crate::assembly::{collect_form, first_form_reference, merge_forms};
use crate::auth::TenantContext;
use crate::database::models::{Document, Form, FormInput, FormRow, FormSummary};
use crate::database::row::{map_row, map_rows};

use super::{conflict_on_unique, require_affected, ServiceError};

const DRAFT: &str = "draft";
const DUPLICATE_NAME: &str = "form name already exists";

const FORM_COLUMNS: &str = r#"
    b.form_id, b.form_name, b.form_col_span, b.versions, b.active, b.publish, b.locks,
    e.ele_data, e.created_by, e.created_at, e.updated_at, e.updated_by
"#;

/// Single boolean flags that can be toggled without a full update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFlag {
    Publish,
    Lock,
    Active,
}

impl FormFlag {
    fn update_sql(self) -> &'static str {
        match self {
            FormFlag::Publish => {
                "UPDATE form_builder SET publish = $3, updated_at = $4, updated_by = $5 WHERE form_id = $1 AND org_id = $2"
            }
            FormFlag::Lock => {
                "UPDATE form_builder SET locks = $3, updated_at = $4, updated_by = $5 WHERE form_id = $1 AND org_id = $2"
            }
            FormFlag::Active => {
                "UPDATE form_builder SET active = $3, updated_at = $4, updated_by = $5 WHERE form_id = $1 AND org_id = $2"
            }
        }
    }
}

pub struct FormService {
    pool: PgPool,
}

impl FormService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// One form at one version, fields in their stored order
    pub async fn get(&self, ctx: &TenantContext, form_id: Uuid, version: &str) -> Result<Form, ServiceError> {
        let sql = format!(
            "SELECT {FORM_COLUMNS} FROM form_builder b \
             JOIN form_elements e ON e.form_id = b.form_id AND e.org_id = b.org_id \
             WHERE b.form_id = $1 AND b.org_id = $2 AND e.versions = $3 \
             ORDER BY e.ele_number, e.id"
        );
        tracing::debug!("Query: {}", sql);

        let rows = sqlx::query(&sql)
            .bind(form_id)
            .bind(&ctx.org_id)
            .bind(version)
            .fetch_all(&self.pool)
            .await?;

        let rows = rows
            .iter()
            .map(|row| map_row::<FormRow>(row, "form"))
            .collect::<Result<Vec<_>, _>>()?;

        collect_form(rows)?.ok_or_else(|| ServiceError::not_found("form"))
    }

    /// Every form in the tenant, merged by name. Not-found is decided on the raw row count.
    pub async fn list(&self, ctx: &TenantContext) -> Result<Vec<FormSummary>, ServiceError> {
        let sql = format!(
            "SELECT {FORM_COLUMNS} FROM form_builder b \
             JOIN form_elements e ON e.form_id = b.form_id AND e.org_id = b.org_id \
             WHERE b.org_id = $1 \
             ORDER BY b.id, e.versions, e.ele_number, e.id"
        );
        tracing::debug!("Query: {}", sql);

        let rows = sqlx::query(&sql).bind(&ctx.org_id).fetch_all(&self.pool).await?;
        if rows.is_empty() {
            return Err(ServiceError::not_found("form"));
        }

        Ok(merge_forms(map_rows::<FormRow>(&rows, "form")))
    }

    /// Create a draft form with its fields; returns the generated form id
    pub async fn create(&self, ctx: &TenantContext, input: &FormInput) -> Result<Uuid, ServiceError> {
        validate(input)?;

        let form_id = Uuid::new_v4();
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO form_builder \
             (org_id, form_id, form_name, form_col_span, active, publish, versions, locks, created_at, updated_at, created_by, updated_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9, $10, $10)",
        )
        .bind(&ctx.org_id)
        .bind(form_id)
        .bind(&input.form_name)
        .bind(input.form_col_span)
        .bind(input.active)
        .bind(input.publish)
        .bind(DRAFT)
        .bind(input.locks)
        .bind(now)
        .bind(&ctx.username)
        .execute(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, DUPLICATE_NAME))?;

        insert_fields(&mut tx, ctx, form_id, &input.form_field_json).await?;
        tx.commit().await?;

        tracing::info!("Created form {} ({}) in org {}", input.form_name, form_id, ctx.org_id);
        Ok(form_id)
    }

    /// Replace a form's header and its whole field set; the form returns to draft
    pub async fn update(&self, ctx: &TenantContext, form_id: Uuid, input: &FormInput) -> Result<(), ServiceError> {
        validate(input)?;

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE form_builder \
             SET form_name = $3, form_col_span = $4, active = $5, publish = $6, versions = $7, locks = $8, \
                 updated_at = $9, updated_by = $10 \
             WHERE form_id = $1 AND org_id = $2",
        )
        .bind(form_id)
        .bind(&ctx.org_id)
        .bind(&input.form_name)
        .bind(input.form_col_span)
        .bind(input.active)
        .bind(input.publish)
        .bind(DRAFT)
        .bind(input.locks)
        .bind(Utc::now())
        .bind(&ctx.username)
        .execute(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, DUPLICATE_NAME))?;
        require_affected(result.rows_affected(), "form")?;

        sqlx::query("DELETE FROM form_elements WHERE form_id = $1 AND org_id = $2")
            .bind(form_id)
            .bind(&ctx.org_id)
            .execute(&mut *tx)
            .await?;

        insert_fields(&mut tx, ctx, form_id, &input.form_field_json).await?;
        tx.commit().await?;

        tracing::info!("Updated form {} in org {}", form_id, ctx.org_id);
        Ok(())
    }

    pub async fn set_flag(&self, ctx: &TenantContext, form_id: Uuid, flag: FormFlag, value: bool) -> Result<(), ServiceError> {
        let result = sqlx::query(flag.update_sql())
            .bind(form_id)
            .bind(&ctx.org_id)
            .bind(value)
            .bind(Utc::now())
            .bind(&ctx.username)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Set {:?}={} on form {}", flag, value, form_id);
        require_affected(result.rows_affected(), "form")
    }

    /// Hard delete; field rows go with it
    pub async fn delete(&self, ctx: &TenantContext, form_id: Uuid) -> Result<(), ServiceError> {
        let result = sqlx::query("DELETE FROM form_builder WHERE form_id = $1 AND org_id = $2")
            .bind(form_id)
            .bind(&ctx.org_id)
            .execute(&self.pool)
            .await?;

        require_affected(result.rows_affected(), "form")
    }

    /// Resolve the form attached to a case sub-type:
    /// sub-type -> workflow -> first non-start node's `form_id` -> form fields.
    pub async fn by_case_subtype(&self, ctx: &TenantContext, case_sub_type: &str) -> Result<Form, ServiceError> {
        let wf_id: Option<String> =
            sqlx::query_scalar("SELECT wf_id FROM case_sub_types WHERE org_id = $1 AND s_type_id = $2")
                .bind(&ctx.org_id)
                .bind(case_sub_type)
                .fetch_optional(&self.pool)
                .await?;
        let wf_id = wf_id.ok_or_else(|| {
            ServiceError::Unresolved(format!("No workflow mapped to case sub type {}", case_sub_type))
        })?;

        let rows = sqlx::query(
            "SELECT n.data FROM wf_definitions d \
             JOIN wf_nodes n ON n.org_id = d.org_id AND n.wf_id = d.wf_id AND n.versions = d.versions \
             WHERE d.wf_id = $1 AND d.org_id = $2 AND n.section = 'nodes' AND LOWER(n.node_type) <> 'start' \
             ORDER BY n.seq, n.id",
        )
        .bind(&wf_id)
        .bind(&ctx.org_id)
        .fetch_all(&self.pool)
        .await?;

        let nodes: Vec<Value> = rows
            .iter()
            .filter_map(|row| match row.try_get::<Value, _>("data") {
                Ok(data) => Some(data),
                Err(e) => {
                    tracing::warn!("Skipping node of workflow {}: {}", wf_id, e);
                    None
                }
            })
            .collect();

        let reference = first_form_reference(&nodes)
            .ok_or_else(|| ServiceError::not_found(format!("form reference in workflow {}", wf_id)))?;
        tracing::debug!("Case sub type {} resolved to form {}", case_sub_type, reference);

        let no_form = || ServiceError::Unresolved("No form data found".to_string());
        let form_id = Uuid::parse_str(&reference).map_err(|_| no_form())?;

        let sql = format!(
            "SELECT {FORM_COLUMNS} FROM form_builder b \
             JOIN form_elements e ON e.form_id = b.form_id AND e.org_id = b.org_id AND e.versions = b.versions \
             WHERE b.form_id = $1 AND b.org_id = $2 \
             ORDER BY e.ele_number, e.id"
        );
        let rows = sqlx::query(&sql)
            .bind(form_id)
            .bind(&ctx.org_id)
            .fetch_all(&self.pool)
            .await?;

        let rows = rows
            .iter()
            .map(|row| map_row::<FormRow>(row, "form"))
            .collect::<Result<Vec<_>, _>>()?;

        collect_form(rows)?.ok_or_else(no_form)
    }
}

fn validate(input: &FormInput) -> Result<(), ServiceError> {
    if input.form_name.trim().is_empty() {
        return Err(ServiceError::invalid("formName is required"));
    }
    Ok(())
}

/// Insert fields numbered 1..N in array order
async fn insert_fields(
    tx: &mut Transaction<'static, Postgres>,
    ctx: &TenantContext,
    form_id: Uuid,
    fields: &[Document],
) -> Result<(), ServiceError> {
    let now = Utc::now();

    for (index, field) in fields.iter().enumerate() {
        sqlx::query(
            "INSERT INTO form_elements \
             (org_id, form_id, versions, ele_number, ele_data, created_at, updated_at, created_by, updated_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $6, $7, $7)",
        )
        .bind(&ctx.org_id)
        .bind(form_id)
        .bind(DRAFT)
        .bind(index as i32 + 1)
        .bind(sqlx::types::Json(field))
        .bind(now)
        .bind(&ctx.username)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}
