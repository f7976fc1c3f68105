use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::assembly::{assemble_workflows, Mode, WorkflowAssembler};
use crate::auth::TenantContext;
use crate::database::models::workflow::{SECTION_CONNECTIONS, SECTION_NODES};
use crate::database::models::{Workflow, WorkflowInput, WorkflowRow};
use crate::database::row::{map_row, map_rows};

use super::{conflict_on_unique, require_affected, ServiceError};

const WORKFLOW_SELECT: &str = r#"
    SELECT d.wf_id, n.section, n.data, d.title, d.description, d.versions, d.created_at, d.updated_at
    FROM wf_definitions d
    JOIN wf_nodes n ON n.org_id = d.org_id AND n.wf_id = d.wf_id AND n.versions = d.versions
"#;

pub struct WorkflowService {
    pool: PgPool,
}

impl WorkflowService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All workflows of the tenant, assembled leniently. No rows is an empty list.
    pub async fn list(&self, ctx: &TenantContext) -> Result<Vec<Workflow>, ServiceError> {
        let sql = format!("{WORKFLOW_SELECT} WHERE d.org_id = $1 ORDER BY d.id, n.seq, n.id");
        tracing::debug!("Query: {}", sql);

        let rows = sqlx::query(&sql).bind(&ctx.org_id).fetch_all(&self.pool).await?;

        Ok(assemble_workflows(map_rows::<WorkflowRow>(&rows, "workflow")))
    }

    pub async fn get(&self, ctx: &TenantContext, wf_id: &str) -> Result<Workflow, ServiceError> {
        let sql = format!("{WORKFLOW_SELECT} WHERE d.wf_id = $1 AND d.org_id = $2 ORDER BY n.seq, n.id");
        tracing::debug!("Query: {}", sql);

        let rows = sqlx::query(&sql)
            .bind(wf_id)
            .bind(&ctx.org_id)
            .fetch_all(&self.pool)
            .await?;
        if rows.is_empty() {
            return Err(ServiceError::not_found("workflow"));
        }

        let mut assembler = WorkflowAssembler::new(Mode::Strict);
        for row in &rows {
            assembler.push(map_row::<WorkflowRow>(row, "workflow")?)?;
        }

        assembler
            .finish()
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::not_found("workflow"))
    }

    /// Create a workflow and its node/connection rows; returns the workflow id
    pub async fn create(&self, ctx: &TenantContext, input: &WorkflowInput) -> Result<String, ServiceError> {
        let wf_id = match input.wf_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => Uuid::new_v4().to_string(),
        };
        let version = version_of(input);
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO wf_definitions \
             (org_id, wf_id, title, description, versions, created_at, updated_at, created_by, updated_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $6, $7, $7)",
        )
        .bind(&ctx.org_id)
        .bind(&wf_id)
        .bind(&input.title)
        .bind(&input.desc)
        .bind(version)
        .bind(now)
        .bind(&ctx.username)
        .execute(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "workflow already exists"))?;

        insert_children(&mut tx, ctx, &wf_id, version, input).await?;
        tx.commit().await?;

        tracing::info!("Created workflow {} in org {}", wf_id, ctx.org_id);
        Ok(wf_id)
    }

    /// Replace title, status and the whole node/connection set
    pub async fn update(&self, ctx: &TenantContext, wf_id: &str, input: &WorkflowInput) -> Result<(), ServiceError> {
        let version = version_of(input);
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE wf_definitions \
             SET title = $3, description = $4, versions = $5, updated_at = $6, updated_by = $7 \
             WHERE wf_id = $1 AND org_id = $2",
        )
        .bind(wf_id)
        .bind(&ctx.org_id)
        .bind(&input.title)
        .bind(&input.desc)
        .bind(version)
        .bind(Utc::now())
        .bind(&ctx.username)
        .execute(&mut *tx)
        .await?;
        require_affected(result.rows_affected(), "workflow")?;

        sqlx::query("DELETE FROM wf_nodes WHERE wf_id = $1 AND org_id = $2")
            .bind(wf_id)
            .bind(&ctx.org_id)
            .execute(&mut *tx)
            .await?;

        insert_children(&mut tx, ctx, wf_id, version, input).await?;
        tx.commit().await?;

        tracing::info!("Updated workflow {} in org {}", wf_id, ctx.org_id);
        Ok(())
    }

    pub async fn delete(&self, ctx: &TenantContext, wf_id: &str) -> Result<(), ServiceError> {
        let result = sqlx::query("DELETE FROM wf_definitions WHERE wf_id = $1 AND org_id = $2")
            .bind(wf_id)
            .bind(&ctx.org_id)
            .execute(&self.pool)
            .await?;

        require_affected(result.rows_affected(), "workflow")
    }
}

fn version_of(input: &WorkflowInput) -> &str {
    input
        .status
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("draft")
}

/// Nodes get one row each with `seq` 1..N; the connection list is a single trailing row
async fn insert_children(
    tx: &mut Transaction<'static, Postgres>,
    ctx: &TenantContext,
    wf_id: &str,
    version: &str,
    input: &WorkflowInput,
) -> Result<(), ServiceError> {
    const INSERT: &str = "INSERT INTO wf_nodes \
        (org_id, wf_id, versions, section, node_type, seq, data, created_at, updated_at, created_by, updated_by) \
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8, $9, $9)";

    let now = Utc::now();

    for (index, node) in input.nodes.iter().enumerate() {
        let node_type = node.get("type").and_then(|t| t.as_str()).unwrap_or_default();

        sqlx::query(INSERT)
            .bind(&ctx.org_id)
            .bind(wf_id)
            .bind(version)
            .bind(SECTION_NODES)
            .bind(node_type)
            .bind(index as i32 + 1)
            .bind(sqlx::types::Json(node))
            .bind(now)
            .bind(&ctx.username)
            .execute(&mut **tx)
            .await?;
    }

    sqlx::query(INSERT)
        .bind(&ctx.org_id)
        .bind(wf_id)
        .bind(version)
        .bind(SECTION_CONNECTIONS)
        .bind("")
        .bind(input.nodes.len() as i32 + 1)
        .bind(sqlx::types::Json(&input.connections))
        .bind(now)
        .bind(&ctx.username)
        .execute(&mut **tx)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(status: Option<&str>) -> WorkflowInput {
        WorkflowInput {
            wf_id: None,
            title: "Dispatch".to_string(),
            desc: String::new(),
            status: status.map(str::to_string),
            nodes: Vec::new(),
            connections: Vec::new(),
        }
    }

    #[test]
    fn status_defaults_to_draft() {
        assert_eq!(version_of(&input(None)), "draft");
        assert_eq!(version_of(&input(Some("  "))), "draft");
        assert_eq!(version_of(&input(Some("publish"))), "publish");
    }
}
