use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use super::Document;

pub const SECTION_NODES: &str = "nodes";
pub const SECTION_CONNECTIONS: &str = "connections";

/// One joined `wf_definitions` x `wf_nodes` row
#[derive(Debug, Clone, FromRow)]
pub struct WorkflowRow {
    pub wf_id: String,
    pub section: String,
    pub data: Value,
    pub title: String,
    pub description: String,
    pub versions: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowMetadata {
    pub wf_id: String,
    pub title: String,
    pub desc: String,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&WorkflowRow> for WorkflowMetadata {
    fn from(row: &WorkflowRow) -> Self {
        Self {
            wf_id: row.wf_id.clone(),
            title: row.title.clone(),
            desc: row.description.clone(),
            status: row.versions.clone(),
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        }
    }
}

/// Assembled workflow definition as consumed by the designer UI
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Workflow {
    pub nodes: Vec<Document>,
    pub connections: Vec<Document>,
    pub metadata: WorkflowMetadata,
}

/// Body of workflow create and full update
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowInput {
    #[serde(default)]
    pub wf_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub nodes: Vec<Document>,
    #[serde(default)]
    pub connections: Vec<Document>,
}
