use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use super::Document;

/// One joined `form_builder` x `form_elements` row
#[derive(Debug, Clone, FromRow)]
pub struct FormRow {
    pub form_id: Uuid,
    pub form_name: String,
    pub form_col_span: i32,
    pub versions: String,
    pub active: bool,
    pub publish: bool,
    pub locks: bool,
    pub ele_data: Value,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

/// A single form with its ordered field documents
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub form_id: Uuid,
    pub form_name: String,
    pub form_col_span: i32,
    pub form_field_json: Vec<Document>,
}

/// Form listing entry, merged by form name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormSummary {
    pub form_id: Uuid,
    pub versions: String,
    pub active: bool,
    pub publish: bool,
    pub form_name: String,
    pub locks: bool,
    pub form_col_span: i32,
    pub form_field_json: Vec<Document>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

/// Body of form create and full update
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormInput {
    pub form_name: String,
    #[serde(default = "default_col_span")]
    pub form_col_span: i32,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub publish: bool,
    #[serde(default)]
    pub locks: bool,
    #[serde(default)]
    pub form_field_json: Vec<Document>,
}

fn default_col_span() -> i32 {
    1
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormPublish {
    pub form_id: Uuid,
    pub publish: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormLock {
    pub form_id: Uuid,
    pub locks: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormActive {
    pub form_id: Uuid,
    pub active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormByCaseSubtype {
    #[serde(rename = "caseSubType", alias = "caseSubtype", alias = "sTypeId")]
    pub case_sub_type: String,
}
