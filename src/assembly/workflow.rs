use std::collections::HashMap;

use serde_json::Value;

use crate::database::models::workflow::{SECTION_CONNECTIONS, SECTION_NODES};
use crate::database::models::{Document, Workflow, WorkflowMetadata, WorkflowRow};
use crate::database::row::decode_json;
use crate::services::ServiceError;

/// How payload decode failures are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Log and drop the row (list endpoints)
    Lenient,
    /// Fail the whole assembly (single-entity endpoints)
    Strict,
}

/// A row's payload, decoded according to its discriminator
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    Node(Document),
    Connections(Vec<Document>),
    Unknown(String),
}

impl Section {
    pub fn decode(section: &str, data: Value) -> Result<Self, ServiceError> {
        match section {
            SECTION_NODES => decode_json(data, "workflow node").map(Section::Node),
            SECTION_CONNECTIONS => decode_json(data, "workflow connections").map(Section::Connections),
            other => Ok(Section::Unknown(other.to_string())),
        }
    }
}

/// Folds rows into one aggregate per workflow id, in first-seen order.
/// Metadata is taken from the last accepted row of each workflow.
#[derive(Debug)]
pub struct WorkflowAssembler {
    mode: Mode,
    index: HashMap<String, usize>,
    workflows: Vec<Workflow>,
}

impl WorkflowAssembler {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            index: HashMap::new(),
            workflows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: WorkflowRow) -> Result<(), ServiceError> {
        let metadata = WorkflowMetadata::from(&row);

        let section = match Section::decode(&row.section, row.data) {
            Ok(section) => section,
            Err(e) if self.mode == Mode::Lenient => {
                tracing::warn!("Dropping row of workflow {}: {}", row.wf_id, e);
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        match section {
            Section::Unknown(kind) => {
                tracing::warn!("Unknown section '{}' in workflow {}", kind, row.wf_id);
                return Ok(());
            }
            Section::Node(node) => self.slot(&row.wf_id).nodes.push(node),
            Section::Connections(connections) => self.slot(&row.wf_id).connections.extend(connections),
        }
        self.slot(&row.wf_id).metadata = metadata;

        Ok(())
    }

    fn slot(&mut self, wf_id: &str) -> &mut Workflow {
        let position = match self.index.get(wf_id) {
            Some(position) => *position,
            None => {
                self.workflows.push(Workflow::default());
                self.index.insert(wf_id.to_string(), self.workflows.len() - 1);
                self.workflows.len() - 1
            }
        };
        &mut self.workflows[position]
    }

    pub fn finish(self) -> Vec<Workflow> {
        self.workflows
    }
}

/// Lenient assembly used by the workflow listing
pub fn assemble_workflows(rows: impl IntoIterator<Item = WorkflowRow>) -> Vec<Workflow> {
    let mut assembler = WorkflowAssembler::new(Mode::Lenient);
    for row in rows {
        // Lenient mode never returns an error
        let _ = assembler.push(row);
    }
    assembler.finish()
}
