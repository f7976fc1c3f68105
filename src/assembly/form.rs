use std::collections::HashMap;

use crate::database::models::{Document, Form, FormRow, FormSummary};
use crate::database::row::{decode_json, decode_json_lenient};
use crate::services::ServiceError;

/// Merge joined form rows into one entry per form name.
///
/// Header fields come from the first row seen for a name; field documents
/// are concatenated in row order. Rows whose payload is not a JSON object
/// are logged and skipped.
pub fn merge_forms(rows: impl IntoIterator<Item = FormRow>) -> Vec<FormSummary> {
    let mut merged: Vec<FormSummary> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let Some(field) = decode_json_lenient::<Document>(row.ele_data, "form field") else {
            continue;
        };

        match by_name.get(&row.form_name) {
            Some(&position) => merged[position].form_field_json.push(field),
            None => {
                by_name.insert(row.form_name.clone(), merged.len());
                merged.push(FormSummary {
                    form_id: row.form_id,
                    versions: row.versions,
                    active: row.active,
                    publish: row.publish,
                    form_name: row.form_name,
                    locks: row.locks,
                    form_col_span: row.form_col_span,
                    form_field_json: vec![field],
                    created_by: row.created_by,
                    created_at: row.created_at,
                    updated_at: row.updated_at,
                    updated_by: row.updated_by,
                });
            }
        }
    }

    merged
}

/// Collect the rows of a single form. Returns `None` when there are no rows;
/// any undecodable field document fails the whole form.
pub fn collect_form(rows: impl IntoIterator<Item = FormRow>) -> Result<Option<Form>, ServiceError> {
    let mut form: Option<Form> = None;

    for row in rows {
        let field: Document = decode_json(row.ele_data, "form field")?;
        match form.as_mut() {
            Some(form) => form.form_field_json.push(field),
            None => {
                form = Some(Form {
                    form_id: row.form_id,
                    form_name: row.form_name,
                    form_col_span: row.form_col_span,
                    form_field_json: vec![field],
                })
            }
        }
    }

    Ok(form)
}
