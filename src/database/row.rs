//! Row decoding shared by every service.
//!
//! List endpoints decode leniently: a row that fails to map is logged and
//! skipped so one bad record never hides the rest of the page. Single-entity
//! endpoints decode strictly and surface the failure to the caller.

use serde::de::DeserializeOwned;
use serde_json::Value;
use sqlx::{postgres::PgRow, FromRow};

use crate::services::ServiceError;

/// Map every row that decodes, skipping the ones that do not
pub fn map_rows<T>(rows: &[PgRow], what: &'static str) -> Vec<T>
where
    T: for<'r> FromRow<'r, PgRow>,
{
    rows.iter()
        .enumerate()
        .filter_map(|(index, row)| match T::from_row(row) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Skipping {} row {}: {}", what, index, e);
                None
            }
        })
        .collect()
}

/// Map one row, failing the request when it does not decode
pub fn map_row<T>(row: &PgRow, what: &'static str) -> Result<T, ServiceError>
where
    T: for<'r> FromRow<'r, PgRow>,
{
    T::from_row(row).map_err(|e| {
        tracing::warn!("Failed to map {} row: {}", what, e);
        ServiceError::Database(e)
    })
}

/// Decode a JSON column payload into a typed document
pub fn decode_json<T: DeserializeOwned>(value: Value, what: &'static str) -> Result<T, ServiceError> {
    serde_json::from_value(value).map_err(|source| ServiceError::Decode { what, source })
}

/// Lenient variant of [`decode_json`] for list scans
pub fn decode_json_lenient<T: DeserializeOwned>(value: Value, what: &'static str) -> Option<T> {
    match decode_json(value, what) {
        Ok(doc) => Some(doc),
        Err(e) => {
            tracing::warn!("{}", e);
            None
        }
    }
}
