pub mod manager;
pub mod models;
pub mod row;

pub use manager::{DatabaseError, DatabaseManager};
pub use row::{decode_json, decode_json_lenient, map_row, map_rows};
