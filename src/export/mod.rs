//! Data export for retainer-cli
//!
//! Supports CSV export of transactions and clients, and a full-database
//! JSON export.

pub mod csv;
pub mod json;

pub use self::csv::{export_clients_csv, export_transactions_csv};
pub use self::json::{FullExport, EXPORT_SCHEMA_VERSION};
