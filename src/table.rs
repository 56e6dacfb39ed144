/// Table, key and index descriptors.
pub mod config;

/// Create table request builder.
pub mod create_table;

/// Polling of the table status after creation and deletion.
pub mod lifecycle;
