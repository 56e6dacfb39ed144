//! Read requests: single items by primary key, batches of keys, and partition queries.

/// Batch get item request for retrieving several items at once.
pub mod batch_get_item;

/// Arguments shared by read requests.
pub mod common;

/// Get item request for retrieving a single item by primary key.
pub mod get_item;

/// Query request for the items of one partition.
pub mod query;
