//! Write requests: unconditional puts, conditional creates, updates and deletes.

/// Arguments shared by write requests.
pub mod common;

/// Create item request: a put that fails when the key is already taken.
pub mod create_item;

/// Delete item request for removing an item by primary key.
pub mod delete_item;

/// Put item request for creating or replacing an item.
pub mod put_item;

/// Update item request with `SET` and `REMOVE` clauses.
pub mod update_item;
