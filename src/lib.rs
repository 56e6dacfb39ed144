#![deny(missing_docs)]

//! # DynamoDB Model
//!
//! A typed CRUD model over Amazon DynamoDB tables.
//!
//! ## Overview
//!
//! A [`Model`] is built from a [`TableConfig`] (table name, primary key, secondary indexes
//! and optional validators) and an SDK client. It:
//! - Creates and deletes its table, waiting for the table status to settle
//! - Gets, puts, creates, updates, deletes and queries items of any serde type
//! - Validates and normalizes payloads against a [`schema::Validator`] before writing
//! - Builds every expression and placeholder itself
//!
//! The request builders it relies on are public too, in [`mod@read`], [`mod@write`] and
//! [`mod@table`].
//!
//! ## Quick Example
//!
//! ```no_run
//! use aws_sdk_dynamodb::Client;
//! use dynamodb_model::{
//!     Model, QueryParams, UpdateSpec,
//!     common::condition::Condition,
//!     schema::{Field, Schema},
//!     table::config::{KeyDescriptor, TableConfig},
//! };
//! use serde::{Deserialize, Serialize};
//! use serde_json::json;
//!
//! #[derive(Serialize)]
//! #[serde(rename_all = "camelCase")]
//! struct PostKey {
//!     user_id: String,
//!     created_at: u64,
//! }
//!
//! #[derive(Deserialize, Serialize)]
//! #[serde(rename_all = "camelCase")]
//! struct Post {
//!     user_id: String,
//!     created_at: u64,
//!     title: String,
//! }
//!
//! # async fn example(client: Client) -> Result<(), dynamodb_model::Error> {
//! let config = TableConfig::new("Post", "Posts", KeyDescriptor::string("userId"))
//!     .with_range_key(KeyDescriptor::number("createdAt"))
//!     .with_schema(
//!         Schema::new()
//!             .field("userId", Field::string().required())
//!             .field("createdAt", Field::integer().required())
//!             .field("title", Field::string().required()),
//!     );
//! let posts: Model<PostKey, Post> = Model::new(config, client);
//! posts.create_table(None).await?;
//! posts
//!     .create(Post {
//!         user_id: "u1".to_string(),
//!         created_at: 1,
//!         title: "Hello".to_string(),
//!     })
//!     .await?;
//! // "SET #title = :set0" with ALL_NEW return values
//! let post = posts
//!     .update(UpdateSpec {
//!         key: PostKey {
//!             user_id: "u1".to_string(),
//!             created_at: 1,
//!         },
//!         set: Some(json!({"title": "Hello again"})),
//!         remove: Vec::new(),
//!     })
//!     .await?;
//! let recent = posts
//!     .query(QueryParams {
//!         hash_key: json!("u1"),
//!         range_key: Some(Condition::GreaterThan(json!(0))),
//!         ..Default::default()
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`mod@model`] - The typed CRUD model
//! - [`mod@common`] - Shared utilities for keys, conditions, and selections
//! - [`mod@read`] - Read requests (GetItem, BatchGetItem, Query)
//! - [`mod@write`] - Write requests (PutItem, CreateItem, UpdateItem, DeleteItem)
//! - [`mod@table`] - Table descriptors, creation and status polling
//! - [`mod@schema`] - Payload validation
//!
//! ## Features
//!
//! - `tracing`: spans around every request and model operation, plus request events

/// Emits a `tracing` event when the `tracing` feature is enabled.
macro_rules! event {
    ($level:ident, $($arg:tt)+) => {{
        #[cfg(feature = "tracing")]
        {
            tracing::$level!($($arg)+);
        }
    }};
}

pub(crate) use event;

/// Common utilities for keys, conditions, and attribute selection.
pub mod common;

/// Errors of the model operations.
pub mod error;

/// The typed CRUD model.
pub mod model;

/// Read requests for retrieving data from DynamoDB tables.
///
/// This module provides requests for:
/// - Getting individual items by key
/// - Batch retrieving multiple items
/// - Querying items with key conditions
pub mod read;

/// Payload validation.
pub mod schema;

/// Table descriptors and lifecycle.
pub mod table;

/// Write requests for modifying data in DynamoDB tables.
///
/// This module provides requests for:
/// - Putting new items or replacing existing ones
/// - Creating items that must not exist yet
/// - Updating items (set, remove)
/// - Deleting items by key
pub mod write;

pub use error::{Error, Result};
pub use model::{Model, Order, QueryParams, QueryResult, ReadParams, UpdateSpec};
pub use table::config::TableConfig;
