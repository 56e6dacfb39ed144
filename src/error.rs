use crate::schema;

use aws_sdk_dynamodb::error::SdkError;
use thiserror::Error;

/// Result type alias of the model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors of the model operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The table configuration does not support the call, or a key is malformed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// No index with this name is configured.
    #[error("not found an index with name={0}")]
    IndexNotFound(String),

    /// The table disappeared while waiting for it.
    #[error("table '{0}' not found")]
    TableNotFound(String),

    /// The write condition did not hold: `create` found an item with the same key, or
    /// `update` found no item with the key.
    #[error("conditional check failed")]
    ConditionalCheckFailed,

    /// The payload was rejected by the validator.
    #[error(transparent)]
    Validation(#[from] schema::ValidationError),

    /// The update has nothing to set or remove.
    #[error("update has nothing to set or remove")]
    EmptyUpdate,

    /// The store accepted the request but its response lacks what was asked for.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(&'static str),

    /// Conversion between an item and its DynamoDB attributes failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_dynamo::Error),

    /// Conversion between an item and its document form failed.
    #[error("document error: {0}")]
    Document(#[from] serde_json::Error),

    /// Any other failure reported by the SDK.
    #[error("dynamodb error: {0}")]
    Transport(#[source] Box<aws_sdk_dynamodb::Error>),
}

impl<E, R> From<SdkError<E, R>> for Error
where
    aws_sdk_dynamodb::Error: From<SdkError<E, R>>,
{
    fn from(error: SdkError<E, R>) -> Self {
        Self::Transport(Box::new(error.into()))
    }
}
