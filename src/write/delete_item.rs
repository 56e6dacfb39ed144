use crate::{common, write};

use aws_sdk_dynamodb::{Client, error, operation, types};
use serde::Serialize;
use serde_dynamo::{Error, Result};
use std::collections;

/// delete item operation
#[derive(Debug, PartialEq)]
struct DeleteItemInput {
    keys: collections::HashMap<String, types::AttributeValue>,
    write_operation: write::common::WriteInput,
}

/// Delete of one item by primary key.
///
/// Deleting a missing item is not an error.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_model::{common, write};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let delete_item = write::delete_item::DeleteItem {
///     keys: common::key::Keys {
///         partition_key: common::key::Key {
///             name: "id".to_string(),
///             value: "1".to_string(),
///         },
///         ..Default::default()
///     },
///     write_args: write::common::WriteArgs {
///         table_name: "Videos".to_string(),
///         ..Default::default()
///     },
/// };
/// delete_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, PartialEq)]
pub struct DeleteItem<T> {
    /// The primary key of the item to delete.
    pub keys: common::key::Keys<T>,
    /// Table name, condition and return values.
    pub write_args: write::common::WriteArgs<T>,
}

impl<T: Serialize> TryFrom<DeleteItem<T>> for DeleteItemInput {
    type Error = Error;

    fn try_from(delete_item: DeleteItem<T>) -> Result<Self> {
        let operation = Self {
            keys: delete_item.keys.try_into()?,
            write_operation: delete_item.write_args.try_into()?,
        };
        Ok(operation)
    }
}

impl<T: Serialize> DeleteItem<T> {
    /// Execute the delete item operation.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_model.delete_item", skip_all, err)
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::delete_item::DeleteItemOutput,
        error::SdkError<operation::delete_item::DeleteItemError>,
    > {
        let delete_item: DeleteItemInput = self.try_into().map_err(error::BuildError::other)?;
        let builder = client.delete_item().set_key(Some(delete_item.keys));
        crate::apply_write_operation!(builder, delete_item.write_operation)
            .send()
            .await
    }
}
