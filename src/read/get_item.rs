use crate::{common, read};

use aws_sdk_dynamodb::{Client, error, operation, types};
use serde::Serialize;
use serde_dynamo::{Error, Result};
use std::collections;

/// get item operation
#[derive(Clone, Debug, Default, PartialEq)]
struct GetItemInput {
    keys: collections::HashMap<String, types::AttributeValue>,
    single_read_operation: read::common::SingleReadInput,
}

/// Point read of one item by primary key.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_model::{common, read};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let get_item = read::get_item::GetItem {
///     keys: common::key::Keys {
///         partition_key: common::key::Key {
///             name: "id".to_string(),
///             value: 1,
///         },
///         ..Default::default()
///     },
///     single_read_args: read::common::SingleReadArgs {
///         table_name: "Videos".to_string(),
///         ..Default::default()
///     },
/// };
/// get_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GetItem<T> {
    /// The primary key of the item to retrieve.
    pub keys: common::key::Keys<T>,
    /// Table name, consistency and projection.
    pub single_read_args: read::common::SingleReadArgs,
}

impl<T: Serialize> TryFrom<GetItem<T>> for GetItemInput {
    type Error = Error;

    fn try_from(get_item: GetItem<T>) -> Result<Self> {
        let operation = Self {
            keys: get_item.keys.try_into()?,
            single_read_operation: get_item.single_read_args.into(),
        };
        Ok(operation)
    }
}

impl<T: Serialize> GetItem<T> {
    /// Execute the get item operation.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_model.get_item", skip_all, err)
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::get_item::GetItemOutput,
        error::SdkError<operation::get_item::GetItemError>,
    > {
        let get_item: GetItemInput = self.try_into().map_err(error::BuildError::other)?;
        let builder = client.get_item().set_key(Some(get_item.keys));
        crate::apply_single_read_operation!(builder, get_item.single_read_operation)
            .send()
            .await
    }
}
