use crate::{common, write};

use aws_sdk_dynamodb::{Client, error, operation};
use serde::Serialize;
use serde_dynamo::{Error, Result};

/// Insert of a full item that fails when an item with the same primary key exists.
///
/// Sent as a put conditioned on `attribute_not_exists` of every key attribute, so a
/// duplicate surfaces as `ConditionalCheckFailedException`.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_model::write;
/// use serde_json::json;
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let create_item = write::create_item::CreateItem {
///     item: json!({"userId": "u1", "createdAt": 1, "title": "Hello"}),
///     hash_key_name: "userId".to_string(),
///     range_key_name: Some("createdAt".to_string()),
///     write_args: write::common::WriteArgs {
///         table_name: "Posts".to_string(),
///         ..Default::default()
///     },
/// };
/// create_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, PartialEq)]
pub struct CreateItem<T> {
    /// The item to insert.
    pub item: T,
    /// Name of the partition key attribute.
    pub hash_key_name: String,
    /// Name of the sort key attribute, for composite primary keys.
    pub range_key_name: Option<String>,
    /// Table name and return values. Extra conditions are joined with the key ones.
    pub write_args: write::common::WriteArgs<T>,
}

impl<T: Serialize> TryFrom<CreateItem<T>> for write::put_item::PutItemInput {
    type Error = Error;

    fn try_from(create_item: CreateItem<T>) -> Result<Self> {
        let mut write_args = create_item.write_args;
        let mut condition: Vec<_> = std::iter::once(create_item.hash_key_name)
            .chain(create_item.range_key_name)
            .map(|name| common::condition::KeyCondition {
                condition: common::condition::Condition::Null,
                name,
            })
            .collect();
        condition.extend(write_args.condition.take().unwrap_or_default());
        write_args.condition = Some(condition);
        write::put_item::PutItem {
            item: create_item.item,
            write_args,
        }
        .try_into()
    }
}

impl<T: Serialize> CreateItem<T> {
    /// Execute the create item operation.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_model.create_item", skip_all, err)
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::put_item::PutItemOutput,
        error::SdkError<operation::put_item::PutItemError>,
    > {
        let put_item: write::put_item::PutItemInput =
            self.try_into().map_err(error::BuildError::other)?;
        put_item.send(client).await
    }
}
