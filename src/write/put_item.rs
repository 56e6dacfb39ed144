use crate::write;

use aws_sdk_dynamodb::{Client, error, operation, types};
use serde::Serialize;
use serde_dynamo::{Error, Result, to_item};
use std::collections;

/// put item operation
#[derive(Debug, PartialEq)]
pub(crate) struct PutItemInput {
    pub(crate) item: collections::HashMap<String, types::AttributeValue>,
    pub(crate) write_operation: write::common::WriteInput,
}

impl PutItemInput {
    pub(crate) async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::put_item::PutItemOutput,
        error::SdkError<operation::put_item::PutItemError>,
    > {
        let builder = client.put_item().set_item(Some(self.item));
        crate::apply_write_operation!(builder, self.write_operation)
            .send()
            .await
    }
}

/// Unconditional write of a full item, replacing any item with the same key.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_model::write;
/// use serde_json::json;
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let put_item = write::put_item::PutItem {
///     item: json!({"id": 1, "title": "Title 1"}),
///     write_args: write::common::WriteArgs {
///         table_name: "Videos".to_string(),
///         ..Default::default()
///     },
/// };
/// put_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, PartialEq)]
pub struct PutItem<T> {
    /// The item to write.
    pub item: T,
    /// Table name, condition and return values.
    pub write_args: write::common::WriteArgs<T>,
}

impl<T: Serialize> TryFrom<PutItem<T>> for PutItemInput {
    type Error = Error;

    fn try_from(put_item: PutItem<T>) -> Result<Self> {
        let operation = Self {
            item: to_item(put_item.item)?,
            write_operation: put_item.write_args.try_into()?,
        };
        Ok(operation)
    }
}

impl<T: Serialize> PutItem<T> {
    /// Execute the put item operation.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_model.put_item", skip_all, err)
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::put_item::PutItemOutput,
        error::SdkError<operation::put_item::PutItemError>,
    > {
        let put_item: PutItemInput = self.try_into().map_err(error::BuildError::other)?;
        put_item.send(client).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case::plain(
        PutItem {
            item: json!(
                {
                    "id": 1,
                    "title": "Title 1"
                }
            ),
            write_args: write::common::WriteArgs {
                table_name: "Videos".to_string(),
                ..Default::default()
            },
        },
        PutItemInput {
            item: collections::HashMap::from(
                [
                    (
                        "id".to_string(),
                        types::AttributeValue::N(
                            "1".to_string()
                        ),
                    ),
                    (
                        "title".to_string(),
                        types::AttributeValue::S(
                            "Title 1".to_string()
                        ),
                    ),
                ]
            ),
            write_operation: write::common::WriteInput {
                table_name: "Videos".to_string(),
                ..Default::default()
            },
        }
    )]
    #[case::return_old_image(
        PutItem {
            item: json!(
                {
                    "id": 2
                }
            ),
            write_args: write::common::WriteArgs {
                return_values: Some(
                    types::ReturnValue::AllOld
                ),
                table_name: "Videos".to_string(),
                ..Default::default()
            },
        },
        PutItemInput {
            item: collections::HashMap::from(
                [(
                    "id".to_string(),
                    types::AttributeValue::N(
                        "2".to_string()
                    ),
                )]
            ),
            write_operation: write::common::WriteInput {
                return_values: Some(
                    types::ReturnValue::AllOld
                ),
                table_name: "Videos".to_string(),
                ..Default::default()
            },
        }
    )]
    fn test_put_item(#[case] args: PutItem<Value>, #[case] expected: PutItemInput) {
        let actual: PutItemInput = args.try_into().unwrap();
        assert_eq!(actual, expected);
    }
}
