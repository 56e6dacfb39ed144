use crate::{common, read};

use aws_sdk_dynamodb::{Client, error, operation, types};
use indexmap::IndexMap;
use serde::Serialize;
use std::{collections, error::Error};

type BoxError = Box<dyn Error + Send + Sync>;

/// Batch read of several items, grouped by table.
///
/// Keys are sent in the given order and are not deduplicated. Tables with no keys are
/// left out of the request.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_model::{common, read};
/// use indexmap::IndexMap;
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let batch_get = read::batch_get_item::BatchGetItem {
///     items: IndexMap::from([(
///         read::common::SingleReadArgs {
///             table_name: "Videos".to_string(),
///             ..Default::default()
///         },
///         vec![common::key::Keys {
///             partition_key: common::key::Key {
///                 name: "id".to_string(),
///                 value: 1,
///             },
///             ..Default::default()
///         }],
///     )]),
/// };
/// batch_get.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default, PartialEq)]
pub struct BatchGetItem<T> {
    /// Read arguments of each table, mapped to the keys to retrieve from it.
    pub items: IndexMap<read::common::SingleReadArgs, Vec<common::key::Keys<T>>>,
}

impl<T: Serialize> TryFrom<BatchGetItem<T>> for operation::batch_get_item::BatchGetItemInput {
    type Error = BoxError;

    fn try_from(batch_get_item: BatchGetItem<T>) -> Result<Self, Self::Error> {
        let mut request_items = collections::HashMap::with_capacity(batch_get_item.items.len());
        for (args, keys) in batch_get_item.items {
            if keys.is_empty() {
                continue;
            }
            let single_operation: read::common::SingleReadInput = args.into();
            let mut serialized_keys = Vec::with_capacity(keys.len());
            for key in keys {
                let key: collections::HashMap<String, types::AttributeValue> = key.try_into()?;
                serialized_keys.push(key);
            }
            let keys_and_attributes = types::KeysAndAttributes::builder()
                .set_consistent_read(single_operation.consistent_read)
                .set_expression_attribute_names(single_operation.expression_attribute_names)
                .set_keys(Some(serialized_keys))
                .set_projection_expression(single_operation.projection_expression)
                .build()?;
            request_items.insert(single_operation.table_name, keys_and_attributes);
        }
        let input = Self::builder()
            .set_request_items(Some(request_items))
            .build()?;
        Ok(input)
    }
}

impl<T: Serialize> BatchGetItem<T> {
    /// Execute the batch get item operation.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_model.batch_get_item", skip_all, err)
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::batch_get_item::BatchGetItemOutput,
        error::SdkError<operation::batch_get_item::BatchGetItemError>,
    > {
        let batch_get_item: operation::batch_get_item::BatchGetItemInput =
            self.try_into().map_err(error::BuildError::other)?;
        client
            .batch_get_item()
            .set_request_items(batch_get_item.request_items)
            .send()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::{Value, json};

    fn video_key(id: i64) -> common::key::Keys<Value> {
        common::key::Keys {
            partition_key: common::key::Key {
                name: "id".to_string(),
                value: json!(id),
            },
            ..Default::default()
        }
    }

    fn id_attribute(id: &str) -> collections::HashMap<String, types::AttributeValue> {
        collections::HashMap::from([("id".to_string(), types::AttributeValue::N(id.to_string()))])
    }

    #[test]
    fn test_batch_get_item_keeps_order_and_duplicates() {
        let batch_get_item = BatchGetItem {
            items: IndexMap::from([(
                read::common::SingleReadArgs {
                    selection: Some(common::selection::Selection::from(vec!["id"])),
                    table_name: "Videos".to_string(),
                    ..Default::default()
                },
                vec![video_key(1), video_key(2), video_key(1)],
            )]),
        };
        let actual: operation::batch_get_item::BatchGetItemInput =
            batch_get_item.try_into().unwrap();
        let expected = operation::batch_get_item::BatchGetItemInput::builder()
            .set_request_items(Some(collections::HashMap::from([(
                "Videos".to_string(),
                types::KeysAndAttributes::builder()
                    .set_keys(Some(vec![
                        id_attribute("1"),
                        id_attribute("2"),
                        id_attribute("1"),
                    ]))
                    .set_expression_attribute_names(Some(collections::HashMap::from([(
                        "#id".to_string(),
                        "id".to_string(),
                    )])))
                    .set_projection_expression(Some("#id".to_string()))
                    .build()
                    .unwrap(),
            )])))
            .build()
            .unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_batch_get_item_skips_tables_without_keys() {
        let batch_get_item: BatchGetItem<Value> = BatchGetItem {
            items: IndexMap::from([(
                read::common::SingleReadArgs {
                    table_name: "Videos".to_string(),
                    ..Default::default()
                },
                Vec::new(),
            )]),
        };
        let actual: operation::batch_get_item::BatchGetItemInput =
            batch_get_item.try_into().unwrap();
        assert_eq!(actual.request_items, Some(collections::HashMap::new()));
    }
}
