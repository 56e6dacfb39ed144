use crate::{common, read};

use aws_sdk_dynamodb::{Client, error, operation};
use serde::Serialize;
use serde_dynamo::{Error, Result};

/// query operation
#[derive(Clone, Debug, Default, PartialEq)]
struct QueryInput {
    key_condition_expression: String,
    multiple_read_operation: read::common::MultipleReadInput,
    scan_index_forward: Option<bool>,
}

/// Query of one partition, on the table or one of its indexes.
///
/// Sends a single request: when the page is truncated, the output carries
/// `last_evaluated_key` to continue from.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_model::{common, read};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let query = read::query::Query {
///     partition_key: common::key::Key {
///         name: "userId".to_string(),
///         value: "u1".to_string(),
///     },
///     sort_key_condition: Some(common::condition::KeyCondition {
///         name: "createdAt".to_string(),
///         condition: common::condition::Condition::BeginsWith("2024-".to_string()),
///     }),
///     multiple_read_args: read::common::MultipleReadArgs {
///         table_name: "Posts".to_string(),
///         ..Default::default()
///     },
///     ..Default::default()
/// };
/// query.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query<T> {
    /// Table or index, filter, projection and pagination arguments.
    pub multiple_read_args: read::common::MultipleReadArgs<T>,
    /// The partition key value to query for.
    pub partition_key: common::key::Key<T>,
    /// `true` (or `None`) for ascending sort key order, `false` for descending.
    pub scan_index_forward: Option<bool>,
    /// Optional condition on the sort key.
    pub sort_key_condition: Option<common::condition::KeyCondition<T>>,
}

impl<T: Serialize> TryFrom<Query<T>> for QueryInput {
    type Error = Error;

    fn try_from(query: Query<T>) -> Result<Self> {
        let mut key_conditions = vec![common::condition::KeyCondition {
            condition: common::condition::Condition::Equals(query.partition_key.value),
            name: query.partition_key.name,
        }];
        key_conditions.extend(query.sort_key_condition);
        let mut index = 0;
        let key_condition_operation =
            common::condition::KeyCondition::get_expression_operation(key_conditions, &mut index)?;
        let mut multiple_read_operation = query.multiple_read_args.into_input(&mut index)?;
        let key_condition_expression = key_condition_operation.merge_into(
            &mut multiple_read_operation.expression_attribute_names,
            &mut multiple_read_operation.expression_attribute_values,
        );
        let operation = Self {
            key_condition_expression,
            multiple_read_operation,
            scan_index_forward: query.scan_index_forward,
        };
        Ok(operation)
    }
}

impl<T: Serialize> Query<T> {
    /// Execute the query operation.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_model.query", skip_all, err)
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<operation::query::QueryOutput, error::SdkError<operation::query::QueryError>> {
        let query: QueryInput = self.try_into().map_err(error::BuildError::other)?;
        let builder = client
            .query()
            .key_condition_expression(query.key_condition_expression)
            .set_scan_index_forward(query.scan_index_forward);
        crate::apply_multiple_read_operation!(builder, query.multiple_read_operation)
            .send()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use aws_sdk_dynamodb::types;
    use rstest::rstest;
    use serde_json::{Value, json};
    use std::collections;

    #[rstest]
    #[case::partition_key_only(
        Query {
            multiple_read_args: read::common::MultipleReadArgs {
                table_name: "Videos".to_string(),
                ..Default::default()
            },
            partition_key: common::key::Key {
                name: "id".to_string(),
                value: json!(1),
            },
            ..Default::default()
        },
        QueryInput {
            key_condition_expression: "#id = :id_eq0".to_string(),
            multiple_read_operation: read::common::MultipleReadInput {
                expression_attribute_names: Some(
                    collections::HashMap::from(
                        [
                            ("#id".to_string(), "id".to_string()),
                        ]
                    )
                ),
                expression_attribute_values: Some(
                    collections::HashMap::from(
                        [
                            (
                                ":id_eq0".to_string(),
                                types::AttributeValue::N(
                                    "1".to_string()
                                )
                            ),
                        ]
                    )
                ),
                table_name: "Videos".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    )]
    #[case::index_with_range_filter_and_paging(
        Query {
            multiple_read_args: read::common::MultipleReadArgs {
                filter: Some(
                    vec![
                        common::condition::KeyCondition {
                            name: "status".to_string(),
                            condition: common::condition::Condition::Equals(
                                json!("live")
                            ),
                        },
                    ]
                ),
                consistent_read: Some(false),
                exclusive_start_key: Some(
                    collections::HashMap::from(
                        [
                            ("userId".to_string(), json!("u1")),
                            ("createdAt".to_string(), json!(5)),
                        ]
                    )
                ),
                index_name: Some("byUser".to_string()),
                limit: Some(10),
                select: Some(
                    types::Select::SpecificAttributes
                ),
                selection: Some(
                    common::selection::Selection::from(vec!["id", "title"])
                ),
                table_name: "Videos".to_string(),
            },
            partition_key: common::key::Key {
                name: "userId".to_string(),
                value: json!("u1"),
            },
            scan_index_forward: Some(false),
            sort_key_condition: Some(
                common::condition::KeyCondition {
                    name: "createdAt".to_string(),
                    condition: common::condition::Condition::GreaterThan(
                        json!(0)
                    ),
                }
            ),
        },
        QueryInput {
            key_condition_expression: "#userId = :userId_eq0 AND #createdAt > :createdAt_gt1".to_string(),
            multiple_read_operation: read::common::MultipleReadInput {
                consistent_read: Some(false),
                exclusive_start_key: Some(
                    collections::HashMap::from(
                        [
                            (
                                "userId".to_string(),
                                types::AttributeValue::S(
                                    "u1".to_string()
                                )
                            ),
                            (
                                "createdAt".to_string(),
                                types::AttributeValue::N(
                                    "5".to_string()
                                )
                            ),
                        ]
                    )
                ),
                expression_attribute_names: Some(
                    collections::HashMap::from(
                        [
                            ("#status".to_string(), "status".to_string()),
                            ("#id".to_string(), "id".to_string()),
                            ("#title".to_string(), "title".to_string()),
                            ("#userId".to_string(), "userId".to_string()),
                            ("#createdAt".to_string(), "createdAt".to_string()),
                        ]
                    )
                ),
                expression_attribute_values: Some(
                    collections::HashMap::from(
                        [
                            (
                                ":status_eq2".to_string(),
                                types::AttributeValue::S(
                                    "live".to_string()
                                )
                            ),
                            (
                                ":userId_eq0".to_string(),
                                types::AttributeValue::S(
                                    "u1".to_string()
                                )
                            ),
                            (
                                ":createdAt_gt1".to_string(),
                                types::AttributeValue::N(
                                    "0".to_string()
                                )
                            ),
                        ]
                    )
                ),
                filter_expression: Some(
                    "#status = :status_eq2".to_string()
                ),
                index_name: Some("byUser".to_string()),
                limit: Some(10),
                projection_expression: Some(
                    "#id, #title".to_string()
                ),
                select: Some(
                    types::Select::SpecificAttributes
                ),
                table_name: "Videos".to_string(),
            },
            scan_index_forward: Some(false),
        }
    )]
    fn test_query(#[case] args: Query<Value>, #[case] expected: QueryInput) {
        let actual: QueryInput = args.try_into().unwrap();
        assert_eq!(actual, expected);
    }
}
