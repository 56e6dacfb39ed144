use crate::common;

use aws_sdk_dynamodb::types;
use serde::Serialize;
use serde_dynamo::{Error, Result};
use std::collections;

/// Processed form of [`WriteArgs`], with the condition rendered into an expression.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct WriteInput {
    pub(crate) condition_expression: Option<String>,
    pub(crate) expression_attribute_names: Option<collections::HashMap<String, String>>,
    pub(crate) expression_attribute_values:
        Option<collections::HashMap<String, types::AttributeValue>>,
    pub(crate) return_values: Option<types::ReturnValue>,
    pub(crate) table_name: String,
}

impl WriteInput {
    /// Merge an expression operation into this write operation.
    pub(crate) fn merge_expression(&mut self, operation: common::ExpressionInput) -> String {
        operation.merge_into(
            &mut self.expression_attribute_names,
            &mut self.expression_attribute_values,
        )
    }
}

/// Arguments common to write requests (Put, Update, Delete).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WriteArgs<T> {
    /// Conditions, joined with `AND`, that must hold for the write to happen.
    ///
    /// When they do not, DynamoDB rejects the write with `ConditionalCheckFailedException`.
    pub condition: Option<Vec<common::condition::KeyCondition<T>>>,
    /// Which item attributes to return: `AllOld`, `AllNew`, `UpdatedOld`, `UpdatedNew` or `None`.
    pub return_values: Option<types::ReturnValue>,
    /// The name of the table to write to.
    pub table_name: String,
}

impl<T: Serialize> TryFrom<WriteArgs<T>> for WriteInput {
    type Error = Error;

    fn try_from(write_args: WriteArgs<T>) -> Result<Self> {
        let mut operation = Self {
            return_values: write_args.return_values,
            table_name: write_args.table_name,
            ..Default::default()
        };
        if let Some(condition) = write_args.condition.filter(|condition| !condition.is_empty()) {
            let condition_operation =
                common::condition::KeyCondition::get_expression_operation(condition, &mut 0)?;
            operation.condition_expression = Some(operation.merge_expression(condition_operation));
        }
        Ok(operation)
    }
}

/// apply common write operation settings to a builder
#[macro_export]
macro_rules! apply_write_operation {
    ($builder:expr, $write_operation:expr) => {
        $builder
            .set_condition_expression($write_operation.condition_expression)
            .set_expression_attribute_names($write_operation.expression_attribute_names)
            .set_expression_attribute_values($write_operation.expression_attribute_values)
            .set_return_values($write_operation.return_values)
            .table_name($write_operation.table_name)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::{Value, json};

    #[test]
    fn test_write_args_without_condition() {
        let args: WriteArgs<Value> = WriteArgs {
            return_values: Some(types::ReturnValue::AllOld),
            table_name: "Videos".to_string(),
            ..Default::default()
        };
        let actual: WriteInput = args.try_into().unwrap();
        assert_eq!(
            actual,
            WriteInput {
                return_values: Some(types::ReturnValue::AllOld),
                table_name: "Videos".to_string(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_write_args_with_condition() {
        let args = WriteArgs {
            condition: Some(vec![common::condition::KeyCondition {
                name: "version".to_string(),
                condition: common::condition::Condition::Equals(json!(3)),
            }]),
            table_name: "Videos".to_string(),
            ..Default::default()
        };
        let actual: WriteInput = args.try_into().unwrap();
        assert_eq!(
            actual,
            WriteInput {
                condition_expression: Some("#version = :version_eq0".to_string()),
                expression_attribute_names: Some(collections::HashMap::from([(
                    "#version".to_string(),
                    "version".to_string()
                )])),
                expression_attribute_values: Some(collections::HashMap::from([(
                    ":version_eq0".to_string(),
                    types::AttributeValue::N("3".to_string())
                )])),
                table_name: "Videos".to_string(),
                ..Default::default()
            }
        );
    }
}
