use crate::common;

use aws_sdk_dynamodb::types;
use serde::Serialize;
use serde_dynamo::{Result, to_attribute_value};
use std::collections;

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct SingleReadInput {
    pub(crate) consistent_read: Option<bool>,
    pub(crate) expression_attribute_names: Option<collections::HashMap<String, String>>,
    pub(crate) projection_expression: Option<String>,
    pub(crate) table_name: String,
}

/// Arguments for single-item reads (GetItem, and each table of a BatchGetItem).
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct SingleReadArgs {
    /// `true` for strongly consistent reads, `false` or `None` for eventually consistent reads.
    pub consistent_read: Option<bool>,
    /// Attributes to retrieve. `None` retrieves every attribute.
    pub selection: Option<common::selection::Selection>,
    /// The name of the table to read from.
    pub table_name: String,
}

impl From<SingleReadArgs> for SingleReadInput {
    fn from(single_read_args: SingleReadArgs) -> Self {
        let mut expression_attribute_names = None;
        let projection_expression = single_read_args
            .selection
            .filter(|selection| !selection.is_empty())
            .map(|selection| {
                let operation: common::ExpressionInput = selection.into();
                operation.merge_into(&mut expression_attribute_names, &mut None)
            });
        Self {
            consistent_read: single_read_args.consistent_read,
            expression_attribute_names,
            projection_expression,
            table_name: single_read_args.table_name,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct MultipleReadInput {
    pub(crate) consistent_read: Option<bool>,
    pub(crate) exclusive_start_key: Option<collections::HashMap<String, types::AttributeValue>>,
    pub(crate) expression_attribute_names: Option<collections::HashMap<String, String>>,
    pub(crate) expression_attribute_values:
        Option<collections::HashMap<String, types::AttributeValue>>,
    pub(crate) filter_expression: Option<String>,
    pub(crate) index_name: Option<String>,
    pub(crate) limit: Option<i32>,
    pub(crate) projection_expression: Option<String>,
    pub(crate) select: Option<types::Select>,
    pub(crate) table_name: String,
}

/// Arguments for reads that may return several items (Query).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultipleReadArgs<T> {
    /// Filter conditions, joined with `AND`, applied after the key condition.
    pub filter: Option<Vec<common::condition::KeyCondition<T>>>,
    /// `true` for strongly consistent reads. Not supported on global secondary indexes.
    pub consistent_read: Option<bool>,
    /// The key to continue from, as returned by a previous page.
    pub exclusive_start_key: Option<collections::HashMap<String, T>>,
    /// The name of a local or global secondary index to read instead of the base table.
    pub index_name: Option<String>,
    /// The maximum number of items to evaluate for one page.
    pub limit: Option<i32>,
    /// Which attributes to return, or `Select::Count` for a count only.
    pub select: Option<types::Select>,
    /// Attributes to retrieve (projection expression).
    pub selection: Option<common::selection::Selection>,
    /// The name of the table to read from.
    pub table_name: String,
}

impl<T: Serialize> MultipleReadArgs<T> {
    /// Converts the arguments, numbering value placeholders from `index` so they do not
    /// clash with the key condition of the same request.
    pub(crate) fn into_input(self, index: &mut usize) -> Result<MultipleReadInput> {
        let exclusive_start_key = match self.exclusive_start_key {
            Some(exclusive_start_key) => {
                let mut serialized_exclusive_start_key =
                    collections::HashMap::with_capacity(exclusive_start_key.len());
                for (key, value) in exclusive_start_key {
                    let value = to_attribute_value(value)?;
                    serialized_exclusive_start_key.insert(key, value);
                }
                Some(serialized_exclusive_start_key)
            }
            None => None,
        };
        let mut expression_attribute_names = None;
        let mut expression_attribute_values = None;
        let filter_expression = match self.filter.filter(|filter| !filter.is_empty()) {
            Some(filter) => {
                let operation = common::condition::KeyCondition::get_expression_operation(filter, index)?;
                Some(operation.merge_into(
                    &mut expression_attribute_names,
                    &mut expression_attribute_values,
                ))
            }
            None => None,
        };
        let projection_expression = self
            .selection
            .filter(|selection| !selection.is_empty())
            .map(|selection| {
                let operation: common::ExpressionInput = selection.into();
                operation.merge_into(&mut expression_attribute_names, &mut None)
            });
        let operation = MultipleReadInput {
            consistent_read: self.consistent_read,
            exclusive_start_key,
            expression_attribute_names,
            expression_attribute_values,
            filter_expression,
            index_name: self.index_name,
            limit: self.limit,
            projection_expression,
            select: self.select,
            table_name: self.table_name,
        };
        Ok(operation)
    }
}

/// apply common single read operation settings to a builder
#[macro_export]
macro_rules! apply_single_read_operation {
    ($builder:expr, $single_read_operation:expr) => {
        $builder
            .set_consistent_read($single_read_operation.consistent_read)
            .set_expression_attribute_names($single_read_operation.expression_attribute_names)
            .set_projection_expression($single_read_operation.projection_expression)
            .table_name($single_read_operation.table_name)
    };
}

/// apply common multiple read operation settings to a builder
#[macro_export]
macro_rules! apply_multiple_read_operation {
    ($builder:expr, $multiple_read_operation:expr) => {
        $builder
            .set_consistent_read($multiple_read_operation.consistent_read)
            .set_exclusive_start_key($multiple_read_operation.exclusive_start_key)
            .set_expression_attribute_names($multiple_read_operation.expression_attribute_names)
            .set_expression_attribute_values($multiple_read_operation.expression_attribute_values)
            .set_filter_expression($multiple_read_operation.filter_expression)
            .set_index_name($multiple_read_operation.index_name)
            .set_limit($multiple_read_operation.limit)
            .set_projection_expression($multiple_read_operation.projection_expression)
            .set_select($multiple_read_operation.select)
            .table_name($multiple_read_operation.table_name)
    };
}
