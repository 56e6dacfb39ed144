//! Common utilities for DynamoDB requests.
//!
//! This module provides shared types used across read and write requests,
//! including key handling, condition expressions, and attribute selection.

/// Condition expressions for key conditions, filters and conditional writes.
pub mod condition;

/// Key types for identifying items in DynamoDB tables.
pub mod key;

/// Attribute selection for projection and removal expressions.
pub mod selection;

use aws_sdk_dynamodb::types;
use std::collections;

/// Encodes `name` with the characters allowed in expression placeholders.
///
/// ASCII letters and digits are kept; any other character, `_` included, becomes its
/// code point in hex between underscores. Distinct names never share an encoding.
pub(crate) fn sanitize(name: &str) -> String {
    let mut sanitized = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            sanitized.push(c);
        } else {
            sanitized.push_str(&format!("_{:x}_", u32::from(c)));
        }
    }
    sanitized
}

pub(crate) fn placeholder(name: &str) -> String {
    format!("#{}", sanitize(name))
}

fn get_expression(left: String, separator: &str, right: String) -> String {
    if left.is_empty() {
        right
    } else if right.is_empty() {
        left
    } else {
        format!("{left}{separator}{right}")
    }
}

fn extend_or_skip<V>(
    target: &mut Option<collections::HashMap<String, V>>,
    source: collections::HashMap<String, V>,
) {
    if source.is_empty() {
        return;
    }
    match target {
        Some(existing) => existing.extend(source),
        None => *target = Some(source),
    }
}

/// expression with its placeholders
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ExpressionInput {
    pub(crate) expression: String,
    pub(crate) expression_attribute_names: collections::HashMap<String, String>,
    pub(crate) expression_attribute_values: collections::HashMap<String, types::AttributeValue>,
}

impl ExpressionInput {
    pub(crate) fn merge(separator: &str, items: Vec<Self>) -> Self {
        let mut operation = Self::default();
        for item in items {
            operation
                .expression_attribute_names
                .extend(item.expression_attribute_names);
            operation
                .expression_attribute_values
                .extend(item.expression_attribute_values);
            operation.expression = get_expression(operation.expression, separator, item.expression);
        }
        operation
    }

    /// Moves the placeholders into request-level maps, leaving a map `None` when there is
    /// nothing to add: DynamoDB rejects empty expression attribute maps.
    pub(crate) fn merge_into(
        self,
        names: &mut Option<collections::HashMap<String, String>>,
        values: &mut Option<collections::HashMap<String, types::AttributeValue>>,
    ) -> String {
        extend_or_skip(names, self.expression_attribute_names);
        extend_or_skip(values, self.expression_attribute_values);
        self.expression
    }
}
