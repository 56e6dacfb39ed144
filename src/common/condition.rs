use crate::common;

use aws_sdk_dynamodb::types;
use serde::Serialize;
use serde_dynamo::{Result, to_attribute_value};
use std::collections;

/// Separator joining conditions: every condition must hold.
const AND: &str = " AND ";

/// Comparison applied to a single attribute.
///
/// Key conditions accept `Equals`, the ordering comparisons, `Between` and `BeginsWith`;
/// filters and conditional writes accept every variant.
///
/// ```rust
/// use dynamodb_model::common::condition;
///
/// let eq = condition::Condition::Equals(1);
/// let prefix: condition::Condition<i32> = condition::Condition::BeginsWith("2024-".to_string());
/// let between = condition::Condition::Between(10, 20);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Condition<T> {
    /// `begins_with(attr, prefix)`, string attributes only.
    BeginsWith(String),
    /// `attr BETWEEN low AND high`, inclusive.
    Between(T, T),
    /// `attr = value`.
    Equals(T),
    /// `attribute_exists(attr)`.
    Exists,
    /// `attr > value`.
    GreaterThan(T),
    /// `attr >= value`.
    GreaterThanOrEqual(T),
    /// `attr IN (values...)`.
    In(Vec<T>),
    /// `attr < value`.
    LessThan(T),
    /// `attr <= value`.
    LessThanOrEqual(T),
    /// `attr <> value`.
    NotEqual(T),
    /// `attribute_not_exists(attr)`.
    Null,
}

fn value_placeholder(key: &str, operator: &str, index: &mut usize) -> String {
    let placeholder = format!(":{}_{operator}{index}", common::sanitize(key));
    *index += 1;
    placeholder
}

fn comparison<T: Serialize>(
    key: &str,
    key_placeholder: &str,
    (operator, symbol): (&str, &str),
    value: T,
    index: &mut usize,
    expression_attribute_values: &mut collections::HashMap<String, types::AttributeValue>,
) -> Result<String> {
    let value = to_attribute_value(value)?;
    let value_placeholder = value_placeholder(key, operator, index);
    let expression = format!("{key_placeholder} {symbol} {value_placeholder}");
    expression_attribute_values.insert(value_placeholder, value);
    Ok(expression)
}

impl<T: Serialize> Condition<T> {
    fn get_expression(
        self,
        key: &str,
        key_placeholder: &str,
        index: &mut usize,
    ) -> Result<(String, collections::HashMap<String, types::AttributeValue>)> {
        let mut expression_attribute_values = collections::HashMap::new();
        let values = &mut expression_attribute_values;
        let expression = match self {
            Self::Equals(value) => {
                comparison(key, key_placeholder, ("eq", "="), value, index, values)?
            }
            Self::GreaterThan(value) => {
                comparison(key, key_placeholder, ("gt", ">"), value, index, values)?
            }
            Self::GreaterThanOrEqual(value) => {
                comparison(key, key_placeholder, ("gte", ">="), value, index, values)?
            }
            Self::LessThan(value) => {
                comparison(key, key_placeholder, ("lt", "<"), value, index, values)?
            }
            Self::LessThanOrEqual(value) => {
                comparison(key, key_placeholder, ("lte", "<="), value, index, values)?
            }
            Self::NotEqual(value) => {
                comparison(key, key_placeholder, ("ne", "<>"), value, index, values)?
            }
            Self::BeginsWith(prefix) => {
                let value_placeholder = value_placeholder(key, "begins_with", index);
                let expression = format!("begins_with({key_placeholder}, {value_placeholder})");
                values.insert(value_placeholder, types::AttributeValue::S(prefix));
                expression
            }
            Self::Between(low, high) => {
                let low = to_attribute_value(low)?;
                let high = to_attribute_value(high)?;
                let low_placeholder = value_placeholder(key, "between", index);
                let high_placeholder = value_placeholder(key, "between", index);
                let expression =
                    format!("{key_placeholder} BETWEEN {low_placeholder} AND {high_placeholder}");
                values.insert(low_placeholder, low);
                values.insert(high_placeholder, high);
                expression
            }
            Self::In(items) => {
                let mut placeholders = Vec::with_capacity(items.len());
                for value in items {
                    let value = to_attribute_value(value)?;
                    let placeholder = value_placeholder(key, "in", index);
                    values.insert(placeholder.clone(), value);
                    placeholders.push(placeholder);
                }
                format!("{key_placeholder} IN ({})", placeholders.join(", "))
            }
            Self::Exists => format!("attribute_exists({key_placeholder})"),
            Self::Null => format!("attribute_not_exists({key_placeholder})"),
        };
        Ok((expression, expression_attribute_values))
    }
}

/// Condition applied to a named attribute.
///
/// ```rust
/// use dynamodb_model::common::condition;
///
/// let not_created = condition::KeyCondition {
///     name: "id".to_string(),
///     condition: condition::Condition::<i32>::Null,
/// };
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct KeyCondition<T> {
    /// The condition to apply to the attribute.
    pub condition: Condition<T>,
    /// The name of the attribute.
    pub name: String,
}

impl<T: Serialize> KeyCondition<T> {
    /// Joins `conditions` with `AND`; `index` keeps value placeholders unique across the
    /// expressions of one request.
    pub(crate) fn get_expression_operation(
        conditions: Vec<Self>,
        index: &mut usize,
    ) -> Result<common::ExpressionInput> {
        let mut expressions = Vec::with_capacity(conditions.len());
        let mut expression_attribute_names = collections::HashMap::with_capacity(conditions.len());
        let mut expression_attribute_values = collections::HashMap::new();
        for key_condition in conditions {
            let placeholder = common::placeholder(&key_condition.name);
            let (expression, values) =
                key_condition
                    .condition
                    .get_expression(&key_condition.name, &placeholder, index)?;
            expressions.push(expression);
            expression_attribute_names.insert(placeholder, key_condition.name);
            expression_attribute_values.extend(values);
        }
        let operation = common::ExpressionInput {
            expression: expressions.join(AND),
            expression_attribute_names,
            expression_attribute_values,
        };
        Ok(operation)
    }
}
