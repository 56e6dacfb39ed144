use crate::{common, write};

use aws_sdk_dynamodb::{Client, error, operation, types};
use indexmap::IndexMap;
use serde::{Serialize, ser::Error as _};
use serde_dynamo::{Error, Result, to_attribute_value};
use std::collections;

/// Separator between clauses of the same action.
const CLAUSE_SEPARATOR: &str = ", ";

/// Separator between actions.
const ACTION_SEPARATOR: &str = " ";

fn get_set_operation<T: Serialize>(
    set: IndexMap<String, T>,
    keys: &common::key::Keys<T>,
    index: &mut usize,
) -> Result<common::ExpressionInput> {
    let mut clauses = Vec::with_capacity(set.len());
    let mut expression_attribute_names = collections::HashMap::with_capacity(set.len());
    let mut expression_attribute_values = collections::HashMap::with_capacity(set.len());
    for (name, value) in set {
        if keys.contains(&name) {
            continue;
        }
        let placeholder = common::placeholder(&name);
        let value_placeholder = format!(":set{index}");
        *index += 1;
        clauses.push(format!("{placeholder} = {value_placeholder}"));
        expression_attribute_names.insert(placeholder, name);
        expression_attribute_values.insert(value_placeholder, to_attribute_value(value)?);
    }
    let expression = if clauses.is_empty() {
        String::new()
    } else {
        format!("SET {}", clauses.join(CLAUSE_SEPARATOR))
    };
    let operation = common::ExpressionInput {
        expression,
        expression_attribute_names,
        expression_attribute_values,
    };
    Ok(operation)
}

fn get_remove_operation(remove: Vec<String>) -> common::ExpressionInput {
    let mut operation: common::ExpressionInput = common::selection::Selection::from(remove).into();
    if !operation.expression.is_empty() {
        operation.expression = format!("REMOVE {}", operation.expression);
    }
    operation
}

/// update item operation
#[derive(Clone, Debug, Default, PartialEq)]
struct UpdateItemInput {
    keys: collections::HashMap<String, types::AttributeValue>,
    update_expression: String,
    write_operation: write::common::WriteInput,
}

/// Partial update of one item: assigns attributes, then removes attributes.
///
/// Attributes in `set` named like a key attribute are skipped, so key fields never
/// change. An update left with nothing to set or remove fails to build.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_model::{common, write};
/// use indexmap::IndexMap;
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let update_item = write::update_item::UpdateItem {
///     keys: common::key::Keys {
///         partition_key: common::key::Key {
///             name: "id".to_string(),
///             value: "1".to_string(),
///         },
///         ..Default::default()
///     },
///     set: IndexMap::from([("title".to_string(), "New title".to_string())]),
///     remove: vec!["draft".to_string()],
///     write_args: write::common::WriteArgs {
///         table_name: "Videos".to_string(),
///         ..Default::default()
///     },
/// };
/// // "SET #title = :set0 REMOVE #draft"
/// update_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateItem<T> {
    /// The primary key of the item to update.
    pub keys: common::key::Keys<T>,
    /// Attributes to assign, in order.
    pub set: IndexMap<String, T>,
    /// Attributes to remove, nested ones as `address.city`.
    pub remove: Vec<String>,
    /// Table name, condition and return values.
    pub write_args: write::common::WriteArgs<T>,
}

impl<T: Serialize> TryFrom<UpdateItem<T>> for UpdateItemInput {
    type Error = Error;

    fn try_from(update_item: UpdateItem<T>) -> Result<Self> {
        let set_operation = get_set_operation(update_item.set, &update_item.keys, &mut 0)?;
        let remove_operation = get_remove_operation(update_item.remove);
        let operation =
            common::ExpressionInput::merge(ACTION_SEPARATOR, vec![set_operation, remove_operation]);
        if operation.expression.is_empty() {
            return Err(Error::custom("update has nothing to set or remove"));
        }
        let mut write_operation: write::common::WriteInput = update_item.write_args.try_into()?;
        let update_expression = write_operation.merge_expression(operation);
        let operation = Self {
            keys: update_item.keys.try_into()?,
            update_expression,
            write_operation,
        };
        Ok(operation)
    }
}

impl<T: Serialize> UpdateItem<T> {
    /// Execute the update item operation.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_model.update_item", skip_all, err)
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::update_item::UpdateItemOutput,
        error::SdkError<operation::update_item::UpdateItemError>,
    > {
        let update_item: UpdateItemInput = self.try_into().map_err(error::BuildError::other)?;
        let builder = client
            .update_item()
            .set_key(Some(update_item.keys))
            .update_expression(update_item.update_expression);
        crate::apply_write_operation!(builder, update_item.write_operation)
            .send()
            .await
    }
}
