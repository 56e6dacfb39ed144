use aws_sdk_dynamodb::types;
use serde::Serialize;
use serde_dynamo::{Error, Result, to_attribute_value};
use std::collections;

/// One attribute of a primary key.
///
/// ```rust
/// use dynamodb_model::common::key;
///
/// let key = key::Key {
///     name: "id".to_string(),
///     value: 1,
/// };
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Key<T> {
    /// The attribute name.
    pub name: String,
    /// The attribute value.
    pub value: T,
}

/// Primary key of an item: partition key and optional sort key.
///
/// ```rust
/// use dynamodb_model::common::key;
///
/// let keys = key::Keys {
///     partition_key: key::Key {
///         name: "id".to_string(),
///         value: 1,
///     },
///     ..Default::default()
/// };
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Keys<T> {
    /// The partition (hash) key.
    pub partition_key: Key<T>,
    /// The sort (range) key, only for tables with composite primary keys.
    pub sort_key: Option<Key<T>>,
}

impl<T> Keys<T> {
    /// Whether `name` is one of the key attributes.
    pub fn contains(&self, name: &str) -> bool {
        self.partition_key.name == name
            || self
                .sort_key
                .as_ref()
                .is_some_and(|sort_key| sort_key.name == name)
    }
}

impl<T: Serialize> TryFrom<Keys<T>> for collections::HashMap<String, types::AttributeValue> {
    type Error = Error;

    fn try_from(key: Keys<T>) -> Result<Self> {
        let partition_key_value = to_attribute_value(key.partition_key.value)?;
        let mut keys = Self::from([(key.partition_key.name, partition_key_value)]);
        if let Some(sort_key) = key.sort_key {
            let sort_key_value = to_attribute_value(sort_key.value)?;
            keys.insert(sort_key.name, sort_key_value);
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case::hash_key_number(
        Keys {
            partition_key: Key {
                name: "id".to_string(),
                value: json!(1),
            },
            ..Default::default()
        },
        collections::HashMap::from(
            [(
                "id".to_string(),
                types::AttributeValue::N(
                    "1".to_string()
                ),
            )]
        )
    )]
    #[case::hash_and_range_keys(
        Keys {
            partition_key: Key {
                name: "userId".to_string(),
                value: json!("u1"),
            },
            sort_key: Some(
                Key {
                    name: "createdAt".to_string(),
                    value: json!(1700000000),
                }
            ),
        },
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
                        "1700000000".to_string()
                    )
                ),
            ]
        )
    )]
    fn test_keys_to_hash_map(
        #[case] keys: Keys<Value>,
        #[case] expected: collections::HashMap<String, types::AttributeValue>,
    ) {
        let actual: collections::HashMap<String, types::AttributeValue> = keys.try_into().unwrap();
        assert_eq!(actual, expected);
    }

    #[rstest]
    #[case::hash_key("userId", true)]
    #[case::range_key("createdAt", true)]
    #[case::other("title", false)]
    fn test_keys_contains(#[case] name: &str, #[case] expected: bool) {
        let keys = Keys {
            partition_key: Key {
                name: "userId".to_string(),
                value: json!("u1"),
            },
            sort_key: Some(Key {
                name: "createdAt".to_string(),
                value: json!(1),
            }),
        };
        assert_eq!(keys.contains(name), expected);
    }
}
