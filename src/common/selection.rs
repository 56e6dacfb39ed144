use crate::common;

use std::collections;

/// Separator for nested attribute paths, as in `address.city`.
const PATH_SEPARATOR: char = '.';

/// Attribute paths used by projection and `REMOVE` expressions.
///
/// Each path is split on `.` so nested map attributes can be addressed.
///
/// ```rust
/// use dynamodb_model::common::selection;
///
/// let selection = selection::Selection::from(vec!["id", "address.city"]);
/// ```
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Selection(pub Vec<String>);

impl<S: Into<String>> From<Vec<S>> for Selection {
    fn from(attributes: Vec<S>) -> Self {
        Self(attributes.into_iter().map(Into::into).collect())
    }
}

impl Selection {
    /// Whether no attribute is selected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Selection> for common::ExpressionInput {
    fn from(selection: Selection) -> Self {
        let operations = selection
            .0
            .into_iter()
            .map(|attribute| {
                let mut expression_attribute_names = collections::HashMap::new();
                let path: Vec<String> = attribute
                    .split(PATH_SEPARATOR)
                    .map(|segment| {
                        let placeholder = common::placeholder(segment);
                        expression_attribute_names.insert(placeholder.clone(), segment.to_string());
                        placeholder
                    })
                    .collect();
                common::ExpressionInput {
                    expression: path.join("."),
                    expression_attribute_names,
                    ..Default::default()
                }
            })
            .collect();
        common::ExpressionInput::merge(", ", operations)
    }
}
