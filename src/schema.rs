//! Payload validation before writes.
//!
//! A [`Validator`] receives the document form of a payload and returns it normalized
//! (converted values, defaults applied) or the reason it was rejected. [`Schema`] is the
//! declarative implementation shipped with the crate.

use indexmap::IndexMap;
use serde_json::{Map, Number, Value};
use std::fmt;

/// Errors reported by a [`Validator`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// The payload is not a map.
    #[error("value must be an object")]
    NotAnObject,
    /// A required field is absent.
    #[error("\"{field}\" is required")]
    MissingField {
        /// The field name.
        field: String,
    },
    /// A non nullable field is `null`.
    #[error("\"{field}\" must not be null")]
    NullField {
        /// The field name.
        field: String,
    },
    /// A field holds a value of the wrong type.
    #[error("\"{field}\" must be of type {expected}")]
    InvalidType {
        /// The field name.
        field: String,
        /// The declared type.
        expected: FieldType,
    },
    /// A field is not declared by the schema.
    #[error("\"{field}\" is not allowed")]
    UnknownField {
        /// The field name.
        field: String,
    },
    /// Every error found, when not aborting early.
    #[error("{}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join(". "))]
    Multiple(Vec<ValidationError>),
}

/// Whether fields without `required` must be present.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Presence {
    /// Only fields marked `required` must be present.
    #[default]
    Optional,
    /// Every declared field must be present.
    Required,
}

/// Knobs of a validation run.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ValidationOptions {
    /// Keep fields the schema does not declare.
    pub allow_unknown: bool,
    /// Stop at the first error.
    pub abort_early: bool,
    /// Coerce strings to numbers and booleans where the schema asks for them.
    pub convert: bool,
    /// Fill absent fields with their defaults.
    pub keep_defaults: bool,
    /// Presence of fields without `required`.
    pub presence: Presence,
    /// Drop fields the schema does not declare instead of rejecting them.
    pub strip_unknown: bool,
}

impl ValidationOptions {
    /// Options used by the model before `put`, `create` and `update`.
    pub const STRICT: Self = Self {
        allow_unknown: false,
        abort_early: true,
        convert: true,
        keep_defaults: true,
        presence: Presence::Optional,
        strip_unknown: false,
    };
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self::STRICT
    }
}

/// Checks and normalizes a document.
pub trait Validator: fmt::Debug + Send + Sync {
    /// Returns the normalized document, or why it was rejected.
    fn validate(
        &self,
        value: Value,
        options: &ValidationOptions,
    ) -> Result<Value, ValidationError>;
}

/// Declared type of a field.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum FieldType {
    /// Any value.
    #[default]
    Any,
    /// A list.
    Array,
    /// `true` or `false`.
    Boolean,
    /// A whole number.
    Integer,
    /// Any number.
    Number,
    /// A map.
    Object,
    /// A string.
    String,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Any => "value",
            Self::Array => "array",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Object => "object",
            Self::String => "string",
        };
        f.write_str(name)
    }
}

impl FieldType {
    fn matches(self, value: &Value) -> bool {
        match self {
            Self::Any => true,
            Self::Array => value.is_array(),
            Self::Boolean => value.is_boolean(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::Object => value.is_object(),
            Self::String => value.is_string(),
        }
    }

    fn convert(self, value: Value) -> Value {
        let converted = match (self, &value) {
            (Self::Integer, Value::Number(number)) if number.is_f64() => {
                number.as_f64().and_then(integral)
            }
            (_, Value::String(text)) => self.parse(text.trim()),
            _ => None,
        };
        converted.unwrap_or(value)
    }

    fn parse(self, text: &str) -> Option<Value> {
        match self {
            Self::Boolean => match text {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
            Self::Integer => text
                .parse::<i64>()
                .ok()
                .map(Value::from)
                .or_else(|| text.parse::<f64>().ok().and_then(integral)),
            Self::Number => text
                .parse::<i64>()
                .ok()
                .map(Value::from)
                .or_else(|| text.parse::<f64>().ok().and_then(Number::from_f64).map(Value::Number)),
            _ => None,
        }
    }
}

/// `number` as an integer when it has no fractional part and fits an `i64`.
fn integral(number: f64) -> Option<Value> {
    let in_range = number >= i64::MIN as f64 && number < i64::MAX as f64;
    (number.fract() == 0.0 && in_range).then(|| Value::from(number as i64))
}

/// Declaration of one field.
///
/// ```rust
/// use dynamodb_model::schema::Field;
///
/// let views = Field::integer().required();
/// let tags = Field::array().nullable();
/// let status = Field::string().with_default("draft");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Field {
    /// The expected type.
    pub kind: FieldType,
    /// Must be present.
    pub required: bool,
    /// May be `null`.
    pub nullable: bool,
    /// Value used when the field is absent.
    pub default: Option<Value>,
}

impl Field {
    /// A field of type `kind`.
    pub fn new(kind: FieldType) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// A field accepting any value.
    pub fn any() -> Self {
        Self::new(FieldType::Any)
    }

    /// A list field.
    pub fn array() -> Self {
        Self::new(FieldType::Array)
    }

    /// A boolean field.
    pub fn boolean() -> Self {
        Self::new(FieldType::Boolean)
    }

    /// A whole number field.
    pub fn integer() -> Self {
        Self::new(FieldType::Integer)
    }

    /// A number field.
    pub fn number() -> Self {
        Self::new(FieldType::Number)
    }

    /// A map field.
    pub fn object() -> Self {
        Self::new(FieldType::Object)
    }

    /// A string field.
    pub fn string() -> Self {
        Self::new(FieldType::String)
    }

    /// Marks the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Allows `null`.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Sets the value used when the field is absent.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    fn check(
        &self,
        name: &str,
        value: Value,
        options: &ValidationOptions,
    ) -> Result<Value, ValidationError> {
        if value.is_null() {
            return if self.nullable {
                Ok(value)
            } else {
                Err(ValidationError::NullField {
                    field: name.to_string(),
                })
            };
        }
        let value = if options.convert {
            self.kind.convert(value)
        } else {
            value
        };
        if self.kind.matches(&value) {
            Ok(value)
        } else {
            Err(ValidationError::InvalidType {
                field: name.to_string(),
                expected: self.kind,
            })
        }
    }
}

/// Declarative schema of a flat document.
///
/// ```rust
/// use dynamodb_model::schema::{Field, Schema, ValidationOptions, Validator};
/// use serde_json::json;
///
/// let schema = Schema::new()
///     .field("id", Field::integer().required())
///     .field("title", Field::string().required())
///     .field("status", Field::string().with_default("draft"));
/// let video = schema
///     .validate(json!({"id": "1", "title": "Intro"}), &ValidationOptions::STRICT)
///     .unwrap();
/// assert_eq!(video, json!({"id": 1, "title": "Intro", "status": "draft"}));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Schema {
    /// Declared fields, in validation order.
    pub fields: IndexMap<String, Field>,
}

impl Schema {
    /// An empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a field.
    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.fields.insert(name.into(), field);
        self
    }
}

impl Validator for Schema {
    fn validate(
        &self,
        value: Value,
        options: &ValidationOptions,
    ) -> Result<Value, ValidationError> {
        let Value::Object(mut input) = value else {
            return Err(ValidationError::NotAnObject);
        };
        let mut output = Map::with_capacity(input.len());
        let mut errors = Vec::new();
        for (name, field) in &self.fields {
            let checked = match input.remove(name) {
                Some(value) => field.check(name, value, options).map(Some),
                None => match &field.default {
                    Some(default) if options.keep_defaults => Ok(Some(default.clone())),
                    _ if field.required || options.presence == Presence::Required => {
                        Err(ValidationError::MissingField {
                            field: name.clone(),
                        })
                    }
                    _ => Ok(None),
                },
            };
            match checked {
                Ok(Some(value)) => {
                    output.insert(name.clone(), value);
                }
                Ok(None) => {}
                Err(error) => {
                    errors.push(error);
                    if options.abort_early {
                        break;
                    }
                }
            }
        }
        for (name, value) in input {
            if options.abort_early && !errors.is_empty() {
                break;
            }
            if options.strip_unknown {
                continue;
            }
            if options.allow_unknown {
                output.insert(name, value);
            } else {
                errors.push(ValidationError::UnknownField { field: name });
            }
        }
        match errors.len() {
            0 => Ok(Value::Object(output)),
            1 => Err(errors.remove(0)),
            _ => Err(ValidationError::Multiple(errors)),
        }
    }
}
