use crate::schema;

use aws_sdk_dynamodb::types;
use std::{fmt, sync::Arc};

/// Name of the physical table, fixed or resolved on every call.
///
/// ```rust
/// use dynamodb_model::table::config::TableName;
///
/// let fixed = TableName::from("Videos");
/// let per_stage = TableName::resolver(|| format!("{}-Videos", "dev"));
/// assert_eq!(fixed.resolve(), "Videos");
/// assert_eq!(per_stage.resolve(), "dev-Videos");
/// ```
#[derive(Clone)]
pub enum TableName {
    /// A constant table name.
    Static(String),
    /// A closure returning the table name.
    Resolver(Arc<dyn Fn() -> String + Send + Sync>),
}

impl TableName {
    /// Wraps a closure into a [`TableName::Resolver`].
    pub fn resolver(resolver: impl Fn() -> String + Send + Sync + 'static) -> Self {
        Self::Resolver(Arc::new(resolver))
    }

    /// The current table name.
    pub fn resolve(&self) -> String {
        match self {
            Self::Static(name) => name.clone(),
            Self::Resolver(resolver) => resolver(),
        }
    }
}

impl fmt::Debug for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(name) => f.debug_tuple("Static").field(name).finish(),
            Self::Resolver(_) => f.debug_tuple("Resolver").finish_non_exhaustive(),
        }
    }
}

impl From<&str> for TableName {
    fn from(name: &str) -> Self {
        Self::Static(name.to_string())
    }
}

impl From<String> for TableName {
    fn from(name: String) -> Self {
        Self::Static(name)
    }
}

/// Scalar type of a key attribute.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum AttributeType {
    /// `S`
    #[default]
    String,
    /// `N`
    Number,
}

impl From<AttributeType> for types::ScalarAttributeType {
    fn from(attribute_type: AttributeType) -> Self {
        match attribute_type {
            AttributeType::String => Self::S,
            AttributeType::Number => Self::N,
        }
    }
}

/// A key attribute: its name and scalar type.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct KeyDescriptor {
    /// The attribute name.
    pub name: String,
    /// The attribute type.
    pub attribute_type: AttributeType,
}

impl KeyDescriptor {
    /// A string key attribute.
    pub fn string(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attribute_type: AttributeType::String,
        }
    }

    /// A number key attribute.
    pub fn number(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attribute_type: AttributeType::Number,
        }
    }
}

/// Read and write capacity units.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct ProvisionedThroughput {
    /// Read capacity units.
    pub read: i64,
    /// Write capacity units.
    pub write: i64,
}

impl TryFrom<ProvisionedThroughput> for types::ProvisionedThroughput {
    type Error = aws_sdk_dynamodb::error::BuildError;

    fn try_from(throughput: ProvisionedThroughput) -> Result<Self, Self::Error> {
        Self::builder()
            .read_capacity_units(throughput.read)
            .write_capacity_units(throughput.write)
            .build()
    }
}

/// Local or global secondary index.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum IndexKind {
    /// Shares the table partition key.
    Local,
    /// Has its own partition key and throughput.
    #[default]
    Global,
}

/// Attributes copied into an index.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum Projection {
    /// Every attribute.
    #[default]
    All,
    /// Only the table and index keys.
    KeysOnly,
    /// The keys plus the listed attributes.
    Include(Vec<String>),
}

impl From<Projection> for types::Projection {
    fn from(projection: Projection) -> Self {
        let builder = Self::builder();
        match projection {
            Projection::All => builder.projection_type(types::ProjectionType::All),
            Projection::KeysOnly => builder.projection_type(types::ProjectionType::KeysOnly),
            Projection::Include(attributes) => builder
                .projection_type(types::ProjectionType::Include)
                .set_non_key_attributes(Some(attributes)),
        }
        .build()
    }
}

/// A secondary index of the table.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct IndexDescriptor {
    /// The index name.
    pub name: String,
    /// Local or global.
    pub kind: IndexKind,
    /// The index partition key.
    pub hash_key: KeyDescriptor,
    /// The index sort key.
    pub range_key: Option<KeyDescriptor>,
    /// Projected attributes, `All` when unset.
    pub projection: Option<Projection>,
    /// Global index capacity, falling back to the table's when unset.
    pub throughput: Option<ProvisionedThroughput>,
}

/// Everything the model knows about its table.
///
/// ```rust
/// use dynamodb_model::table::config::{KeyDescriptor, TableConfig};
///
/// let config = TableConfig::new("Video", "Videos", KeyDescriptor::number("id"));
/// assert_eq!(config.table_name.resolve(), "Videos");
/// ```
#[derive(Clone, Debug)]
pub struct TableConfig {
    /// Logical model name, used in messages.
    pub name: String,
    /// The physical table name.
    pub table_name: TableName,
    /// The partition key.
    pub hash_key: KeyDescriptor,
    /// The sort key, for composite primary keys.
    pub range_key: Option<KeyDescriptor>,
    /// Secondary indexes.
    pub indexes: Vec<IndexDescriptor>,
    /// Validator of items before `put` and `create`.
    pub schema: Option<Arc<dyn schema::Validator>>,
    /// Validator of the `set` attributes before `update`.
    pub update_schema: Option<Arc<dyn schema::Validator>>,
}

impl TableConfig {
    /// A table with a partition key only, no indexes and no validation.
    pub fn new(
        name: impl Into<String>,
        table_name: impl Into<TableName>,
        hash_key: KeyDescriptor,
    ) -> Self {
        Self {
            name: name.into(),
            table_name: table_name.into(),
            hash_key,
            range_key: None,
            indexes: Vec::new(),
            schema: None,
            update_schema: None,
        }
    }

    /// Sets the sort key.
    pub fn with_range_key(mut self, range_key: KeyDescriptor) -> Self {
        self.range_key = Some(range_key);
        self
    }

    /// Adds a secondary index.
    pub fn with_index(mut self, index: IndexDescriptor) -> Self {
        self.indexes.push(index);
        self
    }

    /// Sets the item validator.
    pub fn with_schema(mut self, schema: impl schema::Validator + 'static) -> Self {
        self.schema = Some(Arc::new(schema));
        self
    }

    /// Sets the update validator.
    pub fn with_update_schema(mut self, update_schema: impl schema::Validator + 'static) -> Self {
        self.update_schema = Some(Arc::new(update_schema));
        self
    }
}
