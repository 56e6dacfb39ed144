use crate::table::config;

use aws_sdk_dynamodb::{Client, error, operation, types};

fn key_schema(
    hash_key: &config::KeyDescriptor,
    range_key: Option<&config::KeyDescriptor>,
) -> Result<Vec<types::KeySchemaElement>, error::BuildError> {
    let mut key_schema = vec![
        types::KeySchemaElement::builder()
            .attribute_name(&hash_key.name)
            .key_type(types::KeyType::Hash)
            .build()?,
    ];
    if let Some(range_key) = range_key {
        key_schema.push(
            types::KeySchemaElement::builder()
                .attribute_name(&range_key.name)
                .key_type(types::KeyType::Range)
                .build()?,
        );
    }
    Ok(key_schema)
}

fn define_attribute(
    attribute_definitions: &mut Vec<types::AttributeDefinition>,
    key: &config::KeyDescriptor,
) -> Result<(), error::BuildError> {
    if attribute_definitions
        .iter()
        .any(|definition| definition.attribute_name() == key.name)
    {
        return Ok(());
    }
    attribute_definitions.push(
        types::AttributeDefinition::builder()
            .attribute_name(&key.name)
            .attribute_type(key.attribute_type.into())
            .build()?,
    );
    Ok(())
}

/// Create table request.
///
/// Key attributes of the table and its indexes are defined once each. Without
/// `throughput` the table is billed per request; with it, the table is provisioned and
/// every global index uses its own throughput or the table's.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_model::table::{config, create_table};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let create_table = create_table::CreateTable {
///     table_name: "Posts".to_string(),
///     hash_key: config::KeyDescriptor::string("userId"),
///     range_key: Some(config::KeyDescriptor::number("createdAt")),
///     ..Default::default()
/// };
/// create_table.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CreateTable {
    /// The name of the table to create.
    pub table_name: String,
    /// The partition key.
    pub hash_key: config::KeyDescriptor,
    /// The sort key.
    pub range_key: Option<config::KeyDescriptor>,
    /// Secondary indexes.
    pub indexes: Vec<config::IndexDescriptor>,
    /// Provisioned capacity, pay per request when unset.
    pub throughput: Option<config::ProvisionedThroughput>,
}

impl CreateTable {
    /// The request for the table described by `table_config`.
    pub fn from_config(
        table_config: &config::TableConfig,
        throughput: Option<config::ProvisionedThroughput>,
    ) -> Self {
        Self {
            table_name: table_config.table_name.resolve(),
            hash_key: table_config.hash_key.clone(),
            range_key: table_config.range_key.clone(),
            indexes: table_config.indexes.clone(),
            throughput,
        }
    }
}

impl TryFrom<CreateTable> for operation::create_table::CreateTableInput {
    type Error = error::BuildError;

    fn try_from(create_table: CreateTable) -> Result<Self, Self::Error> {
        let mut attribute_definitions = Vec::new();
        define_attribute(&mut attribute_definitions, &create_table.hash_key)?;
        if let Some(range_key) = &create_table.range_key {
            define_attribute(&mut attribute_definitions, range_key)?;
        }
        let mut global_secondary_indexes = Vec::new();
        let mut local_secondary_indexes = Vec::new();
        for index in create_table.indexes {
            define_attribute(&mut attribute_definitions, &index.hash_key)?;
            if let Some(range_key) = &index.range_key {
                define_attribute(&mut attribute_definitions, range_key)?;
            }
            let index_key_schema = key_schema(&index.hash_key, index.range_key.as_ref())?;
            let projection = index.projection.unwrap_or_default().into();
            match index.kind {
                config::IndexKind::Global => {
                    let throughput = match create_table.throughput {
                        Some(table_throughput) => {
                            Some(index.throughput.unwrap_or(table_throughput).try_into()?)
                        }
                        None => None,
                    };
                    global_secondary_indexes.push(
                        types::GlobalSecondaryIndex::builder()
                            .index_name(index.name)
                            .set_key_schema(Some(index_key_schema))
                            .projection(projection)
                            .set_provisioned_throughput(throughput)
                            .build()?,
                    );
                }
                config::IndexKind::Local => {
                    local_secondary_indexes.push(
                        types::LocalSecondaryIndex::builder()
                            .index_name(index.name)
                            .set_key_schema(Some(index_key_schema))
                            .projection(projection)
                            .build()?,
                    );
                }
            }
        }
        let (billing_mode, provisioned_throughput) = match create_table.throughput {
            Some(throughput) => (types::BillingMode::Provisioned, Some(throughput.try_into()?)),
            None => (types::BillingMode::PayPerRequest, None),
        };
        Self::builder()
            .table_name(create_table.table_name)
            .set_key_schema(Some(key_schema(
                &create_table.hash_key,
                create_table.range_key.as_ref(),
            )?))
            .set_attribute_definitions(Some(attribute_definitions))
            .set_global_secondary_indexes(
                (!global_secondary_indexes.is_empty()).then_some(global_secondary_indexes),
            )
            .set_local_secondary_indexes(
                (!local_secondary_indexes.is_empty()).then_some(local_secondary_indexes),
            )
            .billing_mode(billing_mode)
            .set_provisioned_throughput(provisioned_throughput)
            .build()
    }
}

impl CreateTable {
    /// Execute the create table operation.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_model.create_table", skip_all, err)
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::create_table::CreateTableOutput,
        error::SdkError<operation::create_table::CreateTableError>,
    > {
        let create_table: operation::create_table::CreateTableInput =
            self.try_into().map_err(error::BuildError::other)?;
        client
            .create_table()
            .set_table_name(create_table.table_name)
            .set_key_schema(create_table.key_schema)
            .set_attribute_definitions(create_table.attribute_definitions)
            .set_global_secondary_indexes(create_table.global_secondary_indexes)
            .set_local_secondary_indexes(create_table.local_secondary_indexes)
            .set_billing_mode(create_table.billing_mode)
            .set_provisioned_throughput(create_table.provisioned_throughput)
            .send()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_element(name: &str, key_type: types::KeyType) -> types::KeySchemaElement {
        types::KeySchemaElement::builder()
            .attribute_name(name)
            .key_type(key_type)
            .build()
            .unwrap()
    }

    fn definition(name: &str, attribute_type: types::ScalarAttributeType) -> types::AttributeDefinition {
        types::AttributeDefinition::builder()
            .attribute_name(name)
            .attribute_type(attribute_type)
            .build()
            .unwrap()
    }

    fn throughput(read: i64, write: i64) -> types::ProvisionedThroughput {
        types::ProvisionedThroughput::builder()
            .read_capacity_units(read)
            .write_capacity_units(write)
            .build()
            .unwrap()
    }

    fn posts() -> CreateTable {
        CreateTable {
            table_name: "Posts".to_string(),
            hash_key: config::KeyDescriptor::string("userId"),
            range_key: Some(config::KeyDescriptor::number("createdAt")),
            indexes: vec![
                config::IndexDescriptor {
                    name: "byStatus".to_string(),
                    kind: config::IndexKind::Global,
                    hash_key: config::KeyDescriptor::string("status"),
                    range_key: Some(config::KeyDescriptor::number("createdAt")),
                    projection: Some(config::Projection::KeysOnly),
                    ..Default::default()
                },
                config::IndexDescriptor {
                    name: "byTitle".to_string(),
                    kind: config::IndexKind::Local,
                    hash_key: config::KeyDescriptor::string("userId"),
                    range_key: Some(config::KeyDescriptor::string("title")),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_create_table_pay_per_request() {
        let actual: operation::create_table::CreateTableInput = posts().try_into().unwrap();
        assert_eq!(actual.table_name(), Some("Posts"));
        assert_eq!(actual.billing_mode(), Some(&types::BillingMode::PayPerRequest));
        assert_eq!(actual.provisioned_throughput(), None);
        assert_eq!(
            actual.key_schema(),
            [
                key_element("userId", types::KeyType::Hash),
                key_element("createdAt", types::KeyType::Range),
            ]
        );
        assert_eq!(
            actual.attribute_definitions(),
            [
                definition("userId", types::ScalarAttributeType::S),
                definition("createdAt", types::ScalarAttributeType::N),
                definition("status", types::ScalarAttributeType::S),
                definition("title", types::ScalarAttributeType::S),
            ]
        );
        assert_eq!(
            actual.global_secondary_indexes(),
            [types::GlobalSecondaryIndex::builder()
                .index_name("byStatus")
                .key_schema(key_element("status", types::KeyType::Hash))
                .key_schema(key_element("createdAt", types::KeyType::Range))
                .projection(
                    types::Projection::builder()
                        .projection_type(types::ProjectionType::KeysOnly)
                        .build()
                )
                .build()
                .unwrap()]
        );
        assert_eq!(
            actual.local_secondary_indexes(),
            [types::LocalSecondaryIndex::builder()
                .index_name("byTitle")
                .key_schema(key_element("userId", types::KeyType::Hash))
                .key_schema(key_element("title", types::KeyType::Range))
                .projection(
                    types::Projection::builder()
                        .projection_type(types::ProjectionType::All)
                        .build()
                )
                .build()
                .unwrap()]
        );
    }

    #[test]
    fn test_create_table_provisioned() {
        let mut create_table = posts();
        create_table.throughput = Some(config::ProvisionedThroughput { read: 5, write: 2 });
        create_table.indexes.push(config::IndexDescriptor {
            name: "byTag".to_string(),
            hash_key: config::KeyDescriptor::string("tag"),
            throughput: Some(config::ProvisionedThroughput { read: 1, write: 1 }),
            ..Default::default()
        });
        let actual: operation::create_table::CreateTableInput = create_table.try_into().unwrap();
        assert_eq!(actual.billing_mode(), Some(&types::BillingMode::Provisioned));
        assert_eq!(actual.provisioned_throughput(), Some(&throughput(5, 2)));
        let index_throughput: Vec<_> = actual
            .global_secondary_indexes()
            .iter()
            .map(|index| (index.index_name(), index.provisioned_throughput().cloned()))
            .collect();
        assert_eq!(
            index_throughput,
            [
                ("byStatus", Some(throughput(5, 2))),
                ("byTag", Some(throughput(1, 1))),
            ]
        );
    }

    #[test]
    fn test_create_table_without_indexes() {
        let create_table = CreateTable {
            table_name: "Videos".to_string(),
            hash_key: config::KeyDescriptor::number("id"),
            ..Default::default()
        };
        let actual: operation::create_table::CreateTableInput = create_table.try_into().unwrap();
        assert_eq!(actual.global_secondary_indexes, None);
        assert_eq!(actual.local_secondary_indexes, None);
        assert_eq!(
            actual.attribute_definitions(),
            [definition("id", types::ScalarAttributeType::N)]
        );
    }
}
