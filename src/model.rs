//! Typed CRUD model over one DynamoDB table.
//!
//! [`Model`] resolves key and index names from its [`TableConfig`], runs the configured
//! validators, builds requests with the [`read`], [`write`] and [`table`] builders and
//! converts responses back into the caller's item type.

use crate::{
    common,
    error::{Error, Result},
    read, schema,
    table::{
        self,
        config::{AttributeType, IndexDescriptor, KeyDescriptor, ProvisionedThroughput, TableConfig},
    },
    write,
};

use aws_sdk_dynamodb::{Client, types};
use indexmap::IndexMap;
use serde::{Serialize, de::DeserializeOwned};
use serde_dynamo::from_item;
use serde_json::Value;
use std::{collections, fmt, marker::PhantomData, time::Duration};

/// Read options of `get` and `get_items`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReadParams {
    /// Attributes to return, every attribute when unset.
    pub attributes: Option<Vec<String>>,
    /// Strongly consistent read.
    pub consistent_read: Option<bool>,
}

/// Partial update of an item.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateSpec<K, S> {
    /// Key of the item to update.
    pub key: K,
    /// Attributes to assign. Must serialize to a map; key attributes are skipped.
    pub set: Option<S>,
    /// Attributes to remove.
    pub remove: Vec<String>,
}

/// Sort key order of query results.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Order {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

/// Query of one partition of the table or of an index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryParams {
    /// Partition key value.
    pub hash_key: Value,
    /// Condition on the sort key.
    pub range_key: Option<common::condition::Condition<Value>>,
    /// Index to query, the table when unset.
    pub index: Option<String>,
    /// What to return: items, projected attributes or only the count.
    pub select: Option<types::Select>,
    /// Attributes to return.
    pub attributes: Option<Vec<String>>,
    /// Maximum number of items to evaluate.
    pub limit: Option<i32>,
    /// Strongly consistent read.
    pub consistent_read: Option<bool>,
    /// Key to resume from, as returned in [`QueryResult::last_key`].
    pub start_key: Option<collections::HashMap<String, Value>>,
    /// Sort key order.
    pub order: Option<Order>,
    /// Conditions on non key attributes, all of which must hold.
    pub filter: Vec<common::condition::KeyCondition<Value>>,
}

/// One page of query results.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryResult<T> {
    /// Number of matching items.
    pub count: usize,
    /// The items, absent when only counting.
    pub items: Option<Vec<T>>,
    /// Key to pass as `start_key` for the next page.
    pub last_key: Option<collections::HashMap<String, Value>>,
}

fn key_value(key: &KeyDescriptor, value: Option<Value>) -> Result<common::key::Key<Value>> {
    let value = value.ok_or_else(|| {
        Error::Configuration(format!("missing key attribute \"{}\"", key.name))
    })?;
    let valid = match key.attribute_type {
        AttributeType::String => value.is_string(),
        AttributeType::Number => value.is_number(),
    };
    if !valid {
        return Err(Error::Configuration(format!(
            "key attribute \"{}\" must be a {:?}",
            key.name, key.attribute_type
        )));
    }
    Ok(common::key::Key {
        name: key.name.clone(),
        value,
    })
}

/// Typed CRUD operations on the table described by a [`TableConfig`].
///
/// `K` is the key type and `T` the item type; both go through their serde
/// representations.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_model::{Model, ReadParams, table::config::{KeyDescriptor, TableConfig}};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize)]
/// struct VideoKey {
///     id: u64,
/// }
///
/// #[derive(Deserialize, Serialize)]
/// struct Video {
///     id: u64,
///     title: String,
/// }
///
/// # async fn example(client: Client) -> Result<(), dynamodb_model::Error> {
/// let videos: Model<VideoKey, Video> = Model::new(
///     TableConfig::new("Video", "Videos", KeyDescriptor::number("id")),
///     client,
/// );
/// videos.create_table(None).await?;
/// videos.create(Video { id: 1, title: "Intro".to_string() }).await?;
/// let video = videos.get(&VideoKey { id: 1 }, ReadParams::default()).await?;
/// assert_eq!(video.map(|video| video.title), Some("Intro".to_string()));
/// # Ok(())
/// # }
/// ```
pub struct Model<K, T> {
    config: TableConfig,
    client: Client,
    indexes: collections::HashMap<String, IndexDescriptor>,
    poll_interval: Duration,
    _types: PhantomData<fn(K) -> T>,
}

impl<K, T> fmt::Debug for Model<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("config", &self.config)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

impl<K, T> Model<K, T> {
    /// A model of the table described by `config`.
    ///
    /// Indexes sharing a name replace the earlier ones.
    pub fn new(config: TableConfig, client: Client) -> Self {
        let mut indexes = collections::HashMap::with_capacity(config.indexes.len());
        for index in &config.indexes {
            if indexes.insert(index.name.clone(), index.clone()).is_some() {
                crate::event!(warn, index = %index.name, model = %config.name, "duplicate index name");
            }
        }
        Self {
            config,
            client,
            indexes,
            poll_interval: table::lifecycle::POLL_INTERVAL,
            _types: PhantomData,
        }
    }

    /// Sets the delay between two table status checks.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// The table configuration.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// The current physical table name.
    pub fn table_name(&self) -> String {
        self.config.table_name.resolve()
    }

    fn index(&self, name: &str) -> Result<&IndexDescriptor> {
        self.indexes
            .get(name)
            .ok_or_else(|| Error::IndexNotFound(name.to_string()))
    }

    fn hash_key(&self, index: Option<&str>) -> Result<&KeyDescriptor> {
        match index {
            Some(index) => Ok(&self.index(index)?.hash_key),
            None => Ok(&self.config.hash_key),
        }
    }

    fn range_key(&self, index: Option<&str>) -> Result<&KeyDescriptor> {
        match index {
            Some(index) => self.index(index)?.range_key.as_ref().ok_or_else(|| {
                Error::Configuration(format!("index {index} has no range key"))
            }),
            None => self.config.range_key.as_ref().ok_or_else(|| {
                Error::Configuration(format!("table {} has no range key", self.config.name))
            }),
        }
    }

    fn validate(
        validator: Option<&dyn schema::Validator>,
        document: Value,
    ) -> Result<Value> {
        match validator {
            Some(validator) => Ok(validator.validate(document, &schema::ValidationOptions::STRICT)?),
            None => Ok(document),
        }
    }

    async fn describe_status(&self, table_name: &str) -> Result<Option<types::TableStatus>> {
        match self
            .client
            .describe_table()
            .table_name(table_name)
            .send()
            .await
        {
            Ok(output) => Ok(output.table.and_then(|table| table.table_status)),
            Err(error)
                if error
                    .as_service_error()
                    .is_some_and(|error| error.is_resource_not_found_exception()) =>
            {
                Ok(None)
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Creates the table and waits until it is no longer `CREATING`.
    ///
    /// An existing table is not an error. Without `throughput` the table is billed per
    /// request.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_model.model.create_table", skip_all, err)
    )]
    pub async fn create_table(&self, throughput: Option<ProvisionedThroughput>) -> Result<()> {
        let create_table = table::create_table::CreateTable::from_config(&self.config, throughput);
        let table_name = create_table.table_name.clone();
        crate::event!(info, table = %table_name, "creating table");
        match create_table.send(&self.client).await {
            Ok(_) => {}
            Err(error)
                if error
                    .as_service_error()
                    .is_some_and(|error| error.is_resource_in_use_exception()) =>
            {
                crate::event!(info, table = %table_name, "table already exists");
            }
            Err(error) => return Err(error.into()),
        }
        table::lifecycle::wait_for_creation(&table_name, self.poll_interval, || {
            self.describe_status(&table_name)
        })
        .await?;
        crate::event!(info, table = %table_name, "table created");
        Ok(())
    }

    /// Deletes the table and waits until it is no longer `DELETING`.
    ///
    /// A missing table is not an error, and neither is any failure while waiting. Only a
    /// rejected delete request is returned, as [`Error::Transport`], for instance when the
    /// table is still `CREATING`.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_model.model.delete_table", skip_all, err)
    )]
    pub async fn delete_table(&self) -> Result<()> {
        let table_name = self.table_name();
        crate::event!(info, table = %table_name, "deleting table");
        match self
            .client
            .delete_table()
            .table_name(&table_name)
            .send()
            .await
        {
            Ok(_) => {}
            Err(error)
                if error
                    .as_service_error()
                    .is_some_and(|error| error.is_resource_not_found_exception()) =>
            {
                crate::event!(info, table = %table_name, "table already deleted");
                return Ok(());
            }
            Err(error) => return Err(error.into()),
        }
        table::lifecycle::wait_for_deletion(self.poll_interval, || {
            self.describe_status(&table_name)
        })
        .await;
        crate::event!(info, table = %table_name, "table deleted");
        Ok(())
    }
}

impl<K: Serialize, T> Model<K, T> {
    fn derive_keys(&self, key: &K) -> Result<common::key::Keys<Value>> {
        let Value::Object(mut document) = serde_json::to_value(key)? else {
            return Err(Error::Configuration(
                "key must serialize to a map".to_string(),
            ));
        };
        let hash_key = &self.config.hash_key;
        let partition_key = key_value(hash_key, document.remove(&hash_key.name))?;
        let sort_key = match &self.config.range_key {
            Some(range_key) => Some(key_value(range_key, document.remove(&range_key.name))?),
            None => None,
        };
        Ok(common::key::Keys {
            partition_key,
            sort_key,
        })
    }

    fn update_input<S: Serialize>(
        &self,
        update: UpdateSpec<K, S>,
        table_name: String,
    ) -> Result<write::update_item::UpdateItem<Value>> {
        let keys = self.derive_keys(&update.key)?;
        let set = match update.set {
            Some(set) => {
                let document = serde_json::to_value(set)?;
                match Self::validate(self.config.update_schema.as_deref(), document)? {
                    Value::Object(set) => set.into_iter().collect(),
                    Value::Null => IndexMap::new(),
                    _ => {
                        return Err(Error::Configuration(
                            "update set must serialize to a map".to_string(),
                        ));
                    }
                }
            }
            None => IndexMap::new(),
        };
        if update.remove.is_empty() && set.keys().all(|name| keys.contains(name)) {
            return Err(Error::EmptyUpdate);
        }
        let condition = common::condition::KeyCondition {
            condition: common::condition::Condition::Exists,
            name: keys.partition_key.name.clone(),
        };
        Ok(write::update_item::UpdateItem {
            keys,
            set,
            remove: update.remove,
            write_args: write::common::WriteArgs {
                condition: Some(vec![condition]),
                return_values: Some(types::ReturnValue::AllNew),
                table_name,
                ..Default::default()
            },
        })
    }

    /// Retrieves one item by key.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_model.model.get", skip_all, err)
    )]
    pub async fn get(&self, key: &K, params: ReadParams) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let table_name = self.table_name();
        let get_item = read::get_item::GetItem {
            keys: self.derive_keys(key)?,
            single_read_args: read::common::SingleReadArgs {
                consistent_read: params.consistent_read,
                selection: params.attributes.map(common::selection::Selection::from),
                table_name,
            },
        };
        crate::event!(debug, request = ?get_item, "get item");
        let output = get_item.send(&self.client).await?;
        Ok(output.item.map(from_item).transpose()?)
    }

    /// Retrieves the existing items among `keys`, in no particular order.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_model.model.get_items", skip_all, err)
    )]
    pub async fn get_items(&self, keys: &[K], params: ReadParams) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let table_name = self.table_name();
        let keys = keys
            .iter()
            .map(|key| self.derive_keys(key))
            .collect::<Result<Vec<_>>>()?;
        let batch_get_item = read::batch_get_item::BatchGetItem {
            items: IndexMap::from([(
                read::common::SingleReadArgs {
                    consistent_read: params.consistent_read,
                    selection: params.attributes.map(common::selection::Selection::from),
                    table_name: table_name.clone(),
                },
                keys,
            )]),
        };
        crate::event!(debug, request = ?batch_get_item, "get items");
        let output = batch_get_item.send(&self.client).await?;
        let items = output
            .responses
            .and_then(|mut responses| responses.remove(&table_name))
            .unwrap_or_default();
        Ok(items
            .into_iter()
            .map(from_item)
            .collect::<serde_dynamo::Result<Vec<T>>>()?)
    }

    /// Removes one item by key, returning it when it existed.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_model.model.delete", skip_all, err)
    )]
    pub async fn delete(&self, key: &K) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let delete_item = write::delete_item::DeleteItem {
            keys: self.derive_keys(key)?,
            write_args: write::common::WriteArgs {
                return_values: Some(types::ReturnValue::AllOld),
                table_name: self.table_name(),
                ..Default::default()
            },
        };
        crate::event!(debug, request = ?delete_item, "delete item");
        let output = delete_item.send(&self.client).await?;
        Ok(output.attributes.map(from_item).transpose()?)
    }

    /// Applies a partial update and returns the whole updated item.
    ///
    /// A missing item fails with [`Error::ConditionalCheckFailed`]; nothing is created.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_model.model.update", skip_all, err)
    )]
    pub async fn update<S: Serialize>(&self, update: UpdateSpec<K, S>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let update_item = self.update_input(update, self.table_name())?;
        crate::event!(debug, request = ?update_item, "update item");
        let output = update_item.send(&self.client).await.map_err(|error| {
            if error
                .as_service_error()
                .is_some_and(|error| error.is_conditional_check_failed_exception())
            {
                Error::ConditionalCheckFailed
            } else {
                error.into()
            }
        })?;
        let attributes = output
            .attributes
            .ok_or(Error::UnexpectedResponse("update returned no attributes"))?;
        Ok(from_item(attributes)?)
    }
}

impl<K, T: Serialize + DeserializeOwned> Model<K, T> {
    fn before_create(&self, item: T) -> Result<(Value, T)> {
        let document = serde_json::to_value(item)?;
        let document = Self::validate(self.config.schema.as_deref(), document)?;
        let item: T = serde::Deserialize::deserialize(&document)?;
        Ok((document, item))
    }

    fn query_input(&self, params: QueryParams) -> Result<read::query::Query<Value>> {
        let index = params.index.as_deref();
        let partition_key = key_value(self.hash_key(index)?, Some(params.hash_key))?;
        let sort_key_condition = match params.range_key {
            Some(condition) => Some(common::condition::KeyCondition {
                condition,
                name: self.range_key(index)?.name.clone(),
            }),
            None => None,
        };
        Ok(read::query::Query {
            multiple_read_args: read::common::MultipleReadArgs {
                filter: (!params.filter.is_empty()).then_some(params.filter),
                consistent_read: params.consistent_read,
                exclusive_start_key: params.start_key,
                index_name: params.index,
                limit: params.limit,
                select: params.select,
                selection: params.attributes.map(common::selection::Selection::from),
                table_name: self.table_name(),
            },
            partition_key,
            scan_index_forward: params.order.map(|order| order == Order::Asc),
            sort_key_condition,
        })
    }

    /// Writes `item`, replacing any item with the same key, and returns it as validated.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_model.model.put", skip_all, err)
    )]
    pub async fn put(&self, item: T) -> Result<T> {
        let (document, item) = self.before_create(item)?;
        let put_item = write::put_item::PutItem {
            item: document,
            write_args: write::common::WriteArgs {
                table_name: self.table_name(),
                ..Default::default()
            },
        };
        crate::event!(debug, request = ?put_item, "put item");
        put_item.send(&self.client).await?;
        Ok(item)
    }

    /// Writes `item` unless an item with the same key exists, and returns it as validated.
    ///
    /// An existing key fails with [`Error::ConditionalCheckFailed`].
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_model.model.create", skip_all, err)
    )]
    pub async fn create(&self, item: T) -> Result<T> {
        let (document, item) = self.before_create(item)?;
        let create_item = write::create_item::CreateItem {
            item: document,
            hash_key_name: self.config.hash_key.name.clone(),
            range_key_name: self
                .config
                .range_key
                .as_ref()
                .map(|range_key| range_key.name.clone()),
            write_args: write::common::WriteArgs {
                return_values: Some(types::ReturnValue::None),
                table_name: self.table_name(),
                ..Default::default()
            },
        };
        crate::event!(debug, request = ?create_item, "create item");
        create_item.send(&self.client).await.map_err(|error| {
            if error
                .as_service_error()
                .is_some_and(|error| error.is_conditional_check_failed_exception())
            {
                Error::ConditionalCheckFailed
            } else {
                error.into()
            }
        })?;
        Ok(item)
    }

    /// Reads one page of items of a partition.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_model.model.query", skip_all, err)
    )]
    pub async fn query(&self, params: QueryParams) -> Result<QueryResult<T>> {
        let query = self.query_input(params)?;
        crate::event!(debug, request = ?query, "query");
        let output = query.send(&self.client).await?;
        let items = output
            .items
            .map(|items| {
                items
                    .into_iter()
                    .map(from_item)
                    .collect::<serde_dynamo::Result<Vec<T>>>()
            })
            .transpose()?;
        let count = match usize::try_from(output.count) {
            Ok(count) if count > 0 => count,
            _ => items.as_ref().map_or(0, Vec::len),
        };
        let last_key = output.last_evaluated_key.map(from_item).transpose()?;
        Ok(QueryResult {
            count,
            items,
            last_key,
        })
    }
}
