use crate::error::{Error, Result};

use aws_sdk_dynamodb::types::TableStatus;
use std::{future::Future, time::Duration};

/// Default delay between two status checks.
pub const POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Polls `describe` until the table is no longer `CREATING`.
///
/// `describe` yields `None` when the table does not exist, which fails with
/// [`Error::TableNotFound`]. There is no cap on the number of polls.
pub async fn wait_for_creation<F, Fut>(
    table_name: &str,
    interval: Duration,
    mut describe: F,
) -> Result<TableStatus>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<TableStatus>>>,
{
    loop {
        match describe().await? {
            None => return Err(Error::TableNotFound(table_name.to_string())),
            Some(TableStatus::Creating) => tokio::time::sleep(interval).await,
            Some(status) => return Ok(status),
        }
    }
}

/// Polls `describe` until the table is no longer `DELETING`.
///
/// A missing table or a failed check both end the wait.
pub async fn wait_for_deletion<F, Fut>(interval: Duration, mut describe: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<TableStatus>>>,
{
    loop {
        match describe().await {
            Ok(Some(TableStatus::Deleting)) => tokio::time::sleep(interval).await,
            Ok(_) => return,
            Err(_error) => {
                crate::event!(debug, error = %_error, "status check failed, deletion assumed complete");
                return;
            }
        }
    }
}
