pub mod businesses;
pub mod presence;
pub mod users;

use std::future::Future;
use std::time::Duration;

use limacentro_core::error::CoreError;

use crate::error::{AppError, AppResult};

/// Run a database operation under the configured per-operation timeout.
///
/// A pool that cannot produce a connection in time surfaces as a transient
/// 503 rather than holding the request until the outer request timeout.
pub(crate) async fn with_db_timeout<T, F>(db_timeout_secs: u64, fut: F) -> AppResult<T>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(Duration::from_secs(db_timeout_secs), fut).await {
        Ok(result) => result.map_err(AppError::Database),
        Err(_) => Err(AppError::Core(CoreError::Transient(
            "database operation timed out".into(),
        ))),
    }
}
