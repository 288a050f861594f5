//! Per-call deadline for generation requests.

use std::future::Future;
use std::time::Duration;
use tourscribe_error::{TourError, TourErrorKind, TourscribeResult};

/// Await `call`, failing with [`TourErrorKind::Timeout`] once `limit` elapses.
///
/// No limit means wait as long as the backend takes.
pub(crate) async fn within<T, F>(limit: Option<Duration>, call: F) -> TourscribeResult<T>
where
    F: Future<Output = TourscribeResult<T>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
            TourError::new(TourErrorKind::Timeout {
                seconds: limit.as_secs(),
            })
        })?,
        None => call.await,
    }
}
