//! Single-flight guard for implicit portfolio creation.
//!
//! The builder needs a portfolio id before it can do anything, and a
//! client that mounts twice (or races two tabs) must not end up with
//! two portfolios. Concurrent `run` calls for the same user share a
//! single in-flight creation future and all observe its result.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::Mutex;

use folio_core::types::DbId;

use crate::error::AppError;

/// The result both the original caller and piggy-backing callers see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnsureOutcome {
    pub portfolio_id: DbId,
    pub page_id: DbId,
    pub is_new: bool,
}

type SharedEnsure = Shared<BoxFuture<'static, Result<EnsureOutcome, Arc<AppError>>>>;

/// Deduplicates concurrent ensure-portfolio calls per user.
#[derive(Default)]
pub struct EnsurePortfolio {
    inflight: Mutex<HashMap<DbId, SharedEnsure>>,
}

impl EnsurePortfolio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `make` unless an ensure for `user_id` is already in flight,
    /// in which case the existing future's result is awaited instead.
    pub async fn run<F, Fut>(&self, user_id: DbId, make: F) -> Result<EnsureOutcome, Arc<AppError>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<EnsureOutcome, AppError>> + Send + 'static,
    {
        let fut = {
            let mut inflight = self.inflight.lock().await;
            match inflight.get(&user_id) {
                Some(existing) => existing.clone(),
                None => {
                    let fut = make().map(|r| r.map_err(Arc::new)).boxed().shared();
                    inflight.insert(user_id, fut.clone());
                    fut
                }
            }
        };

        let result = fut.await;
        self.inflight.lock().await.remove(&user_id);
        result
    }
}

/// Recover an owned [`AppError`] from the shared error handle.
///
/// The last caller holding the `Arc` gets the original error back;
/// piggy-backing callers get its message with the HTTP-relevant
/// variants preserved.
pub fn unshare_error(err: Arc<AppError>) -> AppError {
    match Arc::try_unwrap(err) {
        Ok(owned) => owned,
        Err(shared) => match &*shared {
            AppError::Core(core) => AppError::Core(core.clone()),
            AppError::BadRequest(msg) => AppError::BadRequest(msg.clone()),
            other => AppError::InternalError(other.to_string()),
        },
    }
}
