//! Data access facades, one per feature area.
//!
//! Every operation follows the same shape: take the in-flight token for the
//! operation, raise `loading`, authenticate, resolve the owning student row,
//! run the scoped query, then fold the outcome into the facade's state. Any
//! failure ends up as a message in `error`; `loading` drops on every path.

use std::{future::Future, sync::Mutex};

use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::core::{
    error::{AppError, ErrorKind},
    inflight::{operation_key, InFlight},
};

pub mod essay_idea;
pub mod outreach;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Status {
    pub loading: bool,
    pub error: Option<String>,
    pub error_kind: Option<ErrorKind>,
}

/// Shared plumbing of the facades: pool, session identity, in-flight guard
/// and the `loading`/`error` pair.
pub struct FacadeCore {
    db: PgPool,
    inflight: InFlight,
    user_id: Option<Uuid>,
    status: Mutex<Status>,
}

impl FacadeCore {
    pub fn new(db: PgPool, inflight: InFlight, user_id: Option<Uuid>) -> Self {
        Self {
            db,
            inflight,
            user_id,
            status: Mutex::new(Status::default()),
        }
    }

    pub fn db(&self) -> &PgPool {
        &self.db
    }

    /// The session's user id, or [`AppError::Unauthenticated`].
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        self.user_id.ok_or(AppError::Unauthenticated)
    }

    pub fn status(&self) -> Status {
        self.status.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn loading(&self) -> bool {
        self.status().loading
    }

    pub fn error(&self) -> Option<String> {
        self.status().error
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.status().error_kind
    }

    /// Drive one operation. A call made while the same operation is still
    /// running for this user is refused without touching `loading`.
    pub async fn run<T, Fut>(&self, operation: &str, fut: Fut) -> Result<T, String>
    where
        Fut: Future<Output = Result<T, AppError>>,
    {
        let key = operation_key(operation, self.user_id.as_ref());
        let Some(_token) = self.inflight.try_acquire(&key) else {
            return Err(self.record_failure(operation, AppError::InFlight(operation.to_string())));
        };

        self.set_loading(true);
        let res = {
            let _loading = LoadingGuard(self);
            fut.await
        };

        match res {
            Ok(val) => {
                self.with_status(|status| {
                    status.error = None;
                    status.error_kind = None;
                });
                Ok(val)
            }
            Err(err) => Err(self.record_failure(operation, err)),
        }
    }

    fn set_loading(&self, loading: bool) {
        self.with_status(|status| status.loading = loading);
    }

    fn record_failure(&self, operation: &str, err: AppError) -> String {
        warn!("{} failed: {}", operation, err);
        let message = err.to_string();
        let kind = err.kind();
        self.with_status(|status| {
            status.error = Some(message.clone());
            status.error_kind = Some(kind);
        });
        message
    }

    fn with_status<F: FnOnce(&mut Status)>(&self, f: F) {
        let mut status = self.status.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut status);
    }
}

/// Lowers `loading` when dropped, including when the running call is
/// cancelled before its future completes.
struct LoadingGuard<'a>(&'a FacadeCore);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.set_loading(false);
    }
}
