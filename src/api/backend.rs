//! Transport seam for the engagement platform

use std::future::Future;
use std::pin::Pin;

use super::types::{SessionUpdateAck, SessionUpdateRequest, SyncResponse};
use crate::error::Result;

/// Single-threaded future; implementations clone what they need into it
pub type BackendFuture<T> = Pin<Box<dyn Future<Output = Result<T>>>>;

pub trait GameBackend {
    /// `GET /api/games/sync/{customerId}`
    fn fetch_sync(&self, customer_id: &str) -> BackendFuture<SyncResponse>;

    /// `POST /api/games/sessions`
    fn update_session(&self, request: SessionUpdateRequest) -> BackendFuture<SessionUpdateAck>;
}
