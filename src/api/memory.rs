//! In-process backend: serves a fixed sync payload and records sessions.
//! Drives the native demo and stands in for the network in tests.

use std::cell::RefCell;
use std::rc::Rc;

use super::backend::{BackendFuture, GameBackend};
use super::types::{SessionUpdateAck, SessionUpdateRequest, SyncResponse};
use crate::error::GameError;

#[derive(Debug, Default)]
struct MemoryState {
    response: SyncResponse,
    fail_sync: bool,
    fail_reports: bool,
    sync_calls: u32,
    sessions: Vec<SessionUpdateRequest>,
}

/// Cheap to clone; clones share state
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    inner: Rc<RefCell<MemoryState>>,
}

impl MemoryBackend {
    pub fn new(response: SyncResponse) -> Self {
        let backend = Self::default();
        backend.set_response(response);
        backend
    }

    /// Replace the payload served by the next sync
    pub fn set_response(&self, response: SyncResponse) {
        self.inner.borrow_mut().response = response;
    }

    pub fn set_fail_sync(&self, fail: bool) {
        self.inner.borrow_mut().fail_sync = fail;
    }

    pub fn set_fail_reports(&self, fail: bool) {
        self.inner.borrow_mut().fail_reports = fail;
    }

    pub fn sync_calls(&self) -> u32 {
        self.inner.borrow().sync_calls
    }

    /// Every session update received so far
    pub fn sessions(&self) -> Vec<SessionUpdateRequest> {
        self.inner.borrow().sessions.clone()
    }
}

impl GameBackend for MemoryBackend {
    fn fetch_sync(&self, customer_id: &str) -> BackendFuture<SyncResponse> {
        let inner = self.inner.clone();
        let customer_id = customer_id.to_string();
        Box::pin(async move {
            let mut state = inner.borrow_mut();
            state.sync_calls += 1;
            if state.fail_sync {
                return Err(GameError::NetworkFailure("HTTP error! status: 503".into()));
            }
            let mut response = state.response.clone();
            response.customer_id = Some(customer_id);
            Ok(response)
        })
    }

    fn update_session(&self, request: SessionUpdateRequest) -> BackendFuture<SessionUpdateAck> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let mut state = inner.borrow_mut();
            if state.fail_reports {
                return Err(GameError::NetworkFailure("HTTP error! status: 500".into()));
            }
            let ack = SessionUpdateAck {
                session_id: request.session_id.clone(),
                success: Some(true),
            };
            state.sessions.push(request);
            Ok(ack)
        })
    }
}
