//! Parameter sync and session reporting
//!
//! Network calls never touch game state directly. Their results are queued
//! as `SyncEvent`s in a `SyncInbox`, and the session controller drains the
//! inbox between ticks.

pub mod backend;
pub mod client;
pub mod fallback;
#[cfg(target_arch = "wasm32")]
pub mod http;
pub mod memory;
pub mod types;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::future::Future;
use std::rc::Rc;

use crate::error::GameError;
use crate::sim::{RemoteConfig, Verdict};

pub use backend::{BackendFuture, GameBackend};
pub use client::ApiClient;
#[cfg(target_arch = "wasm32")]
pub use http::HttpBackend;
pub use memory::MemoryBackend;
pub use types::{GameEntry, SessionUpdateAck, SessionUpdateRequest, SyncResponse};

/// Where the applied configuration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Live,
    Fallback,
}

/// Backend reachability as shown to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// Sync in flight, nothing applied yet
    Connecting,
    Online,
    /// Running on the built-in configuration
    Fallback,
    Offline,
}

/// Completion of a network call
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    Config {
        config: RemoteConfig,
        source: ConfigSource,
    },
    SyncFailed(GameError),
    Reported,
    ReportFailed(GameError),
}

/// Outcome of a finished run, handed to the sync service
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeReport {
    pub verdict: Verdict,
    pub score: u32,
    pub coins: u32,
    pub coupons: u32,
    pub revive_used: bool,
    pub game_instance_id: Option<String>,
    pub session_id: Option<String>,
}

/// Queue shared between network completions and the tick loop
#[derive(Debug, Clone, Default)]
pub struct SyncInbox {
    events: Rc<RefCell<VecDeque<SyncEvent>>>,
}

impl SyncInbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: SyncEvent) {
        self.events.borrow_mut().push_back(event);
    }

    /// Take everything queued so far, oldest first
    pub fn drain(&self) -> Vec<SyncEvent> {
        self.events.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

/// The session controller's view of the network collaborator.
/// Both calls return immediately; completions land in `inbox`.
pub trait SyncService {
    fn request_sync(&self, inbox: SyncInbox);
    fn report_outcome(&self, report: OutcomeReport, inbox: SyncInbox);
}

/// Run a network task without blocking the frame loop (browser) or to
/// completion (native, where backends answer immediately)
pub(crate) fn spawn_local<F>(task: F)
where
    F: Future<Output = ()> + 'static,
{
    #[cfg(target_arch = "wasm32")]
    wasm_bindgen_futures::spawn_local(task);

    #[cfg(not(target_arch = "wasm32"))]
    pollster::block_on(task);
}
