//! Sync client: fetch, template selection, fallback and reporting

use std::rc::Rc;

use super::backend::GameBackend;
use super::fallback::fallback_response;
use super::types::SessionUpdateRequest;
use super::{ConfigSource, OutcomeReport, SyncEvent, SyncInbox, SyncService, spawn_local};
use crate::error::Result;
use crate::settings::ClientSettings;
use crate::sim::{RemoteConfig, SessionParameters};

/// Talks to a `GameBackend` on behalf of the session controller
pub struct ApiClient<B> {
    backend: Rc<B>,
    settings: Rc<ClientSettings>,
}

impl<B> Clone for ApiClient<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            settings: self.settings.clone(),
        }
    }
}

impl<B: GameBackend> ApiClient<B> {
    pub fn new(backend: B, settings: ClientSettings) -> Self {
        Self {
            backend: Rc::new(backend),
            settings: Rc::new(settings),
        }
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Fetch and validate the live configuration, substituting the built-in
    /// one on failure when allowed
    pub async fn sync(&self) -> SyncEvent {
        match self.fetch_live().await {
            Ok(config) => {
                log::info!(
                    "Synced game parameters (instance {})",
                    config.game_instance_id.as_deref().unwrap_or("?")
                );
                SyncEvent::Config {
                    config,
                    source: ConfigSource::Live,
                }
            }
            Err(err) if self.settings.allow_fallback_config => {
                log::warn!("Sync failed ({err}), using built-in configuration");
                match self.load_fallback() {
                    Ok(config) => SyncEvent::Config {
                        config,
                        source: ConfigSource::Fallback,
                    },
                    Err(err) => SyncEvent::SyncFailed(err),
                }
            }
            Err(err) => {
                log::error!("Sync failed: {err}");
                SyncEvent::SyncFailed(err)
            }
        }
    }

    /// Post a finished run, then resync so new grants reach the store.
    /// Returns the events in the order they must be applied.
    pub async fn submit(&self, report: OutcomeReport) -> Vec<SyncEvent> {
        let request = SessionUpdateRequest::from_report(&self.settings.customer_id, &report);
        log::info!(
            "Updating game session: {:?}, {} coins, {} coupons",
            request.verdict,
            report.coins,
            report.coupons
        );

        match self.backend.update_session(request).await {
            Ok(_ack) => {
                log::info!("Game session updated");
                vec![SyncEvent::Reported, self.sync().await]
            }
            Err(err) => {
                log::error!("Failed to update game session: {err}");
                vec![SyncEvent::ReportFailed(err)]
            }
        }
    }

    async fn fetch_live(&self) -> Result<RemoteConfig> {
        let response = self.backend.fetch_sync(&self.settings.customer_id).await?;
        let config = response.config_for(&self.settings.game_template)?;
        // Reject incomplete payloads here so the fallback can take over
        SessionParameters::from_remote(&config)?;
        Ok(config)
    }

    fn load_fallback(&self) -> Result<RemoteConfig> {
        fallback_response()?.config_for(&self.settings.game_template)
    }
}

impl<B: GameBackend + 'static> SyncService for ApiClient<B> {
    fn request_sync(&self, inbox: SyncInbox) {
        let client = self.clone();
        spawn_local(async move {
            inbox.push(client.sync().await);
        });
    }

    fn report_outcome(&self, report: OutcomeReport, inbox: SyncInbox) {
        let client = self.clone();
        spawn_local(async move {
            for event in client.submit(report).await {
                inbox.push(event);
            }
        });
    }
}
