//! Client configuration
//!
//! Persisted in LocalStorage. Missing fields take their defaults, so older
//! saved blobs keep loading.

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_REVIVE_POOL;
use crate::error::Result;

/// How revive availability is decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RevivePolicy {
    /// A per-session pool of credits; each revive spends one and each coupon adds one
    LocalPool { initial: u32 },
    /// Available whenever the backend lists an unlocked revival reason
    RemoteReasons,
}

impl Default for RevivePolicy {
    fn default() -> Self {
        RevivePolicy::LocalPool {
            initial: DEFAULT_REVIVE_POOL,
        }
    }
}

impl RevivePolicy {
    /// Credits a fresh session starts with
    pub fn initial_credits(&self) -> u32 {
        match self {
            RevivePolicy::LocalPool { initial } => *initial,
            RevivePolicy::RemoteReasons => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RevivePolicy::LocalPool { .. } => "local pool",
            RevivePolicy::RemoteReasons => "remote reasons",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Engagement platform root, without trailing slash
    pub base_url: String,
    pub customer_id: String,
    /// Template name selected from the sync payload
    pub game_template: String,
    /// Play on the built-in configuration when the sync fails
    pub allow_fallback_config: bool,
    pub revive_policy: RevivePolicy,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "https://arcadex-platform.loca.lt/user-engagement-platform".to_string(),
            customer_id: "shivam".to_string(),
            game_template: "FLAPPY_BIRD".to_string(),
            allow_fallback_config: true,
            revive_policy: RevivePolicy::default(),
        }
    }
}

impl ClientSettings {
    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "flappy_rewards_settings";

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(err) => log::warn!("Ignoring stored settings: {err}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native: read `FLAPPY_REWARDS_SETTINGS` as JSON if set
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        match std::env::var("FLAPPY_REWARDS_SETTINGS") {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from FLAPPY_REWARDS_SETTINGS");
                    settings
                }
                Err(err) => {
                    log::warn!("Ignoring FLAPPY_REWARDS_SETTINGS: {err}");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
