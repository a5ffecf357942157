//! Externally supplied tunables and session grants
//!
//! Parameters are replaced wholesale by a sync and never mutated mid-tick.
//! A payload missing any tunable or the coupon target is rejected and the
//! store keeps whatever it had before.

use serde::{Deserialize, Serialize};

use crate::consts::{BIRD_SPEED_DIVISOR, MAX_PIPE_SPEED, SPEED_INCREASE_PER_POINT};
use crate::error::{GameError, Result};

/// Counters of an interrupted session the backend allows to resume
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSession {
    #[serde(default)]
    pub score: Option<u32>,
    #[serde(default)]
    pub coins: Option<u32>,
    #[serde(default)]
    pub coupons: Option<u32>,
    #[serde(default)]
    pub revive_count: Option<u32>,
}

/// Revival methods granted (or withheld) by the backend
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevivalReasons {
    pub unlocked: Vec<String>,
    pub locked: Vec<String>,
}

/// Sync payload as seen by the simulation, before validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoteConfig {
    pub game_instance_id: Option<String>,
    pub bird_speed: Option<f32>,
    pub coin_distance: Option<f32>,
    pub coupon_distance: Option<f32>,
    pub vertical_pipe_gap: Option<f32>,
    pub horizontal_pipe_gap: Option<f32>,
    pub coins_to_win: Option<u32>,
    pub coupons_to_win: Option<u32>,
    pub session_id: Option<String>,
    pub active_session: Option<SavedSession>,
    pub can_resume: bool,
    pub revival: RevivalReasons,
}

/// Validated tunables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionParameters {
    /// Raw `bird_speed`; divided down into pixels per tick
    pub bird_speed: f32,
    pub vertical_gap: f32,
    pub horizontal_spacing: f32,
    pub coin_spacing: f32,
    pub coupon_spacing: f32,
    pub coupons_to_win: u32,
    /// Informational; the run is won on coupons only
    pub coins_to_win: Option<u32>,
}

impl SessionParameters {
    /// Validate a payload. Fails on the first missing field.
    pub fn from_remote(config: &RemoteConfig) -> Result<Self> {
        Ok(Self {
            bird_speed: required(config.bird_speed, "bird_speed")?,
            vertical_gap: required(config.vertical_pipe_gap, "vertical_pipe_gap")?,
            horizontal_spacing: required(config.horizontal_pipe_gap, "horizontal_pipe_gap")?,
            coin_spacing: required(config.coin_distance, "coin_distance")?,
            coupon_spacing: required(config.coupon_distance, "coupon_distance")?,
            coupons_to_win: match config.coupons_to_win {
                Some(n) if n > 0 => n,
                _ => {
                    return Err(GameError::ConfigIncomplete {
                        field: "winningCriteria.coupons",
                    });
                }
            },
            coins_to_win: config.coins_to_win,
        })
    }

    /// Scroll speed at score 0
    pub fn base_speed(&self) -> f32 {
        self.bird_speed / BIRD_SPEED_DIVISOR
    }

    /// Nondecreasing in `score`, never above `MAX_PIPE_SPEED`
    pub fn current_speed(&self, score: u32) -> f32 {
        (self.base_speed() + score as f32 * SPEED_INCREASE_PER_POINT).min(MAX_PIPE_SPEED)
    }
}

fn required(value: Option<f32>, field: &'static str) -> Result<f32> {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(GameError::ConfigIncomplete { field }),
    }
}

/// Per-session data granted alongside the parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionGrant {
    pub game_instance_id: Option<String>,
    pub session_id: Option<String>,
    pub active_session: Option<SavedSession>,
    pub can_resume: bool,
    pub revival: RevivalReasons,
}

impl SessionGrant {
    /// Saved counters, if the backend permits resuming them
    pub fn resumable(&self) -> Option<&SavedSession> {
        if self.can_resume {
            self.active_session.as_ref()
        } else {
            None
        }
    }
}

/// Holds the last good configuration
#[derive(Debug, Clone, Default)]
pub struct ParameterStore {
    params: Option<SessionParameters>,
    grant: SessionGrant,
    /// Number of accepted syncs
    revision: u32,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace parameters and grant atomically, or leave both untouched
    pub fn apply_remote_config(&mut self, config: &RemoteConfig) -> Result<()> {
        let params = SessionParameters::from_remote(config)?;
        self.params = Some(params);
        self.grant = SessionGrant {
            game_instance_id: config.game_instance_id.clone(),
            session_id: config.session_id.clone(),
            active_session: config.active_session.clone(),
            can_resume: config.can_resume,
            revival: config.revival.clone(),
        };
        self.revision += 1;
        Ok(())
    }

    /// Parameters loaded; starting a run is allowed
    pub fn is_ready(&self) -> bool {
        self.params.is_some()
    }

    pub fn parameters(&self) -> Option<&SessionParameters> {
        self.params.as_ref()
    }

    pub fn grant(&self) -> &SessionGrant {
        &self.grant
    }

    pub fn revision(&self) -> u32 {
        self.revision
    }

    pub fn current_speed(&self, score: u32) -> Option<f32> {
        self.params.map(|p| p.current_speed(score))
    }

    pub fn coupons_to_win(&self) -> Option<u32> {
        self.params.map(|p| p.coupons_to_win)
    }
}
