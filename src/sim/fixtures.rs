//! Shared test fixtures

use super::params::{RemoteConfig, SessionParameters};

/// The "MEDIUM" instance the backend serves by default
pub(crate) fn medium_config() -> RemoteConfig {
    RemoteConfig {
        game_instance_id: Some("instance-1".to_string()),
        bird_speed: Some(15.0),
        coin_distance: Some(250.0),
        coupon_distance: Some(500.0),
        vertical_pipe_gap: Some(250.0),
        horizontal_pipe_gap: Some(500.0),
        coins_to_win: Some(10),
        coupons_to_win: Some(4),
        ..Default::default()
    }
}

pub(crate) fn medium_params() -> SessionParameters {
    SessionParameters::from_remote(&medium_config()).expect("fixture is complete")
}
