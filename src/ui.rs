//! HUD model
//!
//! Everything the page shows besides the canvas, derived from the controller
//! each frame. Kept free of DOM calls so it can be tested natively.

use crate::api::{ConnectionStatus, SyncService};
use crate::session::SessionController;
use crate::settings::RevivePolicy;
use crate::sim::{EndCause, RevivalReasons, RunPhase};

/// Text and button state for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct HudSnapshot {
    pub coin_text: String,
    pub cash_text: String,
    pub coupon_text: String,
    pub status_text: &'static str,
    pub start_label: &'static str,
    pub start_enabled: bool,
    /// Start/resume panel
    pub start_info_visible: bool,
    pub game_over_visible: bool,
    pub revive: ReviveButton,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviveButton {
    pub visible: bool,
    pub enabled: bool,
    pub label: &'static str,
}

impl HudSnapshot {
    pub fn from_controller<S: SyncService>(ctl: &SessionController<S>) -> Self {
        let session = &ctl.state().session;
        let phase = session.phase;
        let ready = ctl.is_ready();
        let enabled = ctl.can_revive();

        Self {
            coin_text: session.coins.to_string(),
            cash_text: cash_text(session.coins),
            coupon_text: coupon_text(session.coupons, ctl.store().coupons_to_win()),
            status_text: status_text(ctl.status()),
            start_label: start_label(ready, ctl.can_resume()),
            start_enabled: ready,
            start_info_visible: phase == RunPhase::Idle,
            game_over_visible: matches!(phase, RunPhase::Ended(_)),
            revive: ReviveButton {
                visible: !phase.is_running(),
                enabled,
                label: if enabled { "Revive" } else { "Revive (Locked)" },
            },
        }
    }
}

/// Ten coins make one rupee
pub fn cash_text(coins: u32) -> String {
    format!("₹{:.1}", coins as f32 / 10.0)
}

pub fn coupon_text(coupons: u32, target: Option<u32>) -> String {
    match target {
        Some(target) => format!("{coupons}/{target}"),
        None => format!("{coupons}/?"),
    }
}

pub fn status_text(status: ConnectionStatus) -> &'static str {
    match status {
        ConnectionStatus::Connecting => "Loading...",
        ConnectionStatus::Online => "Ready",
        ConnectionStatus::Fallback => "Ready (offline)",
        ConnectionStatus::Offline => "Failed",
    }
}

pub fn start_label(ready: bool, can_resume: bool) -> &'static str {
    match (ready, can_resume) {
        (false, _) => "Loading...",
        (true, true) => "Resume Game",
        (true, false) => "Start Game",
    }
}

/// Shown when the player presses a locked revive button
pub fn locked_revival_message(reasons: &RevivalReasons) -> String {
    let mut message = String::from("Revival is currently locked.\n\n");
    if !reasons.unlocked.is_empty() {
        message.push_str("Available revival methods:\n");
        message.push_str(&reasons.unlocked.join(", "));
        message.push_str("\n\n");
    }
    if reasons.locked.is_empty() {
        message.push_str("No revival methods available at this time.");
    } else {
        message.push_str("Locked revival methods:\n");
        message.push_str(&reasons.locked.join(", "));
        message.push_str("\n\nComplete required actions to unlock these revival methods.");
    }
    message
}

/// Shown when revive is pressed without a credit
pub fn revive_blocked_message(policy: RevivePolicy, reasons: &RevivalReasons) -> String {
    match policy {
        RevivePolicy::LocalPool { .. } => "No revives left for this session.".to_string(),
        RevivePolicy::RemoteReasons => locked_revival_message(reasons),
    }
}

/// Alert text for a finished run, if any
pub fn end_message(cause: EndCause, coupons_to_win: Option<u32>) -> Option<String> {
    match cause {
        EndCause::Won => Some(format!(
            "Congratulations! You collected {} coupons and won the game!",
            coupons_to_win.unwrap_or_default()
        )),
        EndCause::Crashed | EndCause::Fell => None,
    }
}
