//! Wire format of the engagement platform API

use serde::{Deserialize, Serialize};

use super::OutcomeReport;
use crate::error::{GameError, Result};
use crate::sim::{RemoteConfig, RevivalReasons, SavedSession, Verdict};

/// Used when no sync has supplied an instance id
pub const DEFAULT_GAME_INSTANCE_ID: &str = "flappy-bird-default";

/// `GET /api/games/sync/{customerId}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub games: Vec<GameEntry>,
    #[serde(default)]
    pub sync_timestamp: Option<String>,
}

impl SyncResponse {
    /// First game built from the given template
    pub fn find_template(&self, template: &str) -> Option<&GameEntry> {
        self.games
            .iter()
            .find(|game| game.game_template_name.as_deref() == Some(template))
    }

    /// Configuration of the template's game, unvalidated
    pub fn config_for(&self, template: &str) -> Result<RemoteConfig> {
        self.find_template(template)
            .map(GameEntry::to_remote_config)
            .ok_or(GameError::ConfigIncomplete {
                field: "gameTemplateName",
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEntry {
    #[serde(default)]
    pub game_instance_id: Option<String>,
    #[serde(default)]
    pub game_instance_name: Option<String>,
    #[serde(default)]
    pub game_template_name: Option<String>,
    #[serde(default)]
    pub game_parameter_values: Option<GameParameterValues>,
    #[serde(default)]
    pub winning_criteria: Option<WinningCriteria>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub active_game_session: Option<SavedSession>,
    #[serde(default)]
    pub can_resume: bool,
    #[serde(default)]
    pub revival_reasons_unlocked: Vec<String>,
    #[serde(default)]
    pub revival_reasons_locked: Vec<String>,
}

impl GameEntry {
    pub fn to_remote_config(&self) -> RemoteConfig {
        let values = self.game_parameter_values.clone().unwrap_or_default();
        let criteria = self.winning_criteria.clone().unwrap_or_default();
        RemoteConfig {
            game_instance_id: self.game_instance_id.clone(),
            bird_speed: values.bird_speed,
            coin_distance: values.coin_distance,
            coupon_distance: values.coupon_distance,
            vertical_pipe_gap: values.vertical_pipe_gap,
            horizontal_pipe_gap: values.horizontal_pipe_gap,
            coins_to_win: criteria.coins,
            coupons_to_win: criteria.coupons,
            session_id: self.session_id.clone(),
            active_session: self.active_game_session.clone(),
            can_resume: self.can_resume,
            revival: RevivalReasons {
                unlocked: self.revival_reasons_unlocked.clone(),
                locked: self.revival_reasons_locked.clone(),
            },
        }
    }
}

/// Tunables exactly as the backend names them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameParameterValues {
    #[serde(default)]
    pub bird_speed: Option<f32>,
    #[serde(default)]
    pub coin_distance: Option<f32>,
    #[serde(default)]
    pub coupon_distance: Option<f32>,
    #[serde(default)]
    pub vertical_pipe_gap: Option<f32>,
    #[serde(default)]
    pub horizontal_pipe_gap: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WinningCriteria {
    #[serde(default)]
    pub coins: Option<u32>,
    #[serde(default)]
    pub coupons: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RewardType {
    Coins,
    Coupons,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    #[serde(rename = "type")]
    pub kind: RewardType,
    pub count: u32,
}

/// `POST /api/games/sessions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUpdateRequest {
    pub customer_id: String,
    pub game_instance_id: String,
    pub verdict: Verdict,
    pub rewards: Vec<Reward>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default)]
    pub revive_used: bool,
}

impl SessionUpdateRequest {
    pub fn from_report(customer_id: &str, report: &OutcomeReport) -> Self {
        Self {
            customer_id: customer_id.to_string(),
            game_instance_id: report
                .game_instance_id
                .clone()
                .unwrap_or_else(|| DEFAULT_GAME_INSTANCE_ID.to_string()),
            verdict: report.verdict,
            rewards: vec![
                Reward {
                    kind: RewardType::Coins,
                    count: report.coins,
                },
                Reward {
                    kind: RewardType::Coupons,
                    count: report.coupons,
                },
            ],
            session_id: report.session_id.clone(),
            revive_used: report.revive_used,
        }
    }
}

/// Session update acknowledgement; unknown fields are ignored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUpdateAck {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SYNC_JSON: &str = r#"{
        "customerId": "shivam",
        "games": [
            {
                "gameInstanceId": "other",
                "gameTemplateName": "SNAKE",
                "gameParameterValues": {}
            },
            {
                "gameInstanceId": "b3d66f06",
                "gameInstanceName": "MEDIUM",
                "gameTemplateId": "9204b6ec",
                "gameTemplateName": "FLAPPY_BIRD",
                "gameParameterValues": {
                    "bird_speed": 15,
                    "coin_distance": 250,
                    "coupon_distance": 500,
                    "vertical_pipe_gap": 250,
                    "horizontal_pipe_gap": 500
                },
                "winningCriteria": { "coins": 20, "coupons": 4 },
                "sessionId": "sess-9",
                "activeGameSession": { "coins": 7, "coupons": 1, "score": 3 },
                "canResume": true,
                "revivalReasonsUnlocked": ["WATCH_AD"],
                "revivalReasonsLocked": ["REFER_FRIEND"],
                "isActive": true
            }
        ],
        "syncTimestamp": "2025-07-12T06:29:43.810458"
    }"#;

    #[test]
    fn test_parse_sync_response() {
        let response: SyncResponse = serde_json::from_str(SYNC_JSON).unwrap();
        assert_eq!(response.games.len(), 2);

        let game = response.find_template("FLAPPY_BIRD").unwrap();
        let config = game.to_remote_config();
        assert_eq!(config.game_instance_id.as_deref(), Some("b3d66f06"));
        assert_eq!(config.bird_speed, Some(15.0));
        assert_eq!(config.horizontal_pipe_gap, Some(500.0));
        assert_eq!(config.coupons_to_win, Some(4));
        assert_eq!(config.session_id.as_deref(), Some("sess-9"));
        assert!(config.can_resume);
        assert_eq!(config.active_session.unwrap().coins, Some(7));
        assert_eq!(config.revival.unlocked, vec!["WATCH_AD".to_string()]);
        assert_eq!(config.revival.locked, vec!["REFER_FRIEND".to_string()]);
    }

    #[test]
    fn test_missing_template() {
        let response: SyncResponse = serde_json::from_str(r#"{"games": []}"#).unwrap();
        assert!(response.find_template("FLAPPY_BIRD").is_none());
    }

    #[test]
    fn test_sparse_entry_yields_incomplete_config() {
        let entry: GameEntry =
            serde_json::from_str(r#"{"gameTemplateName": "FLAPPY_BIRD"}"#).unwrap();
        let config = entry.to_remote_config();
        assert_eq!(config.bird_speed, None);
        assert_eq!(config.coupons_to_win, None);
        assert!(!config.can_resume);
    }

    #[test]
    fn test_session_update_body() {
        let report = OutcomeReport {
            verdict: Verdict::Won,
            score: 12,
            coins: 9,
            coupons: 4,
            revive_used: true,
            game_instance_id: None,
            session_id: None,
        };
        let request = SessionUpdateRequest::from_report("shivam", &report);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["customerId"], "shivam");
        assert_eq!(json["gameInstanceId"], DEFAULT_GAME_INSTANCE_ID);
        assert_eq!(json["verdict"], "WON");
        assert_eq!(json["rewards"][0]["type"], "COINS");
        assert_eq!(json["rewards"][0]["count"], 9);
        assert_eq!(json["rewards"][1]["type"], "COUPONS");
        assert_eq!(json["rewards"][1]["count"], 4);
        assert_eq!(json["reviveUsed"], true);
        assert!(json.get("sessionId").is_none());
    }
}
