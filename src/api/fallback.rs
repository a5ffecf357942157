//! Built-in configuration used when the live sync fails
//! (only if `allow_fallback_config` is set)

use super::types::SyncResponse;
use crate::error::Result;

const FALLBACK_SYNC_JSON: &str = r#"{
    "customerId": "shivam",
    "games": [{
        "gameInstanceId": "b3d66f06-6d47-4896-8bfc-2706686b3dd0",
        "gameInstanceName": "MEDIUM",
        "gameInstanceDescription": "medium settings",
        "gameTemplateId": "9204b6ec-16f4-46d6-a735-6805fb6e6c1e",
        "gameTemplateName": "FLAPPY_BIRD",
        "gameParameterValues": {
            "bird_speed": 15,
            "coin_distance": 250,
            "coupon_distance": 500,
            "vertical_pipe_gap": 250,
            "horizontal_pipe_gap": 500
        },
        "winningCriteria": { "coins": 0, "coupons": 4 },
        "isActive": true,
        "activeGameSession": null,
        "canResume": false,
        "revivalReasonsUnlocked": [],
        "revivalReasonsLocked": []
    }],
    "syncTimestamp": "2025-07-12T06:29:43.810458"
}"#;

pub fn fallback_response() -> Result<SyncResponse> {
    Ok(serde_json::from_str(FALLBACK_SYNC_JSON)?)
}
