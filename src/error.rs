//! Error taxonomy shared by the simulation and the sync protocol
//!
//! None of these abort the frame loop: the shell logs them and reschedules.

use thiserror::Error;

use crate::sim::RunPhase;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// Sync payload is missing a required field (or carries a non-positive one)
    #[error("game configuration incomplete: missing or invalid `{field}`")]
    ConfigIncomplete { field: &'static str },
    /// Transport error or non-success HTTP status
    #[error("network failure: {0}")]
    NetworkFailure(String),
    /// Payload could not be parsed
    #[error("could not decode payload: {0}")]
    Decode(String),
    /// Start requested before any configuration was applied
    #[error("game parameters not loaded yet")]
    NotReady,
    #[error("no resumable session available")]
    NoResumableSession,
    #[error("no revival available")]
    RevivalUnavailable,
    #[error("cannot {action} while {phase:?}")]
    WrongPhase {
        action: &'static str,
        phase: RunPhase,
    },
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        GameError::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_problem() {
        let err = GameError::ConfigIncomplete {
            field: "vertical_pipe_gap",
        };
        assert!(err.to_string().contains("vertical_pipe_gap"));

        let err = GameError::WrongPhase {
            action: "revive",
            phase: RunPhase::Running,
        };
        assert_eq!(err.to_string(), "cannot revive while Running");
    }

    #[test]
    fn test_json_errors_become_decode() {
        let err: GameError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, GameError::Decode(_)));
    }
}
