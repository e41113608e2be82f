use serde::{Deserialize, Serialize};

use crate::model::phase::GamePhase;

/// What the dialogue collaborator says back. Emotion and delta bounds are
/// enforced by the response schema on the remote side, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterReply {
    pub text: String,
    pub emotion: String,
    #[serde(rename = "affectionChange")]
    pub affection_change: i32,
}

impl CharacterReply {
    pub fn new(text: impl Into<String>, emotion: impl Into<String>, affection_change: i32) -> Self {
        Self {
            text: text.into(),
            emotion: emotion.into(),
            affection_change,
        }
    }

    /// Neutral stand-in used when the dialogue call fails.
    pub fn fallback(phase: GamePhase) -> Self {
        Self::new("...", phase.fallback_emotion(), 0)
    }
}
