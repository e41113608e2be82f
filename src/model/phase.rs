use serde::{Deserialize, Serialize};
use std::fmt;

/// Emotions the character may show while in a friendly phase.
pub const NORMAL_EMOTIONS: [&str; 6] = ["happy", "shy", "neutral", "sad", "surprised", "angry"];

/// Emotions the character may show while obsessive.
pub const OBSESSIVE_EMOTIONS: [&str; 5] =
    ["creepy_smile", "staring", "crazy", "crying_blood", "knife_hold"];

/// Narrative mode. Gates the persona prompt, the portrait style and which
/// thresholds apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    #[default]
    Normal,
    Obsessive,
    Redeemed,
    /// Reserved. Nothing transitions here.
    BadEnd,
}

impl GamePhase {
    /// Emotion used when the dialogue collaborator gives us nothing usable.
    pub fn fallback_emotion(self) -> &'static str {
        match self {
            GamePhase::Obsessive => "staring",
            _ => "neutral",
        }
    }

    /// The emotion vocabulary the persona prompt asks the model to pick from.
    pub fn emotion_vocabulary(self) -> &'static [&'static str] {
        match self {
            GamePhase::Obsessive => &OBSESSIVE_EMOTIONS,
            _ => &NORMAL_EMOTIONS,
        }
    }

    /// Whether the obsessive persona prompt is used for dialogue.
    pub fn uses_obsessive_persona(self) -> bool {
        self == GamePhase::Obsessive
    }

    /// Whether portraits use the dark style template.
    pub fn uses_dark_portraits(self) -> bool {
        matches!(self, GamePhase::Obsessive | GamePhase::BadEnd)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GamePhase::Normal => "NORMAL",
            GamePhase::Obsessive => "OBSESSIVE",
            GamePhase::Redeemed => "REDEEMED",
            GamePhase::BadEnd => "BAD_END",
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
