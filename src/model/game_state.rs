use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::achievement::Achievements;
use crate::model::message::History;
use crate::model::phase::GamePhase;
use crate::model::reply::CharacterReply;

pub const INITIAL_DAY: u32 = 1;
pub const INITIAL_AFFECTION: i32 = 30;
pub const OPENING_LINE: &str = "你好！你是新来的吗？";

/// Fetchable reference to a generated portrait (a URL for the hosted generator).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortraitRef(pub String);

impl fmt::Display for PortraitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The whole session state. Owned by the engine; everyone else sees clones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeState {
    pub day: u32,

    /// Not clamped. The obsessive phase routinely pushes it past 100.
    pub affection: i32,

    pub phase: GamePhase,
    pub history: History,
    pub achievements: Achievements,
    pub last_reply: Option<CharacterReply>,

    /// Line currently shown in the dialogue panel.
    pub displayed_line: String,

    /// Portrait currently shown, if any has resolved yet.
    pub portrait: Option<PortraitRef>,
}

impl Default for NarrativeState {
    fn default() -> Self {
        Self {
            day: INITIAL_DAY,
            affection: INITIAL_AFFECTION,
            phase: GamePhase::Normal,
            history: History::new(),
            achievements: Achievements::default(),
            last_reply: None,
            displayed_line: OPENING_LINE.to_string(),
            portrait: None,
        }
    }
}
