use serde::{Deserialize, Serialize};

use crate::model::game_state::PortraitRef;
use crate::model::message::Speaker;
use crate::model::phase::GamePhase;

/// One observable effect of a transition, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StateChange {
    DayAdvanced { day: u32 },
    AffectionChanged { from: i32, to: i32 },
    PhaseChanged { from: GamePhase, to: GamePhase },
    AchievementUnlocked { id: String },
    PortraitChanged { phase: GamePhase, emotion: String, portrait: PortraitRef },
    /// The image call failed; the previous portrait stays up.
    PortraitUnavailable { phase: GamePhase, emotion: String },
    LineChanged { line: String },
    TurnRecorded { speaker: Speaker },
    /// The dialogue call failed and the neutral stand-in reply was used.
    DialogueFallback { reason: String },
}

impl StateChange {
    pub fn short_name(&self) -> &'static str {
        match self {
            StateChange::DayAdvanced { .. } => "DayAdvanced",
            StateChange::AffectionChanged { .. } => "AffectionChanged",
            StateChange::PhaseChanged { .. } => "PhaseChanged",
            StateChange::AchievementUnlocked { .. } => "AchievementUnlocked",
            StateChange::PortraitChanged { .. } => "PortraitChanged",
            StateChange::PortraitUnavailable { .. } => "PortraitUnavailable",
            StateChange::LineChanged { .. } => "LineChanged",
            StateChange::TurnRecorded { .. } => "TurnRecorded",
            StateChange::DialogueFallback { .. } => "DialogueFallback",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionReport {
    pub changes: Vec<StateChange>,
}

impl TransitionReport {
    pub fn push(&mut self, change: StateChange) {
        self.changes.push(change);
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn unlocked(&self) -> impl Iterator<Item = &str> {
        self.changes.iter().filter_map(|c| match c {
            StateChange::AchievementUnlocked { id } => Some(id.as_str()),
            _ => None,
        })
    }

    pub fn phase_change(&self) -> Option<(GamePhase, GamePhase)> {
        self.changes.iter().find_map(|c| match c {
            StateChange::PhaseChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
    }

    pub fn used_fallback(&self) -> bool {
        self.changes
            .iter()
            .any(|c| matches!(c, StateChange::DialogueFallback { .. }))
    }
}
