use std::collections::HashMap;

use crate::model::game_state::PortraitRef;
use crate::model::phase::GamePhase;

/// Session-lifetime portrait cache keyed by the literal (phase, emotion) pair.
/// The keyspace is tiny, so nothing is ever evicted.
#[derive(Debug, Default)]
pub struct PortraitCache {
    entries: HashMap<(GamePhase, String), PortraitRef>,
}

impl PortraitCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, phase: GamePhase, emotion: &str) -> Option<&PortraitRef> {
        self.entries.get(&(phase, emotion.to_string()))
    }

    pub fn insert(&mut self, phase: GamePhase, emotion: &str, portrait: PortraitRef) {
        self.entries.insert((phase, emotion.to_string()), portrait);
    }
}
