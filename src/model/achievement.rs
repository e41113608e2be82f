use serde::{Deserialize, Serialize};

pub const FIRST_MEET: &str = "first_meet";
pub const BEST_FRIEND: &str = "best_friend";
pub const SHIFT: &str = "shift";
pub const REDEEMER: &str = "redeemer";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub unlocked: bool,
}

impl Achievement {
    fn locked(id: &str, name: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            unlocked: false,
        }
    }
}

/// Result of an unlock attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockOutcome {
    Unlocked,
    AlreadyUnlocked,
    Unknown,
}

/// Achievement set in catalog order. Flags only ever go from locked to unlocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Achievements {
    entries: Vec<Achievement>,
}

impl Default for Achievements {
    fn default() -> Self {
        Self {
            entries: vec![
                Achievement::locked(FIRST_MEET, "初次相遇", "第一次遇见Sakura。"),
                Achievement::locked(BEST_FRIEND, "亲密无间", "好感度达到70。"),
                Achievement::locked(SHIFT, "崩坏之日", "存活到了第50天。"),
                Achievement::locked(REDEEMER, "真爱救赎", "成功净化了她的灵魂。"),
            ],
        }
    }
}

impl Achievements {
    pub fn unlock(&mut self, id: &str) -> UnlockOutcome {
        match self.entries.iter_mut().find(|a| a.id == id) {
            None => UnlockOutcome::Unknown,
            Some(a) if a.unlocked => UnlockOutcome::AlreadyUnlocked,
            Some(a) => {
                a.unlocked = true;
                UnlockOutcome::Unlocked
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Achievement> {
        self.entries.iter().find(|a| a.id == id)
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.get(id).map(|a| a.unlocked).unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Achievement> {
        self.entries.iter()
    }

    pub fn unlocked_count(&self) -> usize {
        self.entries.iter().filter(|a| a.unlocked).count()
    }
}
