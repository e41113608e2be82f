use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::phase::GamePhase;

const IDLE_NORMAL: [&str; 5] = ["哼着歌...", "看窗外", "整理书包", "发呆中...", "想心事"];
const IDLE_HORROR: [&str; 5] = ["盯着你...", "磨刀...", "在那边...", "嘿嘿嘿...", "别想跑"];

/// Horror dressing is reserved for the obsessive phase itself.
pub fn is_horror(phase: GamePhase) -> bool {
    phase == GamePhase::Obsessive
}

pub fn location_title(phase: GamePhase) -> &'static str {
    if is_horror(phase) {
        "??? 教室"
    } else {
        "二年级 B 班"
    }
}

pub fn bgm_label(phase: GamePhase) -> &'static str {
    if is_horror(phase) {
        "BGM: 破碎的灵魂"
    } else {
        "BGM: 校园日常"
    }
}

/// What the character is doing while the player looks at the map.
pub fn idle_status<R: Rng + ?Sized>(phase: GamePhase, rng: &mut R) -> &'static str {
    let pool: &[&'static str] = if is_horror(phase) {
        &IDLE_HORROR
    } else {
        &IDLE_NORMAL
    };
    pool.choose(rng).copied().unwrap_or("发呆中...")
}

/// Affection bar fill, 0..=100. The score itself is never clamped.
pub fn affection_bar(affection: i32, width: usize) -> String {
    let pct = affection.clamp(0, 100) as usize;
    let filled = pct * width / 100;
    format!("[{}{}] {}%", "#".repeat(filled), "-".repeat(width - filled), affection)
}
