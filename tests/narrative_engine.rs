/// Narrative engine behaviour driven through fake collaborators.
mod common;

use common::{ctx, CountingImages, ScriptedDialogue};
use yandere_shift::engine::error::EngineError;
use yandere_shift::engine::narrative::{
    NarrativeEngine, DAY_PASSED_LINE, REDEMPTION_LINE, SHIFT_LINE,
};
use yandere_shift::model::achievement::{BEST_FRIEND, FIRST_MEET, REDEEMER, SHIFT};
use yandere_shift::model::event_result::StateChange;
use yandere_shift::model::game_state::{NarrativeState, PortraitRef};
use yandere_shift::model::message::{HISTORY_LIMIT, Turn};
use yandere_shift::model::phase::GamePhase;
use yandere_shift::model::reply::CharacterReply;

fn engine() -> (NarrativeEngine, ScriptedDialogue, CountingImages) {
    let dialogue = ScriptedDialogue::new();
    let images = CountingImages::new();
    let engine = NarrativeEngine::new(dialogue.clone(), images.clone());
    (engine, dialogue, images)
}

fn obsessive_engine(affection: i32) -> (NarrativeEngine, ScriptedDialogue, CountingImages) {
    let dialogue = ScriptedDialogue::new();
    let images = CountingImages::new();
    let state = NarrativeState {
        day: 60,
        affection,
        phase: GamePhase::Obsessive,
        ..NarrativeState::default()
    };
    let engine = NarrativeEngine::with_state(state, dialogue.clone(), images.clone());
    (engine, dialogue, images)
}

#[test]
fn session_starts_with_fixed_values() {
    let (engine, _, _) = engine();
    let state = engine.state();

    assert_eq!(state.day, 1);
    assert_eq!(state.affection, 30);
    assert_eq!(state.phase, GamePhase::Normal);
    assert!(state.history.is_empty());
    assert_eq!(state.achievements.unlocked_count(), 0);
    assert!(state.last_reply.is_none());
    assert!(engine.portrait().is_none());
}

#[test]
fn begin_shows_opening_portrait_and_records_first_meeting() {
    let (mut engine, _, images) = engine();

    let report = engine.begin(&ctx(1));

    assert_eq!(images.requested(), vec![(GamePhase::Normal, "happy".to_string())]);
    assert!(engine.state().achievements.is_unlocked(FIRST_MEET));
    assert_eq!(report.unlocked().collect::<Vec<_>>(), vec![FIRST_MEET]);
    assert!(engine.portrait().is_some());

    let again = engine.begin(&ctx(2));
    assert_eq!(images.calls(), 1);
    assert_eq!(again.unlocked().count(), 0);
}

#[test]
fn greeting_scenario_updates_affection_history_and_portrait() {
    let (mut engine, dialogue, images) = engine();
    dialogue.reply("嗨！", "happy", 5);

    let report = engine.submit_player_message(&ctx(1), "你好").unwrap();
    let state = engine.state();

    assert_eq!(state.affection, 35);
    assert_eq!(state.phase, GamePhase::Normal);
    assert_eq!(
        state.history.to_vec(),
        vec![Turn::user("你好"), Turn::character("嗨！")]
    );
    assert_eq!(images.requested(), vec![(GamePhase::Normal, "happy".to_string())]);
    assert_eq!(state.displayed_line, "嗨！");
    assert_eq!(state.last_reply, Some(CharacterReply::new("嗨！", "happy", 5)));
    assert!(report
        .changes
        .contains(&StateChange::AffectionChanged { from: 30, to: 35 }));
}

#[test]
fn collaborator_sees_history_ending_with_new_user_turn() {
    let (mut engine, dialogue, _) = engine();
    dialogue.reply("早！", "happy", 1).reply("嗯？", "surprised", 0);

    engine.submit_player_message(&ctx(1), "早上好").unwrap();
    engine.submit_player_message(&ctx(2), "  今天考试  ").unwrap();

    let seen = dialogue.last_seen();
    assert_eq!(seen.player_text, "今天考试");
    assert_eq!(seen.phase, GamePhase::Normal);
    assert_eq!(
        seen.history,
        vec![
            Turn::user("早上好"),
            Turn::character("早！"),
            Turn::user("今天考试"),
        ]
    );
}

#[test]
fn blank_message_is_rejected_without_touching_state() {
    let (mut engine, dialogue, _) = engine();
    let before = engine.snapshot();

    let result = engine.submit_player_message(&ctx(1), "   ");

    assert!(matches!(result, Err(EngineError::EmptyMessage)));
    assert_eq!(engine.snapshot(), before);
    assert_eq!(dialogue.calls(), 0);
}

#[test]
fn history_never_exceeds_limit() {
    let (mut engine, dialogue, _) = engine();
    for i in 0..12 {
        dialogue.reply(&format!("reply {i}"), "neutral", 0);
    }

    for i in 0..12 {
        engine
            .submit_player_message(&ctx(i), &format!("message {i}"))
            .unwrap();
        assert!(engine.state().history.len() <= HISTORY_LIMIT);
    }

    let turns = engine.state().history.to_vec();
    assert_eq!(turns.len(), HISTORY_LIMIT);
    assert_eq!(turns.last().unwrap(), &Turn::character("reply 11"));
    assert_eq!(turns.first().unwrap(), &Turn::user("message 7"));
}

#[test]
fn affection_is_not_clamped() {
    let (mut engine, dialogue, _) = engine();
    for _ in 0..8 {
        dialogue.reply("讨厌！", "angry", -5);
    }
    for i in 0..8 {
        engine.submit_player_message(&ctx(i), "走开").unwrap();
    }

    assert_eq!(engine.state().affection, -10);
}

#[test]
fn best_friend_unlocks_once_at_seventy() {
    let state = NarrativeState {
        affection: 66,
        ..NarrativeState::default()
    };
    let dialogue = ScriptedDialogue::new();
    let mut engine = NarrativeEngine::with_state(state, dialogue.clone(), CountingImages::new());

    dialogue.reply("嘿嘿", "shy", 3);
    let report = engine.submit_player_message(&ctx(1), "你真可爱").unwrap();
    assert_eq!(engine.state().affection, 69);
    assert_eq!(report.unlocked().count(), 0);

    dialogue.reply("(⁄ ⁄•⁄ω⁄•⁄ ⁄)", "shy", 1);
    let report = engine.submit_player_message(&ctx(2), "一起回家吧").unwrap();
    assert_eq!(engine.state().affection, 70);
    assert_eq!(report.unlocked().collect::<Vec<_>>(), vec![BEST_FRIEND]);

    dialogue.reply("好呀", "happy", 2);
    let report = engine.submit_player_message(&ctx(3), "明天见").unwrap();
    assert!(engine.state().achievements.is_unlocked(BEST_FRIEND));
    assert_eq!(report.unlocked().count(), 0);
}

#[test]
fn unlock_achievement_is_idempotent_and_ignores_unknown_ids() {
    let (mut engine, _, _) = engine();

    let first = engine.unlock_achievement(BEST_FRIEND);
    let second = engine.unlock_achievement(BEST_FRIEND);
    let unknown = engine.unlock_achievement("true_end");

    assert_eq!(first.unlocked().count(), 1);
    assert!(second.is_empty());
    assert!(unknown.is_empty());
    assert!(engine.state().achievements.is_unlocked(BEST_FRIEND));
    assert_eq!(engine.state().achievements.unlocked_count(), 1);
}

#[test]
fn advance_day_increments_by_one_and_sets_line() {
    let (mut engine, _, images) = engine();

    for expected in 2..=10 {
        engine.advance_day(&ctx(expected as u64));
        assert_eq!(engine.state().day, expected);
        assert_eq!(engine.state().displayed_line, DAY_PASSED_LINE);
    }
    assert_eq!(engine.state().phase, GamePhase::Normal);
    assert_eq!(images.calls(), 0);
}

#[test]
fn reaching_day_fifty_shifts_once() {
    let (mut engine, _, images) = engine();

    for i in 0..48 {
        engine.advance_day(&ctx(i));
    }
    assert_eq!(engine.state().day, 49);
    assert_eq!(engine.state().phase, GamePhase::Normal);

    let report = engine.advance_day(&ctx(100));
    let state = engine.state();
    assert_eq!(state.day, 50);
    assert_eq!(state.phase, GamePhase::Obsessive);
    assert_eq!(state.affection, 100);
    assert!(state.achievements.is_unlocked(SHIFT));
    assert_eq!(state.displayed_line, SHIFT_LINE);
    assert_eq!(
        report.phase_change(),
        Some((GamePhase::Normal, GamePhase::Obsessive))
    );
    assert_eq!(
        images.requested(),
        vec![(GamePhase::Obsessive, "staring".to_string())]
    );

    let report = engine.advance_day(&ctx(101));
    assert_eq!(engine.state().day, 51);
    assert_eq!(engine.state().phase, GamePhase::Obsessive);
    assert!(report.phase_change().is_none());
    assert_eq!(engine.state().displayed_line, DAY_PASSED_LINE);
    assert_eq!(images.calls(), 1);
}

#[test]
fn shift_overrides_accumulated_affection() {
    let state = NarrativeState {
        day: 49,
        affection: 85,
        ..NarrativeState::default()
    };
    let mut engine =
        NarrativeEngine::with_state(state, ScriptedDialogue::new(), CountingImages::new());

    engine.advance_day(&ctx(1));

    assert_eq!(engine.state().affection, 100);
}

#[test]
fn redemption_needs_pre_delta_affection_above_120() {
    let (mut engine, dialogue, images) = obsessive_engine(121);
    dialogue.reply("你...真的不会走？", "crazy", 6);

    let report = engine.submit_player_message(&ctx(1), "我会一直陪着你").unwrap();
    let state = engine.state();

    assert_eq!(state.phase, GamePhase::Redeemed);
    assert!(state.achievements.is_unlocked(REDEEMER));
    assert_eq!(state.displayed_line, REDEMPTION_LINE);
    assert_eq!(state.affection, 127);
    assert_eq!(
        images.requested(),
        vec![(GamePhase::Redeemed, "crying_happy".to_string())]
    );
    // the redemption path does not record her reply as a turn
    assert_eq!(state.history.to_vec(), vec![Turn::user("我会一直陪着你")]);
    assert_eq!(
        report.phase_change(),
        Some((GamePhase::Obsessive, GamePhase::Redeemed))
    );
}

#[test]
fn redemption_boundary_is_strict() {
    let (mut engine, dialogue, images) = obsessive_engine(120);
    dialogue.reply("骗人...", "creepy_smile", 6);

    engine.submit_player_message(&ctx(1), "我会一直陪着你").unwrap();
    let state = engine.state();

    assert_eq!(state.phase, GamePhase::Obsessive);
    assert!(!state.achievements.is_unlocked(REDEEMER));
    assert_eq!(state.affection, 126);
    assert_eq!(
        images.requested(),
        vec![(GamePhase::Obsessive, "creepy_smile".to_string())]
    );
    assert_eq!(state.history.len(), 2);
}

#[test]
fn redemption_needs_delta_above_five() {
    let (mut engine, dialogue, _) = obsessive_engine(130);
    dialogue.reply("嘿嘿嘿...", "crazy", 5);

    engine.submit_player_message(&ctx(1), "别这样").unwrap();

    assert_eq!(engine.state().phase, GamePhase::Obsessive);
    assert_eq!(engine.state().affection, 135);
}

#[test]
fn redeemed_is_terminal() {
    let (mut engine, dialogue, _) = obsessive_engine(121);
    dialogue.reply("...", "crazy", 8);
    engine.submit_player_message(&ctx(1), "我爱你").unwrap();
    assert_eq!(engine.state().phase, GamePhase::Redeemed);

    dialogue.reply("嗯！", "happy", 9);
    engine.submit_player_message(&ctx(2), "回家吧").unwrap();
    for i in 0..5 {
        engine.advance_day(&ctx(10 + i));
    }

    assert_eq!(engine.state().phase, GamePhase::Redeemed);
    assert_eq!(dialogue.last_seen().phase, GamePhase::Redeemed);
}

#[test]
fn obsessive_failure_falls_back_to_staring() {
    let (mut engine, dialogue, images) = obsessive_engine(110);
    dialogue.fail("connection reset");

    let report = engine.submit_player_message(&ctx(1), "你还好吗").unwrap();
    let state = engine.state();

    assert_eq!(state.last_reply, Some(CharacterReply::new("...", "staring", 0)));
    assert_eq!(state.affection, 110);
    assert_eq!(state.phase, GamePhase::Obsessive);
    assert_eq!(state.achievements.unlocked_count(), 0);
    assert!(report.used_fallback());
    assert_eq!(
        images.requested(),
        vec![(GamePhase::Obsessive, "staring".to_string())]
    );
}

#[test]
fn normal_failure_falls_back_to_neutral() {
    let (mut engine, dialogue, _) = engine();
    dialogue.fail("timeout");

    engine.submit_player_message(&ctx(1), "在吗").unwrap();

    assert_eq!(
        engine.state().last_reply,
        Some(CharacterReply::new("...", "neutral", 0))
    );
    assert_eq!(engine.state().history.to_vec().last().unwrap(), &Turn::character("..."));
}

#[test]
fn cancelled_dialogue_falls_back() {
    let (mut engine, dialogue, _) = engine();
    dialogue.reply("嗨！", "happy", 5);
    let request = ctx(1);
    request.cancel.cancel();

    let report = engine.submit_player_message(&request, "你好").unwrap();

    assert!(report.used_fallback());
    assert_eq!(engine.state().affection, 30);
}

#[test]
fn portrait_cache_reuses_first_successful_fetch() {
    let (mut engine, dialogue, images) = engine();
    dialogue.reply("嗨！", "happy", 1).reply("哈哈", "happy", 1);

    engine.submit_player_message(&ctx(1), "你好").unwrap();
    let first = engine.portrait().cloned().unwrap();
    engine.submit_player_message(&ctx(2), "笑一个").unwrap();

    assert_eq!(images.calls(), 1);
    assert_eq!(engine.portrait(), Some(&first));
    assert_eq!(engine.cached_portrait(GamePhase::Normal, "happy"), Some(&first));
}

#[test]
fn failed_portrait_keeps_previous_and_leaves_cache_alone() {
    let (mut engine, dialogue, images) = engine();
    dialogue.reply("嗨！", "happy", 1).reply("呜...", "sad", -1).reply("呜呜", "sad", 0);
    images.fail_for(GamePhase::Normal, "sad");

    engine.submit_player_message(&ctx(1), "你好").unwrap();
    let shown = engine.portrait().cloned().unwrap();

    let report = engine.submit_player_message(&ctx(2), "我要转学了").unwrap();
    assert_eq!(engine.portrait(), Some(&shown));
    assert!(engine.cached_portrait(GamePhase::Normal, "sad").is_none());
    assert!(report.changes.contains(&StateChange::PortraitUnavailable {
        phase: GamePhase::Normal,
        emotion: "sad".to_string(),
    }));
    // the turn is still recorded
    assert_eq!(engine.state().history.len(), 4);

    images.heal();
    engine.submit_player_message(&ctx(3), "开玩笑的").unwrap();
    assert_eq!(images.calls(), 3);
    assert_eq!(
        engine.portrait(),
        Some(&PortraitRef("img://NORMAL/sad/3".to_string()))
    );
}

#[test]
fn out_of_range_delta_saturates_instead_of_overflowing() {
    let (mut engine, dialogue, _) = engine();
    let reply = yandere_shift::model::llm_decode::decode_character_reply(
        r#"{"text":"!!!","emotion":"happy","affectionChange":2147483647}"#,
    )
    .unwrap();
    dialogue.reply(&reply.text, &reply.emotion, reply.affection_change);
    dialogue.reply("...", "sad", i32::MIN);

    engine.submit_player_message(&ctx(1), "你好").unwrap();
    assert_eq!(engine.state().affection, i32::MAX);
    assert!(engine.state().achievements.is_unlocked(BEST_FRIEND));

    engine.submit_player_message(&ctx(2), "再见").unwrap();
    assert_eq!(engine.state().affection, -1);

    engine.advance_day(&ctx(3));
    assert_eq!(engine.state().day, 2);
}

#[test]
fn day_counter_saturates_at_max() {
    let state = NarrativeState {
        day: u32::MAX,
        phase: GamePhase::Obsessive,
        ..NarrativeState::default()
    };
    let mut engine =
        NarrativeEngine::with_state(state, ScriptedDialogue::new(), CountingImages::new());

    engine.advance_day(&ctx(1));

    assert_eq!(engine.state().day, u32::MAX);
    assert_eq!(engine.state().phase, GamePhase::Obsessive);
}
