use log::{debug, info, warn};

use crate::engine::collaborator::{
    DialogueCollaborator, DialogueRequest, ImageCollaborator, RequestContext,
};
use crate::engine::error::EngineError;
use crate::engine::portrait_cache::PortraitCache;
use crate::model::achievement::{UnlockOutcome, BEST_FRIEND, FIRST_MEET, REDEEMER, SHIFT};
use crate::model::event_result::{StateChange, TransitionReport};
use crate::model::game_state::{NarrativeState, PortraitRef};
use crate::model::message::{Speaker, Turn};
use crate::model::phase::GamePhase;
use crate::model::reply::CharacterReply;

/// Day on which the character snaps.
pub const SHIFT_DAY: u32 = 50;
/// Affection reached in the normal phase that earns `best_friend`.
pub const BEST_FRIEND_AFFECTION: i32 = 70;
/// Affection forced at the moment of the shift.
pub const OBSESSION_BASELINE: i32 = 100;
/// Pre-delta affection that must be exceeded to redeem her.
pub const REDEMPTION_AFFECTION: i32 = 120;
/// Single-reply delta that must be exceeded to redeem her.
pub const REDEMPTION_DELTA: i32 = 5;

pub const OPENING_EMOTION: &str = "happy";
pub const SHIFT_EMOTION: &str = "staring";
pub const REDEEMED_EMOTION: &str = "crying_happy";

pub const DAY_PASSED_LINE: &str = "又过了一天...";
pub const SHIFT_LINE: &str = "...你为什么要那样看着我？你想离开，对吧？";
pub const REDEMPTION_LINE: &str = "我... 对不起。我不知道我怎么了。谢谢你留下来。";

/// Owns the session state and the collaborators that feed it.
///
/// Every operation runs to completion before returning, including any
/// collaborator round trips, and hands back a [`TransitionReport`]
/// describing what changed.
pub struct NarrativeEngine {
    state: NarrativeState,
    portraits: PortraitCache,
    dialogue: Box<dyn DialogueCollaborator>,
    images: Box<dyn ImageCollaborator>,
}

impl NarrativeEngine {
    pub fn new(
        dialogue: impl DialogueCollaborator + 'static,
        images: impl ImageCollaborator + 'static,
    ) -> Self {
        Self::with_state(NarrativeState::default(), dialogue, images)
    }

    pub fn with_state(
        state: NarrativeState,
        dialogue: impl DialogueCollaborator + 'static,
        images: impl ImageCollaborator + 'static,
    ) -> Self {
        Self {
            state,
            portraits: PortraitCache::new(),
            dialogue: Box::new(dialogue),
            images: Box::new(images),
        }
    }

    pub fn state(&self) -> &NarrativeState {
        &self.state
    }

    pub fn snapshot(&self) -> NarrativeState {
        self.state.clone()
    }

    /// Portrait currently on display.
    pub fn portrait(&self) -> Option<&PortraitRef> {
        self.state.portrait.as_ref()
    }

    /// Cached portrait for a pair, without calling out.
    pub fn cached_portrait(&self, phase: GamePhase, emotion: &str) -> Option<&PortraitRef> {
        self.portraits.get(phase, emotion)
    }

    /// Session start: show the opening portrait and record the first meeting.
    pub fn begin(&mut self, ctx: &RequestContext) -> TransitionReport {
        let mut report = TransitionReport::default();
        self.resolve_portrait(ctx, GamePhase::Normal, OPENING_EMOTION, &mut report);
        self.unlock(FIRST_MEET, &mut report);
        report
    }

    pub fn submit_player_message(
        &mut self,
        ctx: &RequestContext,
        text: &str,
    ) -> Result<TransitionReport, EngineError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(EngineError::EmptyMessage);
        }

        let mut report = TransitionReport::default();
        self.state.history.push(Turn::user(text));
        report.push(StateChange::TurnRecorded {
            speaker: Speaker::User,
        });

        let phase = self.state.phase;
        let history = self.state.history.to_vec();
        let request = DialogueRequest {
            id: ctx.id,
            player_text: text,
            phase,
            history: &history,
        };

        let reply = match self.dialogue.generate_reply(&request, &ctx.cancel) {
            Ok(reply) => reply,
            Err(e) => {
                warn!("dialogue request {} failed, using fallback: {}", ctx.id, e);
                report.push(StateChange::DialogueFallback {
                    reason: e.to_string(),
                });
                CharacterReply::fallback(phase)
            }
        };
        debug!(
            "reply {}: emotion={} delta={}",
            ctx.id, reply.emotion, reply.affection_change
        );
        if !phase.emotion_vocabulary().iter().any(|e| *e == reply.emotion) {
            debug!("emotion '{}' is outside the {} vocabulary", reply.emotion, phase);
        }

        self.state.last_reply = Some(reply.clone());
        self.set_line(&reply.text, &mut report);

        let before = self.state.affection;
        let delta = reply.affection_change;
        // deltas are not range-checked, so saturate rather than overflow
        self.state.affection = before.saturating_add(delta);
        if delta != 0 {
            report.push(StateChange::AffectionChanged {
                from: before,
                to: self.state.affection,
            });
        }

        if phase == GamePhase::Normal && self.state.affection >= BEST_FRIEND_AFFECTION {
            self.unlock(BEST_FRIEND, &mut report);
        }

        if phase == GamePhase::Obsessive
            && delta > REDEMPTION_DELTA
            && before > REDEMPTION_AFFECTION
        {
            self.set_phase(GamePhase::Redeemed, &mut report);
            self.set_line(REDEMPTION_LINE, &mut report);
            self.unlock(REDEEMER, &mut report);
            self.resolve_portrait(ctx, GamePhase::Redeemed, REDEEMED_EMOTION, &mut report);
            return Ok(report);
        }

        self.resolve_portrait(ctx, phase, &reply.emotion, &mut report);

        self.state.history.push(Turn::character(reply.text));
        report.push(StateChange::TurnRecorded {
            speaker: Speaker::Character,
        });

        Ok(report)
    }

    pub fn advance_day(&mut self, ctx: &RequestContext) -> TransitionReport {
        let mut report = TransitionReport::default();

        self.state.day = self.state.day.saturating_add(1);
        report.push(StateChange::DayAdvanced {
            day: self.state.day,
        });
        self.set_line(DAY_PASSED_LINE, &mut report);

        self.check_phase_shift(ctx, &mut report);
        report
    }

    /// No-op for unknown ids and flags that are already set.
    pub fn unlock_achievement(&mut self, id: &str) -> TransitionReport {
        let mut report = TransitionReport::default();
        self.unlock(id, &mut report);
        report
    }

    fn check_phase_shift(&mut self, ctx: &RequestContext, report: &mut TransitionReport) {
        if self.state.day < SHIFT_DAY || self.state.phase != GamePhase::Normal {
            return;
        }

        info!("day {} reached, character shifts", self.state.day);
        self.set_phase(GamePhase::Obsessive, report);

        let before = self.state.affection;
        self.state.affection = OBSESSION_BASELINE;
        if before != OBSESSION_BASELINE {
            report.push(StateChange::AffectionChanged {
                from: before,
                to: OBSESSION_BASELINE,
            });
        }

        self.set_line(SHIFT_LINE, report);
        self.unlock(SHIFT, report);
        self.resolve_portrait(ctx, GamePhase::Obsessive, SHIFT_EMOTION, report);
    }

    fn resolve_portrait(
        &mut self,
        ctx: &RequestContext,
        phase: GamePhase,
        emotion: &str,
        report: &mut TransitionReport,
    ) {
        let portrait = match self.portraits.get(phase, emotion).cloned() {
            Some(cached) => cached,
            None => match self
                .images
                .generate_portrait(ctx.id, phase, emotion, &ctx.cancel)
            {
                Ok(fresh) => {
                    self.portraits.insert(phase, emotion, fresh.clone());
                    fresh
                }
                Err(e) => {
                    warn!(
                        "portrait request {} for {}/{} failed: {}",
                        ctx.id, phase, emotion, e
                    );
                    report.push(StateChange::PortraitUnavailable {
                        phase,
                        emotion: emotion.to_string(),
                    });
                    return;
                }
            },
        };

        self.state.portrait = Some(portrait.clone());
        debug!("portrait {}/{} -> {}", phase, emotion, portrait);
        report.push(StateChange::PortraitChanged {
            phase,
            emotion: emotion.to_string(),
            portrait,
        });
    }

    fn unlock(&mut self, id: &str, report: &mut TransitionReport) {
        match self.state.achievements.unlock(id) {
            UnlockOutcome::Unlocked => {
                info!("achievement unlocked: {}", id);
                report.push(StateChange::AchievementUnlocked { id: id.to_string() });
            }
            UnlockOutcome::AlreadyUnlocked => {}
            UnlockOutcome::Unknown => debug!("ignoring unknown achievement '{}'", id),
        }
    }

    fn set_phase(&mut self, to: GamePhase, report: &mut TransitionReport) {
        let from = self.state.phase;
        self.state.phase = to;
        info!("phase {} -> {}", from, to);
        report.push(StateChange::PhaseChanged { from, to });
    }

    fn set_line(&mut self, line: &str, report: &mut TransitionReport) {
        self.state.displayed_line = line.to_string();
        report.push(StateChange::LineChanged {
            line: line.to_string(),
        });
    }
}
