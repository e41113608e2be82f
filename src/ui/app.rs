use std::io::{BufRead, Write};

use anyhow::Result;
use rand::rngs::ThreadRng;

use crate::engine::engine::EngineHandle;
use crate::engine::protocol::EngineResponse;
use crate::model::event_result::{StateChange, TransitionReport};
use crate::model::game_state::NarrativeState;
use crate::model::message::Speaker;
use crate::ui::flavor;

/* =========================
   Input
   ========================= */

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Say(String),
    NextDay,
    Status,
    Achievements,
    History,
    Map,
    Help,
    Quit,
    Empty,
}

pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }

    match line {
        "/next" | "/day" => Input::NextDay,
        "/status" => Input::Status,
        "/achievements" => Input::Achievements,
        "/history" => Input::History,
        "/map" => Input::Map,
        "/help" => Input::Help,
        "/quit" | "/exit" => Input::Quit,
        _ => Input::Say(line.to_string()),
    }
}

const HELP: &str = "\
/next          advance one day
/status        day, affection and phase
/achievements  list achievements
/history       recent conversation
/map           look around the classroom
/quit          leave
anything else is said to Sakura";

/* =========================
   App
   ========================= */

/// Terminal front end. Subscribes to engine responses and renders them as text.
pub struct ConsoleApp {
    engine: EngineHandle,
    snapshot: Option<NarrativeState>,
    rng: ThreadRng,
}

impl ConsoleApp {
    pub fn new(engine: EngineHandle) -> Self {
        Self {
            engine,
            snapshot: None,
            rng: rand::thread_rng(),
        }
    }

    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        let id = self.engine.begin()?;
        let resp = self.engine.wait_for(id)?;
        self.apply(resp, out)?;
        writeln!(out, "(type /help for commands)")?;

        for line in input.lines() {
            let line = line?;
            // One action in flight at a time: wait for each response before reading on.
            let id = match parse_input(&line) {
                Input::Empty => continue,
                Input::Quit => break,
                Input::Help => {
                    writeln!(out, "{HELP}")?;
                    continue;
                }
                Input::Status => {
                    self.draw_status(out)?;
                    continue;
                }
                Input::Achievements => {
                    self.draw_achievements(out)?;
                    continue;
                }
                Input::History => {
                    self.draw_history(out)?;
                    continue;
                }
                Input::Map => {
                    self.draw_map(out)?;
                    continue;
                }
                Input::NextDay => self.engine.advance_day()?,
                Input::Say(text) => {
                    writeln!(out, "...")?;
                    self.engine.submit_player_message(text)?
                }
            };

            let resp = self.engine.wait_for(id)?;
            self.apply(resp, out)?;
        }

        Ok(())
    }

    fn apply<W: Write>(&mut self, resp: EngineResponse, out: &mut W) -> Result<()> {
        match resp {
            EngineResponse::StateChanged {
                report, snapshot, ..
            } => {
                self.draw_report(&report, &snapshot, out)?;
                self.snapshot = Some(snapshot);
            }
            EngineResponse::Rejected { reason, .. } => {
                writeln!(out, "❌ {reason}")?;
            }
        }
        Ok(())
    }

    fn draw_report<W: Write>(
        &self,
        report: &TransitionReport,
        state: &NarrativeState,
        out: &mut W,
    ) -> Result<()> {
        for change in &report.changes {
            match change {
                StateChange::DayAdvanced { day } => writeln!(out, "— Day {day} —")?,
                StateChange::PhaseChanged { to, .. } => writeln!(
                    out,
                    "⚠ {} | {}",
                    flavor::location_title(*to),
                    flavor::bgm_label(*to)
                )?,
                StateChange::AchievementUnlocked { id } => {
                    let name = state
                        .achievements
                        .get(id)
                        .map(|a| a.name.as_str())
                        .unwrap_or(id.as_str());
                    writeln!(out, "🏆 {name}")?
                }
                StateChange::PortraitChanged { emotion, portrait, .. } => {
                    writeln!(out, "[portrait: {emotion}] {portrait}")?
                }
                StateChange::AffectionChanged { from, to } => {
                    writeln!(out, "好感度 {from} → {to}")?
                }
                StateChange::PortraitUnavailable { .. }
                | StateChange::LineChanged { .. }
                | StateChange::TurnRecorded { .. }
                | StateChange::DialogueFallback { .. } => {}
            }
        }

        writeln!(out, "Sakura: {}", state.displayed_line)?;
        Ok(())
    }

    fn draw_status<W: Write>(&self, out: &mut W) -> Result<()> {
        let Some(state) = &self.snapshot else {
            return Ok(());
        };
        writeln!(out, "Day {} | {} | {}", state.day, state.phase, flavor::bgm_label(state.phase))?;
        writeln!(out, "好感度 {}", flavor::affection_bar(state.affection, 20))?;
        Ok(())
    }

    fn draw_achievements<W: Write>(&self, out: &mut W) -> Result<()> {
        let Some(state) = &self.snapshot else {
            return Ok(());
        };
        for a in state.achievements.iter() {
            let mark = if a.unlocked { "✔" } else { "·" };
            writeln!(out, "{mark} {} — {}", a.name, a.description)?;
        }
        Ok(())
    }

    fn draw_history<W: Write>(&self, out: &mut W) -> Result<()> {
        let Some(state) = &self.snapshot else {
            return Ok(());
        };
        for turn in state.history.iter() {
            let who = match turn.speaker {
                Speaker::User => "You",
                Speaker::Character => "Sakura",
            };
            writeln!(out, "{who}: {}", turn.text)?;
        }
        Ok(())
    }

    fn draw_map<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let Some(state) = &self.snapshot else {
            return Ok(());
        };
        let phase = state.phase;
        writeln!(out, "{}", flavor::location_title(phase))?;
        writeln!(out, "Sakura: {}", flavor::idle_status(phase, &mut self.rng))?;
        Ok(())
    }
}
