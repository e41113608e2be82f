#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};

use yandere_shift::engine::collaborator::{
    CancelToken, CollaboratorError, DialogueCollaborator, DialogueRequest, ImageCollaborator,
    RequestContext, RequestId,
};
use yandere_shift::model::game_state::PortraitRef;
use yandere_shift::model::message::Turn;
use yandere_shift::model::phase::GamePhase;
use yandere_shift::model::reply::CharacterReply;

/// What the dialogue fake saw on one call.
#[derive(Debug, Clone)]
pub struct SeenDialogue {
    pub player_text: String,
    pub phase: GamePhase,
    pub history: Vec<Turn>,
}

/// Replays queued replies; an empty queue behaves like a failed call.
#[derive(Clone, Default)]
pub struct ScriptedDialogue {
    replies: Arc<Mutex<VecDeque<Result<CharacterReply, String>>>>,
    pub seen: Arc<Mutex<Vec<SeenDialogue>>>,
}

impl ScriptedDialogue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, text: &str, emotion: &str, delta: i32) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(CharacterReply::new(text, emotion, delta)));
        self
    }

    pub fn fail(&self, reason: &str) -> &Self {
        self.replies.lock().unwrap().push_back(Err(reason.to_string()));
        self
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn last_seen(&self) -> SeenDialogue {
        self.seen.lock().unwrap().last().cloned().unwrap()
    }
}

impl DialogueCollaborator for ScriptedDialogue {
    fn generate_reply(
        &mut self,
        request: &DialogueRequest<'_>,
        cancel: &CancelToken,
    ) -> Result<CharacterReply, CollaboratorError> {
        self.seen.lock().unwrap().push(SeenDialogue {
            player_text: request.player_text.to_string(),
            phase: request.phase,
            history: request.history.to_vec(),
        });
        cancel.check()?;
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(reason)) => Err(CollaboratorError::Other(reason)),
            None => Err(CollaboratorError::EmptyResponse),
        }
    }
}

/// Signals when a call starts, then holds it until the test releases it.
/// The reply it would give is discarded if the request was cancelled meanwhile.
pub struct GatedDialogue {
    entered: Sender<()>,
    release: Mutex<Receiver<()>>,
    reply: CharacterReply,
}

impl GatedDialogue {
    pub fn new(entered: Sender<()>, release: Receiver<()>, reply: CharacterReply) -> Self {
        Self {
            entered,
            release: Mutex::new(release),
            reply,
        }
    }
}

impl DialogueCollaborator for GatedDialogue {
    fn generate_reply(
        &mut self,
        _request: &DialogueRequest<'_>,
        cancel: &CancelToken,
    ) -> Result<CharacterReply, CollaboratorError> {
        cancel.check()?;
        let _ = self.entered.send(());
        let _ = self.release.lock().unwrap().recv();
        cancel.check()?;
        Ok(self.reply.clone())
    }
}

/// Hands out a distinct URL per call and records every request.
#[derive(Clone, Default)]
pub struct CountingImages {
    pub requests: Arc<Mutex<Vec<(GamePhase, String)>>>,
    failing: Arc<Mutex<Vec<(GamePhase, String)>>>,
}

impl CountingImages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_for(&self, phase: GamePhase, emotion: &str) {
        self.failing
            .lock()
            .unwrap()
            .push((phase, emotion.to_string()));
    }

    pub fn heal(&self) {
        self.failing.lock().unwrap().clear();
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requested(&self) -> Vec<(GamePhase, String)> {
        self.requests.lock().unwrap().clone()
    }
}

impl ImageCollaborator for CountingImages {
    fn generate_portrait(
        &mut self,
        _id: RequestId,
        phase: GamePhase,
        emotion: &str,
        cancel: &CancelToken,
    ) -> Result<PortraitRef, CollaboratorError> {
        let mut requests = self.requests.lock().unwrap();
        requests.push((phase, emotion.to_string()));
        let n = requests.len();
        drop(requests);

        cancel.check()?;
        if self
            .failing
            .lock()
            .unwrap()
            .iter()
            .any(|(p, e)| *p == phase && e == emotion)
        {
            return Err(CollaboratorError::Status(503));
        }
        Ok(PortraitRef(format!("img://{phase}/{emotion}/{n}")))
    }
}

pub fn ctx(n: u64) -> RequestContext {
    RequestContext::new(RequestId(n))
}
