use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::game_state::PortraitRef;
use crate::model::llm_decode::DecodeError;
use crate::model::message::Turn;
use crate::model::phase::GamePhase;
use crate::model::reply::CharacterReply;

/// Identifies one command sent to the engine and every collaborator call it makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Shared flag a caller can flip to abandon an in-flight request.
/// Clients check it before and after the network round trip.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn check(&self) -> Result<(), CollaboratorError> {
        if self.is_cancelled() {
            Err(CollaboratorError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Request id plus its cancel token, threaded through one engine operation.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub id: RequestId,
    pub cancel: CancelToken,
}

impl RequestContext {
    pub fn new(id: RequestId) -> Self {
        Self {
            id,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_cancel(id: RequestId, cancel: CancelToken) -> Self {
        Self { id, cancel }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("response carried no text")]
    EmptyResponse,

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("missing API key")]
    MissingCredential,

    #[error("request cancelled")]
    Cancelled,

    #[error("{0}")]
    Other(String),
}

/// Everything the dialogue collaborator is given for one reply.
#[derive(Debug, Clone)]
pub struct DialogueRequest<'a> {
    pub id: RequestId,
    pub player_text: &'a str,
    pub phase: GamePhase,
    /// Bounded history, already ending with the player's new turn.
    pub history: &'a [Turn],
}

pub trait DialogueCollaborator: Send {
    fn generate_reply(
        &mut self,
        request: &DialogueRequest<'_>,
        cancel: &CancelToken,
    ) -> Result<CharacterReply, CollaboratorError>;
}

pub trait ImageCollaborator: Send {
    fn generate_portrait(
        &mut self,
        id: RequestId,
        phase: GamePhase,
        emotion: &str,
        cancel: &CancelToken,
    ) -> Result<PortraitRef, CollaboratorError>;
}

impl<T: DialogueCollaborator + ?Sized> DialogueCollaborator for Box<T> {
    fn generate_reply(
        &mut self,
        request: &DialogueRequest<'_>,
        cancel: &CancelToken,
    ) -> Result<CharacterReply, CollaboratorError> {
        (**self).generate_reply(request, cancel)
    }
}

impl<T: ImageCollaborator + ?Sized> ImageCollaborator for Box<T> {
    fn generate_portrait(
        &mut self,
        id: RequestId,
        phase: GamePhase,
        emotion: &str,
        cancel: &CancelToken,
    ) -> Result<PortraitRef, CollaboratorError> {
        (**self).generate_portrait(id, phase, emotion, cancel)
    }
}
