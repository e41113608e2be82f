use crate::engine::collaborator::{CancelToken, RequestId};
use crate::model::event_result::TransitionReport;
use crate::model::game_state::NarrativeState;

#[derive(Debug, Clone)]
pub enum EngineCommand {
    Begin,
    SubmitPlayerMessage(String),
    AdvanceDay,
    UnlockAchievement(String),
    Snapshot,
}

/// A command as it travels to the worker.
#[derive(Debug)]
pub struct EngineRequest {
    pub id: RequestId,
    pub cancel: CancelToken,
    pub command: EngineCommand,
}

#[derive(Debug, Clone)]
pub enum EngineResponse {
    /// Emitted once per accepted command, after the transition finished.
    StateChanged {
        request_id: RequestId,
        report: TransitionReport,
        snapshot: NarrativeState,
    },

    Rejected {
        request_id: RequestId,
        reason: String,
    },
}

impl EngineResponse {
    pub fn request_id(&self) -> RequestId {
        match self {
            EngineResponse::StateChanged { request_id, .. }
            | EngineResponse::Rejected { request_id, .. } => *request_id,
        }
    }
}
