use thiserror::Error;

/// Errors the engine surfaces to its caller. Collaborator failures are not
/// among them: those are absorbed in place.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("player message is empty")]
    EmptyMessage,

    #[error("engine worker has stopped")]
    WorkerGone,
}
