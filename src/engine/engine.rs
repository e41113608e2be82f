use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use log::{debug, info};

use crate::engine::collaborator::{CancelToken, RequestContext, RequestId};
use crate::engine::error::EngineError;
use crate::engine::narrative::NarrativeEngine;
use crate::engine::protocol::{EngineCommand, EngineRequest, EngineResponse};
use crate::model::event_result::TransitionReport;

type PendingMap = Arc<Mutex<HashMap<RequestId, CancelToken>>>;

/// Worker side: owns the narrative engine and processes commands in order.
pub struct Engine {
    rx: Receiver<EngineRequest>,
    tx: Sender<EngineResponse>,
    narrative: NarrativeEngine,
    pending: PendingMap,
}

impl Engine {
    fn new(
        rx: Receiver<EngineRequest>,
        tx: Sender<EngineResponse>,
        narrative: NarrativeEngine,
        pending: PendingMap,
    ) -> Self {
        Self {
            rx,
            tx,
            narrative,
            pending,
        }
    }

    pub fn run(&mut self) {
        while let Ok(req) = self.rx.recv() {
            let response = self.handle(req);
            if let EngineResponse::StateChanged { request_id, report, .. } = &response {
                let names: Vec<&str> = report.changes.iter().map(|c| c.short_name()).collect();
                debug!("request {} applied: {}", request_id, names.join(", "));
            }
            let id = response.request_id();
            if let Ok(mut pending) = self.pending.lock() {
                pending.remove(&id);
            }
            if self.tx.send(response).is_err() {
                debug!("no subscriber left, stopping engine worker");
                break;
            }
        }
        info!("engine worker stopped");
    }

    fn handle(&mut self, req: EngineRequest) -> EngineResponse {
        let ctx = RequestContext::with_cancel(req.id, req.cancel);

        let report: Result<TransitionReport, EngineError> = match req.command {
            EngineCommand::Begin => Ok(self.narrative.begin(&ctx)),
            EngineCommand::SubmitPlayerMessage(text) => {
                self.narrative.submit_player_message(&ctx, &text)
            }
            EngineCommand::AdvanceDay => Ok(self.narrative.advance_day(&ctx)),
            EngineCommand::UnlockAchievement(id) => Ok(self.narrative.unlock_achievement(&id)),
            EngineCommand::Snapshot => Ok(TransitionReport::default()),
        };

        match report {
            Ok(report) => EngineResponse::StateChanged {
                request_id: ctx.id,
                report,
                snapshot: self.narrative.snapshot(),
            },
            Err(e) => EngineResponse::Rejected {
                request_id: ctx.id,
                reason: e.to_string(),
            },
        }
    }
}

/// Caller side of the engine worker. Hands out request ids and cancel tokens.
pub struct EngineHandle {
    tx: Option<Sender<EngineRequest>>,
    rx: Receiver<EngineResponse>,
    next_id: AtomicU64,
    pending: PendingMap,
    worker: Option<JoinHandle<()>>,
}

impl EngineHandle {
    pub fn spawn(narrative: NarrativeEngine) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let pending: PendingMap = Arc::default();

        let worker_pending = Arc::clone(&pending);
        let worker = std::thread::spawn(move || {
            let mut engine = Engine::new(cmd_rx, resp_tx, narrative, worker_pending);
            engine.run();
        });

        Self {
            tx: Some(cmd_tx),
            rx: resp_rx,
            next_id: AtomicU64::new(1),
            pending,
            worker: Some(worker),
        }
    }

    pub fn send(&self, command: EngineCommand) -> Result<RequestId, EngineError> {
        let id = RequestId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let cancel = CancelToken::new();
        if let Ok(mut pending) = self.pending.lock() {
            pending.insert(id, cancel.clone());
        }

        let tx = self.tx.as_ref().ok_or(EngineError::WorkerGone)?;
        tx.send(EngineRequest {
            id,
            cancel,
            command,
        })
        .map_err(|_| EngineError::WorkerGone)?;
        Ok(id)
    }

    pub fn begin(&self) -> Result<RequestId, EngineError> {
        self.send(EngineCommand::Begin)
    }

    pub fn submit_player_message(
        &self,
        text: impl Into<String>,
    ) -> Result<RequestId, EngineError> {
        self.send(EngineCommand::SubmitPlayerMessage(text.into()))
    }

    pub fn advance_day(&self) -> Result<RequestId, EngineError> {
        self.send(EngineCommand::AdvanceDay)
    }

    pub fn unlock_achievement(&self, id: impl Into<String>) -> Result<RequestId, EngineError> {
        self.send(EngineCommand::UnlockAchievement(id.into()))
    }

    pub fn request_snapshot(&self) -> Result<RequestId, EngineError> {
        self.send(EngineCommand::Snapshot)
    }

    /// Returns false if the request already finished or never existed.
    pub fn cancel(&self, id: RequestId) -> bool {
        let Ok(pending) = self.pending.lock() else {
            return false;
        };
        match pending.get(&id) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn recv(&self) -> Result<EngineResponse, EngineError> {
        self.rx.recv().map_err(|_| EngineError::WorkerGone)
    }

    pub fn recv_timeout(
        &self,
        timeout: Duration,
    ) -> Result<Option<EngineResponse>, EngineError> {
        match self.rx.recv_timeout(timeout) {
            Ok(resp) => Ok(Some(resp)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(EngineError::WorkerGone),
        }
    }

    /// Block until the response for `id` arrives, dropping any others.
    pub fn wait_for(&self, id: RequestId) -> Result<EngineResponse, EngineError> {
        loop {
            let resp = self.recv()?;
            if resp.request_id() == id {
                return Ok(resp);
            }
            debug!(
                "skipping response for {} while waiting for {}",
                resp.request_id(),
                id
            );
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        // Closing the command channel ends the worker loop.
        drop(self.tx.take());
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
