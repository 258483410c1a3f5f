// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::EngineError;
use tokio::sync::mpsc;
use tokio::task::JoinError;

/// Message a worker sends back when it finishes an assignment:
/// its id on success, the job-aborting error on failure.
pub type Completion = Result<usize, EngineError>;

/// Sender half of the shared completion channel.
pub type CompletionTx = mpsc::Sender<Completion>;

/// Trait for workers (mappers and reducers) to abstract the phase
/// being executed. A worker processes one assignment at a time and
/// reports each through the completion channel.
pub trait Worker: Send {
    type Assignment: Send;

    /// Hand the worker its next assignment. The executor never sends
    /// a new assignment before the previous completion arrived, so at
    /// most one assignment is in flight per worker.
    fn send_work(
        &self,
        assignment: Self::Assignment,
        complete_tx: CompletionTx,
    ) -> impl Future<Output = ()> + Send;

    /// Closes the work channel and waits for the worker to shut down.
    fn wait(self) -> impl Future<Output = Result<(), JoinError>> + Send;
}
