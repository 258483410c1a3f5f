// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::EngineError;
use crate::worker::Worker;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Drives one phase (map or reduce) over a pool of workers.
///
/// Handles the complete lifecycle:
/// - assigns initial work to every worker,
/// - hands the next unclaimed assignment to whichever worker
///   completes first, so uneven assignment costs self-balance,
/// - on the first worker error stops dispatching, cancels the token
///   and unwinds,
/// - joins every worker before returning, success or failure.
pub struct PhaseExecutor {
    phase: &'static str,
    debug: bool,
}

impl PhaseExecutor {
    pub fn new(phase: &'static str, debug: bool) -> Self {
        Self { phase, debug }
    }

    pub async fn execute<W: Worker>(
        &self,
        workers: Vec<W>,
        assignments: Vec<W::Assignment>,
        cancel_token: &CancellationToken,
    ) -> Result<(), EngineError> {
        if self.debug {
            tracing::debug!(
                phase = self.phase,
                workers = workers.len(),
                assignments = assignments.len(),
                "phase started"
            );
        }

        let (complete_tx, mut complete_rx) = mpsc::channel(workers.len());
        let mut queue = assignments.into_iter();
        let mut active_workers = 0usize;

        // Distribute initial assignments
        for worker in &workers {
            match queue.next() {
                Some(assignment) => {
                    worker.send_work(assignment, complete_tx.clone()).await;
                    active_workers += 1;
                }
                None => break,
            }
        }

        // Each completion frees a worker to claim the next assignment.
        // The first error stops dispatch; in-flight workers observe
        // the cancelled token and bail out between records.
        let mut failure = None;
        while active_workers > 0 {
            match complete_rx.recv().await {
                Some(Ok(worker_id)) => {
                    active_workers -= 1;
                    if let Some(assignment) = queue.next() {
                        workers[worker_id]
                            .send_work(assignment, complete_tx.clone())
                            .await;
                        active_workers += 1;
                    }
                }
                Some(Err(error)) => {
                    cancel_token.cancel();
                    failure = Some(error);
                    break;
                }
                None => break,
            }
        }

        drop(complete_tx);
        drop(complete_rx);

        // Barrier: every worker is joined before the phase reports,
        // so no assignment can still be in flight afterwards.
        for (id, worker) in workers.into_iter().enumerate() {
            if let Err(join_error) = worker.wait().await {
                tracing::error!(
                    phase = self.phase,
                    worker = id,
                    error = %join_error,
                    "worker task failed"
                );
                if failure.is_none() {
                    failure = Some(EngineError::Worker {
                        phase: self.phase,
                        id,
                        source: join_error,
                    });
                }
            }
        }

        match failure {
            Some(error) => Err(error),
            None => {
                if self.debug {
                    tracing::debug!(phase = self.phase, "phase complete");
                }
                Ok(())
            }
        }
    }
}
