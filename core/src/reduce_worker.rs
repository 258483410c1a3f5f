// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::{EngineError, panic_to_error};
use crate::group_store::Group;
use crate::job::MapReduceJob;
use crate::result_store::ResultStore;
use crate::worker::{CompletionTx, Worker};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;

/// Reduce-phase worker, symmetric to the map worker but claiming one
/// group per assignment. No reducer ever observes another key's
/// group.
pub struct ReduceWorker<J: MapReduceJob> {
    work_tx: mpsc::Sender<(Group<J::Key, J::Value>, CompletionTx)>,
    task_handle: JoinHandle<()>,
}

impl<J: MapReduceJob> ReduceWorker<J> {
    pub fn spawn(
        id: usize,
        job: Arc<J>,
        results: ResultStore<J::Key, J::Output>,
        cancel_token: CancellationToken,
        debug: bool,
    ) -> Self {
        let (work_tx, work_rx) = mpsc::channel(1);
        let handle = tokio::spawn(Self::run_task(id, job, work_rx, results, cancel_token, debug));
        Self {
            work_tx,
            task_handle: handle,
        }
    }

    async fn run_task(
        id: usize,
        job: Arc<J>,
        mut work_rx: mpsc::Receiver<(Group<J::Key, J::Value>, CompletionTx)>,
        results: ResultStore<J::Key, J::Output>,
        cancel_token: CancellationToken,
        debug: bool,
    ) {
        while let Some((group, complete_tx)) = work_rx.recv().await {
            if cancel_token.is_cancelled() {
                return;
            }

            let Group { key, values } = group;
            let value_count = values.len();

            let outcome = catch_unwind(AssertUnwindSafe(|| job.reduce(&key, values)));
            match outcome {
                Ok(Ok(output)) => {
                    if debug {
                        tracing::debug!(worker = id, key = ?key, values = value_count, "group reduced");
                    }
                    results.push(key, output);
                    let _ = complete_tx.send(Ok(id)).await;
                }
                Ok(Err(source)) => {
                    let _ = complete_tx
                        .send(Err(EngineError::Reducer {
                            key: format!("{key:?}"),
                            source,
                        }))
                        .await;
                    return;
                }
                Err(payload) => {
                    let _ = complete_tx
                        .send(Err(EngineError::Reducer {
                            key: format!("{key:?}"),
                            source: panic_to_error(payload),
                        }))
                        .await;
                    return;
                }
            }
        }
    }
}

impl<J: MapReduceJob> Worker for ReduceWorker<J> {
    type Assignment = Group<J::Key, J::Value>;

    async fn send_work(&self, assignment: Self::Assignment, complete_tx: CompletionTx) {
        let _ = self.work_tx.send((assignment, complete_tx)).await;
    }

    async fn wait(self) -> Result<(), JoinError> {
        drop(self.work_tx); // Close the channel to signal the task to exit
        self.task_handle.await
    }
}
