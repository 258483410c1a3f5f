// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::chunk::Chunk;
use crate::error::{EngineError, panic_to_error};
use crate::group_store::GroupStore;
use crate::job::MapReduceJob;
use crate::worker::{CompletionTx, Worker};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;

/// Map-phase worker: a spawned task that applies the job's mapper to
/// every record of each assigned chunk, in chunk order, and pushes
/// the emitted pairs into the shared grouping store.
pub struct MapWorker<J: MapReduceJob> {
    work_tx: mpsc::Sender<(Chunk<J::Record>, CompletionTx)>,
    task_handle: JoinHandle<()>,
}

impl<J: MapReduceJob> MapWorker<J> {
    pub fn spawn(
        id: usize,
        job: Arc<J>,
        groups: GroupStore<J::Key, J::Value>,
        cancel_token: CancellationToken,
        debug: bool,
    ) -> Self {
        let (work_tx, work_rx) = mpsc::channel(1);
        let handle = tokio::spawn(Self::run_task(id, job, work_rx, groups, cancel_token, debug));
        Self {
            work_tx,
            task_handle: handle,
        }
    }

    async fn run_task(
        id: usize,
        job: Arc<J>,
        mut work_rx: mpsc::Receiver<(Chunk<J::Record>, CompletionTx)>,
        groups: GroupStore<J::Key, J::Value>,
        cancel_token: CancellationToken,
        debug: bool,
    ) {
        while let Some((chunk, complete_tx)) = work_rx.recv().await {
            let chunk_id = chunk.id;
            let mut emitted = 0usize;

            for (position, record) in chunk.records.into_iter().enumerate() {
                // The job is being torn down; the orchestrator no
                // longer listens for completions.
                if cancel_token.is_cancelled() {
                    return;
                }

                let outcome = catch_unwind(AssertUnwindSafe(|| job.map(record)));
                let pairs = match outcome {
                    Ok(Ok(pairs)) => pairs,
                    Ok(Err(source)) => {
                        let _ = complete_tx
                            .send(Err(EngineError::Mapper {
                                chunk: chunk_id,
                                record: position,
                                source,
                            }))
                            .await;
                        return;
                    }
                    Err(payload) => {
                        let _ = complete_tx
                            .send(Err(EngineError::Mapper {
                                chunk: chunk_id,
                                record: position,
                                source: panic_to_error(payload),
                            }))
                            .await;
                        return;
                    }
                };

                emitted += pairs.len();
                for (key, value) in pairs {
                    groups.push(key, value);
                }
            }

            if debug {
                tracing::debug!(worker = id, chunk = chunk_id, pairs = emitted, "chunk mapped");
            }
            let _ = complete_tx.send(Ok(id)).await;
        }
    }
}

impl<J: MapReduceJob> Worker for MapWorker<J> {
    type Assignment = Chunk<J::Record>;

    async fn send_work(&self, assignment: Self::Assignment, complete_tx: CompletionTx) {
        let _ = self.work_tx.send((assignment, complete_tx)).await;
    }

    async fn wait(self) -> Result<(), JoinError> {
        drop(self.work_tx); // Close the channel to signal the task to exit
        self.task_handle.await
    }
}
