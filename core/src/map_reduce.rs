// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::chunk::partition;
use crate::config::JobConfig;
use crate::error::{BoxError, EngineError};
use crate::executor::PhaseExecutor;
use crate::group_store::GroupStore;
use crate::job::{FnJob, MapReduceJob};
use crate::map_worker::MapWorker;
use crate::reduce_worker::ReduceWorker;
use crate::result_store::ResultStore;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Public entry point: wires partitioner, map worker pool, shuffle,
/// reduce worker pool and result collection for one job.
///
/// A single invocation owns its worker pools: they are created at
/// invocation start and torn down before results (or an error) are
/// returned. Nothing persists across invocations; chaining two jobs
/// means passing one invocation's output as the next one's input.
pub struct MapReduce<J: MapReduceJob> {
    job: Arc<J>,
    num_workers: usize,
}

impl<J: MapReduceJob> MapReduce<J> {
    /// Captures the job and worker count. Rejects `num_workers < 1`
    /// before any worker is spawned.
    pub fn new(job: J, num_workers: usize) -> Result<Self, EngineError> {
        if num_workers < 1 {
            return Err(EngineError::Config(format!(
                "num_workers must be positive, got {num_workers}"
            )));
        }
        Ok(Self {
            job: Arc::new(job),
            num_workers,
        })
    }

    /// Runs the job over `inputs`. Returns one output per distinct
    /// key emitted by the mapper, in unspecified order.
    pub async fn run(
        &self,
        inputs: Vec<J::Record>,
        chunksize: usize,
        debug: bool,
    ) -> Result<Vec<J::Output>, EngineError> {
        let results = self.run_inner(inputs, chunksize, debug).await?;
        Ok(results.into_iter().map(|(_, output)| output).collect())
    }

    async fn run_inner(
        &self,
        inputs: Vec<J::Record>,
        chunksize: usize,
        debug: bool,
    ) -> Result<Vec<(J::Key, J::Output)>, EngineError> {
        let config = JobConfig::new(self.num_workers, chunksize, debug);
        config.validate()?;

        // Partitioning
        let chunks: Vec<_> = partition(inputs, chunksize).collect();
        if chunks.is_empty() {
            if debug {
                tracing::debug!("empty input, nothing to do");
            }
            return Ok(Vec::new());
        }

        let cancel_token = CancellationToken::new();

        // Mapping
        let groups = GroupStore::new();
        let map_workers: Vec<MapWorker<J>> = (0..self.num_workers)
            .map(|id| {
                MapWorker::spawn(
                    id,
                    self.job.clone(),
                    groups.clone(),
                    cancel_token.clone(),
                    debug,
                )
            })
            .collect();
        PhaseExecutor::new("map", debug)
            .execute(map_workers, chunks, &cancel_token)
            .await?;

        // Shuffling: the map executor has joined every worker, so
        // each key's group is final from here on.
        let groups = groups.into_groups();
        if debug {
            tracing::debug!(groups = groups.len(), "shuffle complete");
        }

        // Reducing
        let results = ResultStore::new();
        let reduce_workers: Vec<ReduceWorker<J>> = (0..self.num_workers)
            .map(|id| {
                ReduceWorker::spawn(
                    id,
                    self.job.clone(),
                    results.clone(),
                    cancel_token.clone(),
                    debug,
                )
            })
            .collect();
        PhaseExecutor::new("reduce", debug)
            .execute(reduce_workers, groups, &cancel_token)
            .await?;

        // Collecting
        Ok(results.into_results())
    }
}

impl<J: MapReduceJob> MapReduce<J>
where
    J::Key: Ord,
{
    /// Deterministic-output mode: like [`run`](Self::run) but with
    /// results sorted by key.
    pub async fn run_sorted(
        &self,
        inputs: Vec<J::Record>,
        chunksize: usize,
        debug: bool,
    ) -> Result<Vec<J::Output>, EngineError> {
        let mut results = self.run_inner(inputs, chunksize, debug).await?;
        results.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(results.into_iter().map(|(_, output)| output).collect())
    }
}

/// Builds an engine from two plain functions, mirroring the
/// `MapReduce(mapper, reducer, num_workers)` construction shape.
pub fn map_reduce<M, R, Rec, K, V, Out>(
    mapper: M,
    reducer: R,
    num_workers: usize,
) -> Result<MapReduce<FnJob<M, R, Rec, K, V, Out>>, EngineError>
where
    M: Fn(Rec) -> Result<Vec<(K, V)>, BoxError> + Send + Sync + 'static,
    R: Fn(&K, Vec<V>) -> Result<Out, BoxError> + Send + Sync + 'static,
    Rec: Send + 'static,
    K: Eq + Hash + Debug + Send + 'static,
    V: Send + 'static,
    Out: Send + 'static,
{
    MapReduce::new(FnJob::new(mapper, reducer), num_workers)
}
