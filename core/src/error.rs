// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::any::Any;
use thiserror::Error;

/// Error type returned by user-supplied map and reduce functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by a map-reduce invocation.
///
/// All worker-phase errors abort the whole job: a partial map result
/// with unknown coverage is unsafe to reduce, so nothing short of a
/// fully drained phase is ever returned to the caller.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid configuration, rejected before any worker is spawned
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The mapper failed on a record; `chunk` and `record` identify it
    #[error("mapper failed on record {record} of chunk {chunk}: {source}")]
    Mapper {
        chunk: usize,
        record: usize,
        #[source]
        source: BoxError,
    },

    /// The reducer failed on a group; `key` identifies it
    #[error("reducer failed for key {key}: {source}")]
    Reducer {
        key: String,
        #[source]
        source: BoxError,
    },

    /// A worker task terminated abnormally (cancelled or panicked
    /// outside user code)
    #[error("{phase} worker {id} terminated abnormally: {source}")]
    Worker {
        phase: &'static str,
        id: usize,
        #[source]
        source: tokio::task::JoinError,
    },
}

/// Turns a `catch_unwind` payload from user code into a `BoxError`.
pub(crate) fn panic_to_error(payload: Box<dyn Any + Send>) -> BoxError {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    };
    format!("panicked: {message}").into()
}
