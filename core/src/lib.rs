// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

pub mod chunk;
pub mod config;
pub mod error;
pub mod executor;
pub mod group_store;
pub mod job;
pub mod map_reduce;
pub mod map_worker;
pub mod reduce_worker;
pub mod result_store;
pub mod worker;

pub use chunk::{Chunk, partition};
pub use config::JobConfig;
pub use error::{BoxError, EngineError};
pub use group_store::{Group, GroupStore};
pub use job::{FnJob, MapReduceJob};
pub use map_reduce::{MapReduce, map_reduce};
