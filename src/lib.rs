// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Turns the output of the disk and network benchmarks into throughput
//! charts. The loader reads a log into latency and throughput samples, the
//! report module groups them into one series per block size or protocol.

mod config;
mod error;

pub mod loader;
pub mod report;

pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::loader::{BenchLog, Benchmark};
