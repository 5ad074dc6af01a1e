// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to open {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("i/o error: {0}")]
    Stream(#[from] std::io::Error),
    #[error("line {line}: invalid number {token:?}")]
    InvalidNumber { line: usize, token: String },
    #[error("line {line}: no field at position {index}")]
    MissingField { line: usize, index: usize },
    #[error("bad config: {0}")]
    Config(String),
    #[error("failed to encode samples: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
