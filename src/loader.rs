// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Fixed-stride reader for benchmark output.
//!
//! A log is a sequence of groups. Each group opens with a label line and
//! holds four records, one per thread count. Every record starts with the
//! `Elapsed time` line, which is skipped, followed by one or two
//! measurement lines. The first group of a log carries latency, all later
//! groups carry throughput.
//!
//! Fields are found by position after splitting a line on single spaces:
//!
//! ```text
//! Throughput: 12.500000 MB/s            token 1
//! 1B Lantecy: 7 ms                      token 2
//! Ping-pong message latency: 120 us     token 3
//! ```

use crate::{Error, Result};

use logger::debug;
use serde_derive::Serialize;

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

/// Records in each group, one per thread count.
pub const RECORDS_PER_GROUP: usize = 4;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Field {
    Latency(usize),
    Throughput(usize),
}

const DISK_LATENCY_RUN: &[Field] = &[Field::Throughput(1), Field::Latency(2)];
const NETWORK_LATENCY_RUN: &[Field] = &[Field::Latency(3)];
const THROUGHPUT_RUN: &[Field] = &[Field::Throughput(1)];

/// Which benchmark produced a log. Decides the field layout.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Benchmark {
    Disk,
    Network,
}

impl Default for Benchmark {
    fn default() -> Self {
        Benchmark::Disk
    }
}

impl fmt::Display for Benchmark {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Benchmark::Disk => write!(f, "disk"),
            Benchmark::Network => write!(f, "network"),
        }
    }
}

impl Benchmark {
    /// measurement lines following the elapsed time line of a record
    fn fields(self, mode: usize) -> &'static [Field] {
        match (self, mode) {
            (Benchmark::Disk, 0) => DISK_LATENCY_RUN,
            (Benchmark::Network, 0) => NETWORK_LATENCY_RUN,
            (_, _) => THROUGHPUT_RUN,
        }
    }
}

/// Samples read from one log, in file order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BenchLog {
    latency: Vec<i64>,
    throughput: Vec<f64>,
}

impl BenchLog {
    pub fn latency(&self) -> &[i64] {
        &self.latency
    }

    pub fn throughput(&self) -> &[f64] {
        &self.throughput
    }

    /// Throughput samples of the `index`-th run. Empty when the log is too
    /// short, shorter than four when the run was cut off.
    pub fn run(&self, index: usize) -> &[f64] {
        self.throughput
            .chunks(RECORDS_PER_GROUP)
            .nth(index)
            .unwrap_or(&[])
    }
}

pub fn load_disk<P: AsRef<Path>>(path: P) -> Result<BenchLog> {
    load(path, Benchmark::Disk)
}

pub fn load_network<P: AsRef<Path>>(path: P) -> Result<BenchLog> {
    load(path, Benchmark::Network)
}

pub fn load<P: AsRef<Path>>(path: P, benchmark: Benchmark) -> Result<BenchLog> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("reading {} log: {}", benchmark, path.display());
    let log = parse(BufReader::new(file), benchmark)?;
    debug!(
        "{}: {} latency samples, {} throughput samples",
        path.display(),
        log.latency.len(),
        log.throughput.len()
    );

    Ok(log)
}

/// Walk the lines of a log. Short input yields truncated samples.
pub fn parse<R: BufRead>(reader: R, benchmark: Benchmark) -> Result<BenchLog> {
    let mut log = BenchLog::default();

    let mut label = true;
    let mut entry = 0;
    let mut count = 0;
    let mut mode = 0;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let number = index + 1;

        if label {
            label = false;
            continue;
        }

        if entry == 0 {
            entry = 1;
        } else {
            let fields = benchmark.fields(mode);
            match fields[entry - 1] {
                Field::Latency(position) => {
                    log.latency.push(field(&line, position, number)?);
                }
                Field::Throughput(position) => {
                    log.throughput.push(throughput(&line, position, number)?);
                }
            }
            if entry == fields.len() {
                entry = 0;
                count += 1;
            } else {
                entry += 1;
            }
        }

        if count == RECORDS_PER_GROUP {
            label = true;
            mode += 1;
            count = 0;
        }
    }

    Ok(log)
}

/// Throughput has to be finite to land on a chart axis.
fn throughput(line: &str, position: usize, number: usize) -> Result<f64> {
    let value: f64 = field(line, position, number)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::InvalidNumber {
            line: number,
            token: value.to_string(),
        })
    }
}

fn field<T: FromStr>(line: &str, position: usize, number: usize) -> Result<T> {
    let token = line
        .split(' ')
        .nth(position)
        .ok_or(Error::MissingField {
            line: number,
            index: position,
        })?
        .trim();

    token.parse().map_err(|_| Error::InvalidNumber {
        line: number,
        token: token.to_string(),
    })
}
