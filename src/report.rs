// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Groups parsed samples into chart series and writes the results.

use crate::{BenchLog, Config, Error, Result};

use logger::warn;
use serde::Serialize;
use serde_derive::Serialize;
use throughputgraph::{palette, Legend, LineChart, RGBColor, Series};

use std::fs::File;
use std::io::{BufWriter, Write};

/// Worker thread counts of the four records in every run.
pub const THREADS: [u32; 4] = [1, 2, 4, 8];

/// Disk runs in log order, with their series colour.
pub const BLOCK_SIZES: [(&str, RGBColor); 4] = [
    ("8B", palette::BLUE),
    ("8KB", palette::GREEN),
    ("8MB", palette::RED),
    ("80MB", palette::PURPLE),
];

/// Network benchmarks report per-thread latency, so multiply by the thread
/// count of each record. Only the first run is scaled. Products past the
/// range of `i64` saturate.
pub fn scaled_latency(latency: &[i64]) -> Vec<i64> {
    latency
        .iter()
        .zip(THREADS.iter())
        .map(|(latency, threads)| latency.saturating_mul(i64::from(*threads)))
        .collect()
}

pub fn disk_chart(config: &Config, log: &BenchLog) -> LineChart {
    let mut chart = base_chart(config);
    chart.y_desc("MB/s").legend(Legend::MiddleLeft);

    for (index, (block, colour)) in BLOCK_SIZES.iter().enumerate() {
        let run = log.run(index);
        if run.is_empty() {
            warn!("no throughput samples for {} block size", block);
            continue;
        }
        chart.series(Series::new(
            format!("{} block size", block),
            *colour,
            &THREADS,
            run,
        ));
    }

    chart
}

pub fn network_chart(config: &Config, tcp: &BenchLog, udp: &BenchLog) -> LineChart {
    let mut chart = base_chart(config);
    chart.y_desc("Mbps").legend(Legend::UpperLeft);

    for (protocol, colour, log) in &[("TCP", palette::BLUE, tcp), ("UDP", palette::RED, udp)] {
        let run = log.run(0);
        if run.is_empty() {
            warn!("no throughput samples for {}", protocol);
            continue;
        }
        chart.series(Series::new(
            format!("{} throughput", protocol),
            *colour,
            &THREADS,
            run,
        ));
    }

    chart
}

fn base_chart(config: &Config) -> LineChart {
    let mut chart = LineChart::new();
    chart
        .caption(config.caption())
        .x_desc("Threads")
        .size(config.size());
    chart
}

/// JSON document for a network report, one log per protocol.
#[derive(Serialize)]
pub struct NetworkSamples<'a> {
    pub tcp: &'a BenchLog,
    pub udp: &'a BenchLog,
}

pub fn write_json<T: Serialize>(path: &str, samples: &T) -> Result<()> {
    let file = File::create(path).map_err(|source| Error::Io {
        path: path.into(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, samples)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{parse, Benchmark};

    fn disk_log(runs: usize) -> BenchLog {
        let mut input = String::new();
        for run in 0..runs {
            input.push_str(&format!("run {}\n", run));
            for record in 0..4 {
                input.push_str("Elapsed time: 10 ms\n");
                input.push_str(&format!("Throughput: {}.5 MB/s\n", run * 10 + record));
                if run == 0 {
                    input.push_str("1B Lantecy: 3 ms\n");
                }
            }
        }
        parse(input.as_bytes(), Benchmark::Disk).unwrap()
    }

    #[test]
    fn scale_by_threads() {
        assert_eq!(scaled_latency(&[100, 50, 30, 20]), vec![100, 100, 120, 160]);
        assert_eq!(scaled_latency(&[7, 7]), vec![7, 14]);
        assert_eq!(scaled_latency(&[1, 1, 1, 1, 1, 1]), vec![1, 2, 4, 8]);
        assert!(scaled_latency(&[]).is_empty());
    }

    #[test]
    fn scale_saturates() {
        assert_eq!(
            scaled_latency(&[i64::MAX, i64::MAX, i64::MIN, i64::MAX / 4]),
            vec![i64::MAX, i64::MAX, i64::MIN, i64::MAX]
        );
    }

    #[test]
    fn one_series_per_block_size() {
        let config = Config::default();
        let chart = disk_chart(&config, &disk_log(4));
        let series = chart.all_series();

        assert_eq!(series.len(), 4);
        let labels: Vec<&str> = series.iter().map(|s| s.label()).collect();
        assert_eq!(
            labels,
            vec![
                "8B block size",
                "8KB block size",
                "8MB block size",
                "80MB block size"
            ]
        );
        assert_eq!(
            series[2].points(),
            &[(1, 20.5), (2, 21.5), (4, 22.5), (8, 23.5)]
        );
    }

    #[test]
    fn missing_runs_are_skipped() {
        let config = Config::default();
        let chart = disk_chart(&config, &disk_log(2));
        assert_eq!(chart.all_series().len(), 2);

        let empty = BenchLog::default();
        let chart = network_chart(&config, &empty, &disk_log(1));
        assert_eq!(chart.all_series().len(), 1);
        assert_eq!(chart.all_series()[0].label(), "UDP throughput");
    }

    #[test]
    fn network_json() {
        let log = disk_log(1);
        let samples = NetworkSamples {
            tcp: &log,
            udp: &BenchLog::default(),
        };
        let value = serde_json::to_value(&samples).unwrap();
        assert_eq!(value["tcp"]["latency"], serde_json::json!([3, 3, 3, 3]));
        assert_eq!(
            value["tcp"]["throughput"],
            serde_json::json!([0.5, 1.5, 2.5, 3.5])
        );
        assert_eq!(value["udp"]["throughput"], serde_json::json!([]));
    }
}
