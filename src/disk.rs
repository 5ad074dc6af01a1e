// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use bench_plot::loader;
use bench_plot::report;
use bench_plot::{Benchmark, Config};

use logger::{fatal, info, Logger};

fn main() {
    let config = Config::new(Benchmark::Disk);

    Logger::new()
        .label("disk_plot")
        .level(config.logging())
        .init()
        .expect("Failed to initialize logger");

    config.print();

    let input = &config.inputs()[0];
    let log = loader::load_disk(input).unwrap_or_else(|e| fatal!("{}: {}", input, e));

    println!("Latency:");
    println!("{:?}", log.latency());

    println!("Throughput:");
    println!("{:?}", log.throughput());

    if let Some(json) = config.json() {
        report::write_json(&json, &log).unwrap_or_else(|e| fatal!("{}", e));
        info!("samples written to {}", json);
    }

    let output = config.output();
    report::disk_chart(&config, &log)
        .render(&output)
        .unwrap_or_else(|e| fatal!("failed to render {}: {}", output, e));
    info!("chart written to {}", output);
}
