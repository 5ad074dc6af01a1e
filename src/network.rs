// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use bench_plot::loader;
use bench_plot::report::{self, NetworkSamples};
use bench_plot::{Benchmark, Config};

use logger::{fatal, info, Logger};

fn main() {
    let config = Config::new(Benchmark::Network);

    Logger::new()
        .label("net_plot")
        .level(config.logging())
        .init()
        .expect("Failed to initialize logger");

    config.print();

    let (tcp_file, udp_file) = (&config.inputs()[0], &config.inputs()[1]);
    let tcp =
        loader::load_network(tcp_file).unwrap_or_else(|e| fatal!("{}: {}", tcp_file, e));
    let udp =
        loader::load_network(udp_file).unwrap_or_else(|e| fatal!("{}: {}", udp_file, e));

    println!("Latency TCP:");
    println!("{:?}", report::scaled_latency(tcp.latency()));

    println!("Throughput TCP:");
    println!("{:?}", tcp.throughput());

    println!("Latency UDP:");
    println!("{:?}", report::scaled_latency(udp.latency()));

    println!("Throughput UDP:");
    println!("{:?}", udp.throughput());

    if let Some(json) = config.json() {
        let samples = NetworkSamples {
            tcp: &tcp,
            udp: &udp,
        };
        report::write_json(&json, &samples).unwrap_or_else(|e| fatal!("{}", e));
        info!("samples written to {}", json);
    }

    let output = config.output();
    report::network_chart(&config, &tcp, &udp)
        .render(&output)
        .unwrap_or_else(|e| fatal!("failed to render {}: {}", output, e));
    info!("chart written to {}", output);
}
