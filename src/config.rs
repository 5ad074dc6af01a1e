// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{Benchmark, Error, Result};

use clap::{App, Arg, ArgMatches};
use logger::{info, Level};
use serde_derive::Deserialize;

use std::ffi::OsString;
use std::process;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    general: General,
    #[serde(default)]
    chart: Chart,
    #[serde(skip)]
    benchmark: Benchmark,
    #[serde(skip)]
    inputs: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct General {
    #[serde(with = "LevelDef")]
    #[serde(default = "default_logging_level")]
    logging: Level,
}

impl Default for General {
    fn default() -> Self {
        Self {
            logging: default_logging_level(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Chart {
    output: Option<String>,
    #[serde(default = "default_width")]
    width: u32,
    #[serde(default = "default_height")]
    height: u32,
    caption: Option<String>,
    json: Option<String>,
}

impl Default for Chart {
    fn default() -> Self {
        Self {
            output: None,
            width: default_width(),
            height: default_height(),
            caption: None,
            json: None,
        }
    }
}

#[derive(Clone, Deserialize, Debug)]
#[serde(rename_all = "lowercase")]
#[serde(remote = "Level")]
#[serde(deny_unknown_fields)]
enum LevelDef {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

fn default_logging_level() -> Level {
    Level::Info
}

fn default_width() -> u32 {
    1080
}

fn default_height() -> u32 {
    720
}

fn app(benchmark: Benchmark) -> App<'static, 'static> {
    let app = match benchmark {
        Benchmark::Disk => App::new("disk-plot")
            .about("Plot disk benchmark throughput by block size")
            .arg(
                Arg::with_name("input")
                    .value_name("INPUT")
                    .help("disk benchmark log")
                    .required(true)
                    .index(1),
            ),
        Benchmark::Network => App::new("net-plot")
            .about("Plot TCP and UDP benchmark throughput")
            .arg(
                Arg::with_name("tcp")
                    .value_name("TCP")
                    .help("TCP benchmark log")
                    .required(true)
                    .index(1),
            )
            .arg(
                Arg::with_name("udp")
                    .value_name("UDP")
                    .help("UDP benchmark log")
                    .required(true)
                    .index(2),
            ),
    };

    app.version(VERSION)
        .arg(
            Arg::with_name("config")
                .long("config")
                .value_name("FILE")
                .help("TOML config file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("output")
                .long("output")
                .value_name("FILE")
                .help("Write the chart to this SVG file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("json")
                .long("json")
                .value_name("FILE")
                .help("Also write the parsed samples as JSON")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("width")
                .long("width")
                .value_name("PIXELS")
                .help("Chart width")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("height")
                .long("height")
                .value_name("PIXELS")
                .help("Chart height")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Increase verbosity by one level. Can be used more than once")
                .multiple(true),
        )
}

impl Config {
    /// parse command line options and return `Config`
    pub fn new(benchmark: Benchmark) -> Config {
        let matches = app(benchmark).get_matches();
        Config::from_matches(benchmark, &matches).unwrap_or_else(|e| {
            println!("ERROR: {}", e);
            process::exit(1);
        })
    }

    /// like `new`, but from an explicit argument list, program name first
    pub fn from_args<I, T>(benchmark: Benchmark, args: I) -> Result<Config>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = app(benchmark)
            .get_matches_from_safe(args)
            .map_err(|e| Error::Config(e.to_string()))?;
        Config::from_matches(benchmark, &matches)
    }

    fn from_matches(benchmark: Benchmark, matches: &ArgMatches) -> Result<Config> {
        let mut config = if let Some(file) = matches.value_of("config") {
            Config::load_from_file(file)?
        } else {
            Default::default()
        };

        config.benchmark = benchmark;
        config.inputs = match benchmark {
            Benchmark::Disk => vec!["input"],
            Benchmark::Network => vec!["tcp", "udp"],
        }
        .into_iter()
        .filter_map(|name| matches.value_of(name))
        .map(|v| v.to_string())
        .collect();

        if let Some(output) = matches.value_of("output") {
            config.chart.output = Some(output.to_string());
        }

        if let Some(json) = matches.value_of("json") {
            config.chart.json = Some(json.to_string());
        }

        if let Some(width) = parse_numeric_arg(matches, "width")? {
            config.chart.width = width;
        }

        if let Some(height) = parse_numeric_arg(matches, "height")? {
            config.chart.height = height;
        }

        match matches.occurrences_of("verbose") {
            0 => {}
            1 => config.general.logging = Level::Debug,
            _ => config.general.logging = Level::Trace,
        }

        Ok(config)
    }

    fn load_from_file(file: &str) -> Result<Config> {
        let content = std::fs::read_to_string(file).map_err(|source| Error::Io {
            path: file.into(),
            source,
        })?;
        Config::from_toml(&content)
    }

    fn from_toml(content: &str) -> Result<Config> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn benchmark(&self) -> Benchmark {
        self.benchmark
    }

    /// log files named on the command line, in order
    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    /// get logging level
    pub fn logging(&self) -> Level {
        self.general.logging
    }

    /// chart file, defaulting to one named after the benchmark
    pub fn output(&self) -> String {
        self.chart
            .output
            .clone()
            .unwrap_or_else(|| format!("{}.svg", self.benchmark))
    }

    pub fn json(&self) -> Option<String> {
        self.chart.json.clone()
    }

    pub fn caption(&self) -> String {
        self.chart.caption.clone().unwrap_or_default()
    }

    pub fn size(&self) -> (u32, u32) {
        (self.chart.width, self.chart.height)
    }

    pub fn print(&self) {
        info!("-----");
        info!("Benchmark: {}", self.benchmark);
        for input in &self.inputs {
            info!("Config: Input: {}", input);
        }
        info!(
            "Config: Output: {} Size: {}x{}",
            self.output(),
            self.chart.width,
            self.chart.height
        );
        if let Some(json) = &self.chart.json {
            info!("Config: Samples: {}", json);
        }
        info!("-----");
    }
}

/// a helper function to parse a numeric argument by name from `ArgMatches`
fn parse_numeric_arg(matches: &ArgMatches, key: &str) -> Result<Option<u32>> {
    matches
        .value_of(key)
        .map(|v| {
            v.parse::<u32>()
                .map_err(|_| Error::Config(format!("could not parse {}: {}", key, v)))
        })
        .transpose()
}
