//! Source localization experiment on a square lattice
//!
//! Runs repeated SI epidemics, observes each one partially and reports how
//! well every centrality measure ranks the unobserved infected nodes.
//! The report goes to stdout; logs go to stderr (`RUST_LOG` to adjust).

use epiloc::experiment::{default_measures, run_experiment, ExperimentConfig, ExperimentReport};
use epiloc::telemetry::{init_logging, LogFormat};
use epiloc::AdjacencyGraph;
use serde::Serialize;
use std::time::Instant;

#[derive(Debug, Serialize)]
struct ReportDocument {
    generated_at: String,
    elapsed_ms: u128,
    lattice_side: usize,
    report: ExperimentReport,
}

/// `side x side` grid, nodes numbered row by row
fn lattice(side: usize) -> AdjacencyGraph<usize> {
    let mut graph = AdjacencyGraph::new();
    for row in 0..side {
        for col in 0..side {
            let id = row * side + col;
            graph.add_node(id);
            if col + 1 < side {
                graph.add_edge(id, id + 1);
            }
            if row + 1 < side {
                graph.add_edge(id, id + side);
            }
        }
    }
    graph
}

fn print_usage() {
    println!("Usage: localization_experiment [OPTIONS]");
    println!();
    println!("Options:");
    println!("      --side NUM        Lattice side length (default: 20)");
    println!("      --trials NUM      Number of trials (default: 100)");
    println!("      --beta P          Transmission probability (default: 0.1)");
    println!("      --seeds NUM       Initially infected nodes (default: 1)");
    println!("      --frac F          Max infected fraction (default: 0.2)");
    println!("      --iterations NUM  Max rounds (default: unbounded)");
    println!("      --observe P       Observation probability (default: 0.5)");
    println!("      --seed NUM        Random seed (default: 42)");
    println!("      --json            Print the report as JSON");
    println!("  -h, --help            Show this help");
}

struct Options {
    config: ExperimentConfig,
    side: usize,
    json: bool,
    help: bool,
}

/// Parse flags after the program name. A value that fails to parse leaves
/// the current setting in place.
fn parse_args(args: &[String]) -> Options {
    let mut options = Options {
        config: ExperimentConfig::default(),
        side: 20,
        json: false,
        help: false,
    };
    let config = &mut options.config;

    let mut i = 0;
    while i < args.len() {
        let value = args.get(i + 1).map(String::as_str);
        match (args[i].as_str(), value) {
            ("--side", Some(v)) => {
                options.side = v.parse().unwrap_or(options.side);
                i += 1;
            }
            ("--trials", Some(v)) => {
                config.trials = v.parse().unwrap_or(config.trials);
                i += 1;
            }
            ("--beta", Some(v)) => {
                config.simulation.beta = v.parse().unwrap_or(config.simulation.beta);
                i += 1;
            }
            ("--seeds", Some(v)) => {
                config.simulation.initial_infected =
                    v.parse().unwrap_or(config.simulation.initial_infected);
                i += 1;
            }
            ("--frac", Some(v)) => {
                config.simulation.max_infected_frac = v
                    .parse()
                    .map(Some)
                    .unwrap_or(config.simulation.max_infected_frac);
                i += 1;
            }
            ("--iterations", Some(v)) => {
                config.simulation.max_iterations = v
                    .parse()
                    .map(Some)
                    .unwrap_or(config.simulation.max_iterations);
                i += 1;
            }
            ("--observe", Some(v)) => {
                config.observation_probability = v.parse().unwrap_or(config.observation_probability);
                i += 1;
            }
            ("--seed", Some(v)) => {
                config.seed = v.parse().unwrap_or(config.seed);
                i += 1;
            }
            ("--json", _) => options.json = true,
            ("--help", _) | ("-h", _) => options.help = true,
            (other, _) => eprintln!("Ignoring unknown argument: {}", other),
        }
        i += 1;
    }
    options
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Options {
        config,
        side,
        json,
        help,
    } = parse_args(&args);
    if help {
        print_usage();
        return;
    }

    init_logging(if json { LogFormat::Json } else { LogFormat::Pretty });

    let graph = lattice(side);
    let measures = default_measures();

    let start = Instant::now();
    let report = match run_experiment(&graph, &config, &measures) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Experiment failed: {}", e);
            std::process::exit(1);
        }
    };
    let elapsed_ms = start.elapsed().as_millis();

    if json {
        let document = ReportDocument {
            generated_at: chrono::Utc::now().to_rfc3339(),
            elapsed_ms,
            lattice_side: side,
            report,
        };
        match serde_json::to_string_pretty(&document) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Failed to serialize report: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        println!("{}", report);
        println!("Time:                 {} ms", elapsed_ms);
    }
}
