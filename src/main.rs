use std::process::ExitCode;

use adder_mlp::{Network, TrainConfig};

fn install_logger() {
    tracing_subscriber::fmt()
        .compact()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();
}

/// Reads the config from the JSON file named by the first argument, if any.
#[cfg(feature = "serde")]
fn load_config() -> adder_mlp::Result<TrainConfig> {
    match std::env::args_os().nth(1) {
        Some(path) => TrainConfig::load_json(path),
        None => Ok(TrainConfig::default()),
    }
}

#[cfg(not(feature = "serde"))]
fn load_config() -> adder_mlp::Result<TrainConfig> {
    Ok(TrainConfig::default())
}

fn print_matrix(values: &[f64], cols: usize) {
    if cols == 0 {
        return;
    }
    for row in values.chunks(cols) {
        let line: Vec<String> = row.iter().map(|v| format!("{v:.5}")).collect();
        println!("{}", line.join(", "));
    }
}

fn print_network(network: &Network) {
    print_matrix(network.w1(), network.hidden_dim());
    println!();
    print_matrix(network.b1(), 1);
    println!();
    print_matrix(network.w2(), network.output_dim());
    println!();
    print_matrix(network.b2(), 1);
    println!();
}

fn main() -> ExitCode {
    install_logger();

    let cfg = match load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match adder_mlp::run(&cfg) {
        Ok(report) => {
            print_network(&report.network);
            println!("Testing:");
            println!("{}", report.evaluation);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
