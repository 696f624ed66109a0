mod config;
mod consumer;
mod relay;
mod scanner;
mod telemetry;
mod web;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use crate::config::Config;

#[derive(Parser)]
#[command(name = "arcscan")]
#[command(about = "Swept ultrasonic range scanner and telemetry relay")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a config file
    Validate { config: String },
    /// Run the host relay server and consumer loop
    Serve { config: String },
    /// Run the scan controller loop
    Scan { config: String },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config } => validate(&config),
        Commands::Serve { config } => serve(&config),
        Commands::Scan { config } => scan(&config),
    }
}

fn load(path: &str) -> Option<Config> {
    match Config::from_file(path) {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("Config error: {}", e);
            None
        }
    }
}

fn validate(path: &str) -> ExitCode {
    let Some(config) = load(path) else {
        return ExitCode::FAILURE;
    };

    let sweep = &config.scanner.sweep;
    println!("Config is valid");
    println!(
        "  sweep: {}° to {}° step {}° ({})",
        sweep.start_deg, sweep.end_deg, sweep.step_deg, sweep.policy
    );
    println!("  relay host: {}", config.relay.host);
    println!("  web bind: {}", config.web.bind);
    ExitCode::SUCCESS
}

fn serve(path: &str) -> ExitCode {
    let Some(config) = load(path) else {
        return ExitCode::FAILURE;
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Runtime error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(web::run_server(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn scan(path: &str) -> ExitCode {
    let Some(config) = load(path) else {
        return ExitCode::FAILURE;
    };

    match scanner::run_scanner(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Scan error: {}", e);
            ExitCode::FAILURE
        }
    }
}
