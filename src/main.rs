use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cr_iterate::cli::Cli;
use cr_iterate::config::Config;
use cr_iterate::github::GitHubApi;
use cr_iterate::orchestrator::{Orchestrator, Outcome};

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let config = match Config::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("::error::{e}");
            std::process::exit(1);
        }
    };

    info!(?config, "config loaded");

    let api = GitHubApi::new(&config.token);
    let orchestrator = Orchestrator::new(api, config);

    match orchestrator.run() {
        Ok(Outcome::Changed(fixes)) => info!(count = fixes.len(), "applied fixes"),
        Ok(outcome) => info!(?outcome, "finished"),
        Err(e) => {
            eprintln!("::error::{e}");
            std::process::exit(1);
        }
    }
}
