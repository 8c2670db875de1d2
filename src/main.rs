use clap::Parser;
use log::error;

mod analyze;
mod cli;
mod csv;
mod errors;
mod listing;
mod scrape;
mod search;
mod text;


fn main() {
    // All diagnostics go to stderr; the report file stays clean.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = cli::Cli::parse();

    let result = match &cli.command {
        cli::Command::Analyze(args) => analyze::run(args),
        cli::Command::Scrape(args) => scrape::run(args),
        cli::Command::Search(args) => search::run(args),
    };

    if let Err(e) = result {
        error!("{e}");
        std::process::exit(e.exit_code());
    }
}
