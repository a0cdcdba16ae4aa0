mod cli;
mod config;
mod execute;
mod extract;
mod model;
mod patterns;
mod resolve;
mod stats;
mod storage;

use std::process;

use config::Config;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = cli::run(&config) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
