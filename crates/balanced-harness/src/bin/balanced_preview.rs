#![forbid(unsafe_code)]

use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(error) = balanced_harness::preview::run_from_env() {
        eprintln!("{error}");
        std::process::exit(error.exit_code());
    }
}
