//! `sticky` - replay window layout scenarios with sticky regions.

use clap::Parser;
use sticky_windows::cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over -v flags
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    if let Err(err) = cli.execute() {
        eprintln!("sticky: {err}");
        std::process::exit(1);
    }
}
