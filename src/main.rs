//! celnav - navigate JSON documents with paths and expressions
//!
//! # Usage
//!
//! ```bash
//! celnav get orders.json '_.items[0].name'
//! celnav complete orders.json '_.items[0].na'
//! celnav browse orders.json
//! ```

use celnav::cli::CliInterface;
use celnav::error::Result;

/// Application entry point
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// 1. Parse command-line arguments and load configuration
/// 2. Initialize logging
/// 3. Run the selected subcommand
fn run() -> Result<()> {
    let cli = CliInterface::new()?;
    initialize_logging(&cli);
    cli.run()
}

/// Initialize logging from the effective configuration.
///
/// `-v` / `--vv` are already folded into the configured level. Logs go to
/// stderr so they never mix with command output.
fn initialize_logging(cli: &CliInterface) {
    let logging = &cli.config().logging;

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(logging.level.to_tracing_level())
        .with_target(false)
        .with_writer(std::io::stderr);

    if logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
