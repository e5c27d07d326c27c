//! sitecheck Entry Point

use clap::Parser;
use sitecheck::cli::{self, Cli};
use sitecheck::logging;
use tracing::error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init() {
        eprintln!("Failed to initialize logging: {}", e);
    }
    logging::install_panic_hook();

    let plan = match cli.plan() {
        Ok(plan) => plan,
        Err(e) => {
            error!(error = %format!("{:#}", e), "Configuration error");
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    };

    // 予期しない失敗（panic含む）もここで捕捉し、終了コードは変えない
    let passed = match cli::run_guarded(async move { cli::execute_to_stdout(&plan).await }).await
    {
        Ok(summary) => cli::all_counted_successful(&summary),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            false
        }
    };

    if cli.strict && !passed {
        std::process::exit(1);
    }
}
