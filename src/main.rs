use ams_admin::cli::{self, AppContext, Cli};
use ams_admin::config;
use ams_admin::errors::Result;
use clap::Parser;
use dotenvy::dotenv;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Parse the command line before touching the network
    let args = Cli::parse();

    match run(args).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("An error occurred: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Cli) -> Result<String> {
    // 4. Load the main application configuration
    let app_config = config::load_app_configuration()
        .inspect(|c| info!("Using backend at {}", c.api.base_url))
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;

    // 5. Build the client and restore the saved session
    let mut ctx = AppContext::connect(app_config)
        .await
        .inspect_err(|e| error!("Failed to initialize the console: {}", e))?;

    // 6. Run the command
    cli::run(&mut ctx, args.command).await
}
