//! Ask command - runs one query through the pipeline

use clap::Args;
use tracing::warn;

use crate::config::AppConfig;
use crate::infrastructure::logging::init_cli_logging;

#[derive(Debug, Args)]
pub struct AskArgs {
    /// Free-text insurance query
    pub query: String,
}

/// Adjudicate `args.query` and print the decision as pretty JSON on stdout
pub async fn run(args: AskArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let (config, load_error) = AppConfig::load_or_default();
    init_cli_logging(&config.logging);
    if let Some(e) = load_error {
        warn!(error = %e, "Failed to load configuration, using defaults");
    }

    if args.query.trim().is_empty() {
        anyhow::bail!("query must not be blank");
    }

    let pipeline = crate::create_pipeline(&config).await?;
    let result = pipeline.handle(&args.query).await?;

    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
