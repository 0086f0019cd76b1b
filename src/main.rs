//! Churn predictor - Main Entry Point
//!
//! Data preparation, training, the prediction API and its client behind one
//! binary.

use churn_predictor::cli::{
    cmd_info, cmd_interactive, cmd_predict, cmd_prepare, cmd_serve, cmd_train, Cli, Commands,
};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "churn_predictor=info,tower_http=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Prepare { data, test_size, seed }) => {
            cmd_prepare(data, test_size, seed)?;
        }
        Some(Commands::Train { data, models_dir, max_iter, c, class_weight, scaler, test_size, seed }) => {
            cmd_train(data, models_dir, max_iter, c, &class_weight, &scaler, test_size, seed)?;
        }
        Some(Commands::Serve { port, host, model }) => {
            cmd_serve(host, port, model).await?;
        }
        Some(Commands::Predict { customer, url }) => {
            cmd_predict(customer, url).await?;
        }
        Some(Commands::Info { data }) => {
            cmd_info(data)?;
        }
        None => {
            cmd_interactive().await?;
        }
    }

    Ok(())
}
