// SPDX-FileCopyrightText: 2026 Sapa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sapa binary: conversational query router for a school administration
//! backend.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use sapa_classifier::BayesClassifier;
use sapa_config::{load_and_validate, render_errors, SapaConfig};
use sapa_core::SapaError;
use sapa_gateway::serve;
use sapa_router::ConversationEngine;
use sapa_storage::seed::seed_demo_data;
use sapa_storage::Database;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sapa", version, about = "School assistant query router")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP gateway.
    Serve,
    /// Print the effective configuration and exit.
    Config,
    /// Populate the school tables with demo data for local evaluation.
    SeedDemo,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.agent.log_level);

    let result = match cli.command {
        Command::Serve => run_serve(&config).await,
        Command::Config => print_config(&config),
        Command::SeedDemo => run_seed(&config).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(log_level: &str) {
    let filter =
        EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run_serve(config: &SapaConfig) -> Result<(), SapaError> {
    let db = Database::open_with(&config.storage.database_path, config.storage.wal_mode).await?;
    let classifier = Arc::new(BayesClassifier::new(
        config.classifier.model_path.as_ref().map(PathBuf::from),
    ));
    let engine = Arc::new(ConversationEngine::new(db.clone(), classifier, config));

    info!(
        agent = %config.agent.name,
        db = %config.storage.database_path,
        "starting sapa"
    );

    tokio::select! {
        result = serve(&config.gateway, engine) => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    db.close().await
}

fn print_config(config: &SapaConfig) -> Result<(), SapaError> {
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| SapaError::Internal(format!("failed to render config: {e}")))?;
    println!("{rendered}");
    Ok(())
}

async fn run_seed(config: &SapaConfig) -> Result<(), SapaError> {
    let db = Database::open_with(&config.storage.database_path, config.storage.wal_mode).await?;
    seed_demo_data(&db).await?;
    db.close().await?;
    println!("demo data seeded into {}", config.storage.database_path);
    Ok(())
}
