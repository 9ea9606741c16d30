use clap::{Parser, Subcommand};
use nmdc::commands;
use nmdc::server::SearchParams;
use nmdc_client::EntityType;
use nmdc_core::config::Config;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nmdc", about = "Environment-aware search front end for the NMDC data portal")]
struct Cli {
    /// Config file (default: ~/.config/nmdc/config.toml, created if missing).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP search server.
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the canonical label for each raw environment term.
    Normalize {
        #[arg(required = true)]
        values: Vec<String>,
    },
    /// Run one portal search and print the JSON response.
    Search {
        /// `study` or `biosample`.
        #[arg(value_parser = parse_entity)]
        entity: EntityType,
        #[arg(long)]
        environment: Option<String>,
        #[arg(long)]
        omics_type: Option<String>,
        /// Send the environment value as typed.
        #[arg(long)]
        no_normalize: bool,
    },
}

fn parse_entity(raw: &str) -> Result<EntityType, String> {
    raw.parse().map_err(|e: nmdc_client::ClientError| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(if cli.debug { "debug" } else { "info" })
            }),
        )
        .init();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            tracing::warn!("could not load config, using defaults: {e:#}");
            Config::defaults()
        }),
    };

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            commands::serve(&config).await
        }
        Command::Normalize { values } => {
            let normalizer = commands::build_normalizer(&config)?;
            let terms = tokio::task::spawn_blocking(move || {
                commands::normalize_terms(&normalizer, &values)
            })
            .await??;
            for term in terms {
                println!("{}\t{}", term.raw, term.value);
            }
            Ok(())
        }
        Command::Search {
            entity,
            environment,
            omics_type,
            no_normalize,
        } => {
            let state = commands::build_state(&config)?;
            let params = SearchParams {
                environment,
                omics_type,
            };
            let response = commands::search(&state, entity, params, !no_normalize).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
    }
}
