use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{arg, command, Parser, Subcommand};
use service_commons::eventlogger::{EventLogger, EventRequest};
use service_commons::security::ServiceClient;
use service_commons::server;
use service_commons::utils::config_loader;
use service_commons::utils::logging::{self, LogLevel};
use service_commons::ServiceConfig;
use tracing::{error, info};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "commons-agent.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Keep the system token refreshed and serve the http endpoints (default)
    Run,
    /// Request a system token once and print its metadata
    Token,
    /// Send one event read from a JSON file and wait for delivery
    Event {
        #[arg(long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Read args, load YAML config, init logging
    // -------------------------------

    let args = Args::parse();
    let service_config = config_loader::run(&args.config).await?;
    logging::run(&service_config, args.log_level).await?;

    // -------------------------------
    // 2. Create token-aware client
    // -------------------------------

    let service_client = ServiceClient::from_config(&service_config)?;

    match args.command.unwrap_or(Command::Run) {
        Command::Run => run(service_config, service_client).await,
        Command::Token => print_token(service_client).await,
        Command::Event { file } => send_event(service_config, service_client, file).await,
    }
}

async fn run(service_config: ServiceConfig, service_client: ServiceClient) -> Result<()> {
    // -------------------------------
    // 3. Start scheduled token refresh
    // -------------------------------

    let refresher = service_client
        .token_cache()
        .loop_refresh_token(service_config.oauth.refresh_interval_minutes);

    // -------------------------------
    // 4. Start http server (metrics + on-demand refresh)
    // -------------------------------

    let http_server = server::server::start(&service_config.settings, service_client);

    info!("Service starting...");
    tokio::select! {
        result = http_server => {
            if let Err(e) = &result {
                error!("http server failed: {:#}", e);
            }
            result?;
            // no server configured: keep refreshing until interrupted
            tokio::signal::ctrl_c().await?;
        }
        signal = tokio::signal::ctrl_c() => signal?,
    }

    info!("Service stopping...");
    refresher.abort();
    Ok(())
}

async fn print_token(service_client: ServiceClient) -> Result<()> {
    let token = service_client.token_cache().get_token().await?;
    println!(
        "token_type={} expires_in={} scope={} company={} jti={}",
        token.token_type, token.expires_in, token.scope, token.company, token.jti
    );
    Ok(())
}

async fn send_event(service_config: ServiceConfig, service_client: ServiceClient, file: PathBuf) -> Result<()> {
    let event_logger_config = service_config
        .event_logger
        .as_ref()
        .ok_or_else(|| anyhow!("event_logger section missing in config"))?;

    let content = tokio::fs::read_to_string(&file)
        .await
        .with_context(|| format!("reading event file {}", file.display()))?;
    let event: EventRequest = serde_json::from_str(&content).context("parsing event file")?;

    let (event_logger, worker) = EventLogger::start(service_client, event_logger_config).await;
    event_logger.send_event(event);
    event_logger.shutdown(worker).await;
    Ok(())
}
