//! Market Data MCP Server
//!
//! Model Context Protocol server exposing cryptocurrency market data
//! (CoinGecko) and DeFi metrics (DefiLlama) to LLM agents over stdio.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use rmcp::ServiceExt;
use tracing_subscriber::EnvFilter;

use market_data_client::{ClientConfig, ClientConfigOverrides};
use market_data_mcp::server::MarketDataMcpServer;

/// Serve CoinGecko and DefiLlama market data as MCP tools over stdio.
#[derive(Debug, Parser)]
#[command(name = "market-data-mcp", version, about)]
struct Cli {
    /// TOML config file (defaults to ./.market-data-mcp.toml or ~/.config/market-data-mcp.toml)
    #[arg(long, env = "MARKET_DATA_MCP_CONFIG")]
    config: Option<PathBuf>,

    /// CoinGecko API origin
    #[arg(long, env = "MARKET_DATA_COINGECKO_URL")]
    coingecko_url: Option<String>,

    /// DefiLlama API origin
    #[arg(long, env = "MARKET_DATA_DEFILLAMA_URL")]
    defillama_url: Option<String>,

    /// DefiLlama stablecoins API origin
    #[arg(long, env = "MARKET_DATA_STABLECOINS_URL")]
    stablecoins_url: Option<String>,

    /// Upstream request timeout in seconds
    #[arg(long, env = "MARKET_DATA_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,
}

impl Cli {
    fn overrides(&self) -> ClientConfigOverrides {
        ClientConfigOverrides {
            coingecko_url: self.coingecko_url.clone(),
            defillama_url: self.defillama_url.clone(),
            stablecoins_url: self.stablecoins_url.clone(),
            timeout_secs: self.timeout_secs,
            user_agent: None,
        }
    }

    /// Defaults, then the config file, then flags and environment.
    fn resolve_config(&self) -> anyhow::Result<ClientConfig> {
        let mut config = ClientConfig::load(self.config.as_deref())
            .context("failed to load config file")?;
        config.apply(self.overrides());
        Ok(config)
    }
}

fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive("market_data_mcp=info".parse()?)
        .add_directive("market_data_client=info".parse()?);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{e}"))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.resolve_config()?;
    tracing::info!(
        coingecko = %config.coingecko_url,
        defillama = %config.defillama_url,
        stablecoins = %config.stablecoins_url,
        timeout_secs = config.timeout_secs,
        "market-data-mcp starting (stdio transport)"
    );

    let server = MarketDataMcpServer::from_config(config).context("invalid client configuration")?;
    let transport = rmcp::transport::io::stdio();

    let service = server
        .serve(transport)
        .await
        .context("failed to start MCP stdio transport")?;
    service.waiting().await?;

    tracing::info!("market-data-mcp stopped");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing() {
        eprintln!("market-data-mcp: failed to initialise logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("market-data-mcp failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}
