//! MCP ServerHandler implementation for market data.
//!
//! Binds the operation catalog and dispatcher to the two MCP tool handlers:
//!
//! **CoinGecko**
//! - `get_crypto_price`: Current price, 24h change and market cap
//! - `get_top_coins`: Top coins by market cap
//! - `get_coin_details`: Detail for a single coin
//! - `get_ohlcv`: OHLC candles
//! - `get_trending`: Trending coins
//! - `search_coins`: Search by name or symbol
//!
//! **DefiLlama**
//! - `get_defi_protocols`: Top 50 protocols by TVL
//! - `get_protocol_tvl`: TVL history for one protocol
//! - `get_chains_tvl`: TVL per chain
//! - `get_defi_yields`: Top 50 yield pools
//! - `get_stablecoins`: Stablecoin supplies and prices

use std::sync::Arc;

use rmcp::model::{
    CallToolRequestParams, CallToolResult, Content, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler};

use market_data_client::{ClientConfig, ClientResult, MarketDataSource, RestMarketDataClient};

use crate::catalog::list_operations;
use crate::dispatch::{Dispatcher, InvocationResult};

/// Market data MCP server handler.
#[derive(Debug, Clone)]
pub struct MarketDataMcpServer {
    dispatcher: Dispatcher,
}

impl MarketDataMcpServer {
    /// Create a server backed by any upstream source.
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self {
            dispatcher: Dispatcher::new(source),
        }
    }

    /// Create a server talking to the configured public APIs.
    pub fn from_config(config: ClientConfig) -> ClientResult<Self> {
        let client = RestMarketDataClient::new(config)?;
        Ok(Self::new(Arc::new(client)))
    }

    /// Invoke a tool and marshal the outcome into a single text content block.
    ///
    /// Payloads are pretty-printed JSON; failures are `Error: <message>` with
    /// `is_error` set.
    pub async fn invoke_tool(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        match self.dispatcher.invoke(name, arguments).await {
            InvocationResult::Payload(payload) => match serde_json::to_string_pretty(&payload) {
                Ok(text) => CallToolResult::success(vec![Content::text(text)]),
                Err(e) => error_result(&format!("serialization failed: {e}")),
            },
            InvocationResult::Error(message) => error_result(&message),
        }
    }
}

fn error_result(message: &str) -> CallToolResult {
    CallToolResult::error(vec![Content::text(format!("Error: {message}"))])
}

impl ServerHandler for MarketDataMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "market-data-mcp".to_string(),
                title: Some("Crypto Market Data MCP Server".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: Some(
                    "MCP server exposing cryptocurrency prices, OHLC candles and DeFi TVL, \
                     yield and stablecoin data from CoinGecko and DefiLlama"
                        .to_string(),
                ),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Read-only cryptocurrency market data. Every tool performs one live request \
                 against a public API; nothing is cached.\n\
                 Coins are addressed by CoinGecko ID (e.g. 'bitcoin', not 'BTC'): use \
                 search_coins to find an ID, then get_crypto_price, get_coin_details or get_ohlcv.\n\
                 Market overview: get_top_coins, get_trending.\n\
                 DeFi: get_defi_protocols (top 50 by TVL) → get_protocol_tvl with a protocol slug; \
                 get_chains_tvl, get_defi_yields (top 50 pools), get_stablecoins."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        let tools = list_operations().iter().map(|op| op.to_tool()).collect();
        Ok(ListToolsResult::with_all_items(tools))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = %request.name, "tools/call");
        Ok(self.invoke_tool(&request.name, request.arguments).await)
    }
}
