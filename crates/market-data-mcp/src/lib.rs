//! Market Data MCP Server library.
//!
//! Provides the [`server::MarketDataMcpServer`] MCP server handler, the static
//! operation catalog and the dispatcher that maps tool calls onto upstream
//! market data requests. Used by the `market-data-mcp` binary and available
//! for integration testing.

pub mod catalog;
pub mod dispatch;
pub mod server;
pub mod tools;
