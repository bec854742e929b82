//! # Market Data Client
//!
//! Thin HTTP client for the public market data APIs behind the MCP server:
//!
//! - **CoinGecko**: prices, market listings, coin detail, OHLC candles,
//!   trending coins and search.
//! - **DefiLlama**: protocol listing, per-protocol TVL, per-chain TVL and
//!   yield pools.
//! - **DefiLlama stablecoins**: stablecoin supplies with prices.
//!
//! Every call is a single unauthenticated GET. There is no caching and no retry;
//! failures surface as [`ClientError`] values.

pub mod config;
pub mod endpoints;
pub mod error;
pub mod transport;

pub use config::{ClientConfig, ClientConfigOverrides};
pub use endpoints::{Endpoint, Upstream};
pub use error::{ClientError, ClientResult};
pub use transport::{MarketDataSource, RestMarketDataClient};
