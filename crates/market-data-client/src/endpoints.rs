//! Upstream endpoints and URL construction.
//!
//! Each [`Endpoint`] variant is one upstream GET. Arguments are already
//! defaulted and clamped by the caller; this module only places them into the
//! path and query string of the configured origin.

use url::Url;

use crate::config::{parse_origin, ClientConfig};
use crate::error::ClientResult;

/// The upstream API an endpoint belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    CoinGecko,
    DefiLlama,
    Stablecoins,
}

impl Upstream {
    /// Configured origin for this upstream.
    pub fn origin<'a>(&self, config: &'a ClientConfig) -> &'a str {
        match self {
            Self::CoinGecko => &config.coingecko_url,
            Self::DefiLlama => &config.defillama_url,
            Self::Stablecoins => &config.stablecoins_url,
        }
    }
}

impl std::fmt::Display for Upstream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CoinGecko => write!(f, "coingecko"),
            Self::DefiLlama => write!(f, "defillama"),
            Self::Stablecoins => write!(f, "stablecoins"),
        }
    }
}

/// A single upstream GET with its substituted arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `/simple/price` with 24h change and market cap.
    SimplePrice { ids: String, currencies: String },
    /// `/coins/markets` ordered by market cap, USD.
    CoinMarkets { per_page: u32 },
    /// `/coins/{id}` without localization, tickers, community or developer data.
    CoinDetail { id: String },
    /// `/coins/{id}/ohlc` in USD.
    CoinOhlc { id: String, days: u32 },
    Trending,
    Search { query: String },
    Protocols,
    Protocol { slug: String },
    Chains,
    Pools,
    Stablecoins,
}

impl Endpoint {
    pub fn upstream(&self) -> Upstream {
        match self {
            Self::SimplePrice { .. }
            | Self::CoinMarkets { .. }
            | Self::CoinDetail { .. }
            | Self::CoinOhlc { .. }
            | Self::Trending
            | Self::Search { .. } => Upstream::CoinGecko,
            Self::Protocols | Self::Protocol { .. } | Self::Chains | Self::Pools => {
                Upstream::DefiLlama
            }
            Self::Stablecoins => Upstream::Stablecoins,
        }
    }

    /// Build the full request URL against the configured origins.
    pub fn url(&self, config: &ClientConfig) -> ClientResult<Url> {
        let mut url = parse_origin(self.upstream().origin(config))?;
        let per_page;
        let days;

        let (segments, query): (Vec<&str>, Vec<(&str, &str)>) = match self {
            Self::SimplePrice { ids, currencies } => (
                vec!["simple", "price"],
                vec![
                    ("ids", ids.as_str()),
                    ("vs_currencies", currencies.as_str()),
                    ("include_24hr_change", "true"),
                    ("include_market_cap", "true"),
                ],
            ),
            Self::CoinMarkets { per_page: n } => {
                per_page = n.to_string();
                (
                    vec!["coins", "markets"],
                    vec![
                        ("vs_currency", "usd"),
                        ("order", "market_cap_desc"),
                        ("per_page", per_page.as_str()),
                        ("sparkline", "false"),
                    ],
                )
            }
            Self::CoinDetail { id } => (
                vec!["coins", id.as_str()],
                vec![
                    ("localization", "false"),
                    ("tickers", "false"),
                    ("community_data", "false"),
                    ("developer_data", "false"),
                ],
            ),
            Self::CoinOhlc { id, days: n } => {
                days = n.to_string();
                (
                    vec!["coins", id.as_str(), "ohlc"],
                    vec![("vs_currency", "usd"), ("days", days.as_str())],
                )
            }
            Self::Trending => (vec!["search", "trending"], vec![]),
            Self::Search { query } => (vec!["search"], vec![("query", query.as_str())]),
            Self::Protocols => (vec!["protocols"], vec![]),
            Self::Protocol { slug } => (vec!["protocol", slug.as_str()], vec![]),
            Self::Chains => (vec!["v2", "chains"], vec![]),
            Self::Pools => (vec!["pools"], vec![]),
            Self::Stablecoins => (vec!["stablecoins"], vec![("includePrices", "true")]),
        };

        // parse_origin already rejected cannot-be-a-base URLs
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        Ok(url)
    }
}
