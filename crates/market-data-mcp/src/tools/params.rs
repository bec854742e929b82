//! Parameter structs for all MCP tools.

use schemars::JsonSchema;
use serde::Deserialize;

pub const DEFAULT_CURRENCY: &str = "usd";
pub const DEFAULT_TOP_COINS_LIMIT: u32 = 20;
pub const MAX_TOP_COINS_LIMIT: u32 = 100;
pub const DEFAULT_OHLCV_DAYS: u32 = 7;

/// Counts arrive as plain JSON numbers; the fraction is dropped and anything
/// below 1 counts as absent.
fn whole_count(value: Option<f64>) -> Option<u32> {
    value
        .map(f64::trunc)
        .filter(|n| *n >= 1.0)
        .map(|n| n as u32)
}

// ── get_crypto_price ──

/// Parameters for the `get_crypto_price` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CryptoPriceParams {
    /// Comma-separated CoinGecko coin IDs.
    #[schemars(description = "Coin IDs (e.g., 'bitcoin', 'ethereum,solana')")]
    pub ids: String,
    /// Comma-separated quote currencies (defaults to "usd").
    #[schemars(description = "Target currencies (default: 'usd')")]
    pub currencies: Option<String>,
}

impl CryptoPriceParams {
    /// Quote currencies, falling back to USD when absent or blank.
    pub fn currencies(&self) -> &str {
        match self.currencies.as_deref() {
            Some(c) if !c.trim().is_empty() => c,
            _ => DEFAULT_CURRENCY,
        }
    }
}

// ── get_top_coins ──

/// Parameters for the `get_top_coins` tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct TopCoinsParams {
    #[schemars(description = "Number of coins (default: 20, max: 100)")]
    pub limit: Option<f64>,
}

impl TopCoinsParams {
    /// Page size sent upstream: below 1 or absent means the default, capped at the maximum.
    pub fn per_page(&self) -> u32 {
        whole_count(self.limit).map_or(DEFAULT_TOP_COINS_LIMIT, |n| n.min(MAX_TOP_COINS_LIMIT))
    }
}

// ── get_coin_details ──

/// Parameters for the `get_coin_details` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CoinDetailsParams {
    #[schemars(description = "Coin ID (e.g., 'bitcoin')")]
    pub id: String,
}

// ── get_ohlcv ──

/// Parameters for the `get_ohlcv` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct OhlcvParams {
    #[schemars(description = "Coin ID (e.g., 'bitcoin')")]
    pub id: String,
    /// Candle range in days. CoinGecko accepts 1, 7, 14, 30, 90, 180 and 365.
    #[schemars(description = "Number of days (1, 7, 14, 30, 90, 180, 365)")]
    pub days: Option<f64>,
}

impl OhlcvParams {
    pub fn days(&self) -> u32 {
        whole_count(self.days).unwrap_or(DEFAULT_OHLCV_DAYS)
    }
}

// ── search_coins ──

/// Parameters for the `search_coins` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchCoinsParams {
    #[schemars(description = "Search query")]
    pub query: String,
}

// ── get_protocol_tvl ──

/// Parameters for the `get_protocol_tvl` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ProtocolTvlParams {
    #[schemars(description = "Protocol slug (e.g., 'aave', 'uniswap')")]
    pub protocol: String,
}

// ── argument-free tools ──

/// Parameters for tools that take no arguments
/// (`get_trending`, `get_defi_protocols`, `get_chains_tvl`, `get_defi_yields`,
/// `get_stablecoins`).
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct NoParams {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currencies_default() {
        let params: CryptoPriceParams = serde_json::from_str(r#"{"ids":"bitcoin"}"#).unwrap();
        assert_eq!(params.currencies(), "usd");

        let blank: CryptoPriceParams =
            serde_json::from_str(r#"{"ids":"bitcoin","currencies":""}"#).unwrap();
        assert_eq!(blank.currencies(), "usd");

        let eur: CryptoPriceParams =
            serde_json::from_str(r#"{"ids":"bitcoin","currencies":"eur"}"#).unwrap();
        assert_eq!(eur.currencies(), "eur");
    }

    #[test]
    fn test_top_coins_limit_defaults_and_clamps() {
        assert_eq!(TopCoinsParams { limit: None }.per_page(), 20);
        assert_eq!(TopCoinsParams { limit: Some(0.0) }.per_page(), 20);
        assert_eq!(TopCoinsParams { limit: Some(-3.0) }.per_page(), 20);
        assert_eq!(TopCoinsParams { limit: Some(5.0) }.per_page(), 5);
        assert_eq!(TopCoinsParams { limit: Some(100.0) }.per_page(), 100);
        assert_eq!(TopCoinsParams { limit: Some(500.0) }.per_page(), 100);
        assert_eq!(TopCoinsParams { limit: Some(1e12) }.per_page(), 100);
    }

    #[test]
    fn test_counts_accept_any_json_number() {
        let integer: TopCoinsParams = serde_json::from_str(r#"{"limit":10}"#).unwrap();
        assert_eq!(integer.per_page(), 10);
        let float: TopCoinsParams = serde_json::from_str(r#"{"limit":10.0}"#).unwrap();
        assert_eq!(float.per_page(), 10);
        let fraction: TopCoinsParams = serde_json::from_str(r#"{"limit":12.7}"#).unwrap();
        assert_eq!(fraction.per_page(), 12);
        let below_one: OhlcvParams =
            serde_json::from_str(r#"{"id":"bitcoin","days":0.5}"#).unwrap();
        assert_eq!(below_one.days(), 7);

        let text: Result<TopCoinsParams, _> = serde_json::from_str(r#"{"limit":"ten"}"#);
        assert!(text.is_err());
    }

    #[test]
    fn test_ohlcv_days_default() {
        let params: OhlcvParams = serde_json::from_str(r#"{"id":"bitcoin"}"#).unwrap();
        assert_eq!(params.days(), 7);
        let params: OhlcvParams = serde_json::from_str(r#"{"id":"bitcoin","days":90}"#).unwrap();
        assert_eq!(params.days(), 90);
        let params: OhlcvParams = serde_json::from_str(r#"{"id":"bitcoin","days":0}"#).unwrap();
        assert_eq!(params.days(), 7);
    }

    #[test]
    fn test_missing_required_field_rejected() {
        let result: Result<CoinDetailsParams, _> = serde_json::from_str("{}");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("missing field `id`"));
    }

    #[test]
    fn test_no_params_ignores_extra_fields() {
        let params: Result<NoParams, _> = serde_json::from_str(r#"{"verbose":true}"#);
        assert!(params.is_ok());
    }
}
