//! Static operation catalog.
//!
//! The catalog is the single source of truth for tool names, descriptions and
//! argument schemas. Its order is the order `tools/list` reports.

use std::sync::{Arc, LazyLock};

use rmcp::model::{JsonObject, Tool};
use schemars::JsonSchema;

use crate::tools::*;

/// Every operation the server exposes, one per upstream call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    CryptoPrice,
    TopCoins,
    CoinDetails,
    Ohlcv,
    Trending,
    SearchCoins,
    DefiProtocols,
    ProtocolTvl,
    ChainsTvl,
    DefiYields,
    Stablecoins,
}

impl OperationKind {
    /// Declaration order of the catalog.
    pub const ALL: [OperationKind; 11] = [
        Self::CryptoPrice,
        Self::TopCoins,
        Self::CoinDetails,
        Self::Ohlcv,
        Self::Trending,
        Self::SearchCoins,
        Self::DefiProtocols,
        Self::ProtocolTvl,
        Self::ChainsTvl,
        Self::DefiYields,
        Self::Stablecoins,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::CryptoPrice => "get_crypto_price",
            Self::TopCoins => "get_top_coins",
            Self::CoinDetails => "get_coin_details",
            Self::Ohlcv => "get_ohlcv",
            Self::Trending => "get_trending",
            Self::SearchCoins => "search_coins",
            Self::DefiProtocols => "get_defi_protocols",
            Self::ProtocolTvl => "get_protocol_tvl",
            Self::ChainsTvl => "get_chains_tvl",
            Self::DefiYields => "get_defi_yields",
            Self::Stablecoins => "get_stablecoins",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::CryptoPrice => {
                "Get current price for one or more cryptocurrencies (comma-separated IDs like 'bitcoin,ethereum')"
            }
            Self::TopCoins => "Get top cryptocurrencies by market cap",
            Self::CoinDetails => "Get detailed information about a specific cryptocurrency",
            Self::Ohlcv => "Get OHLCV (Open, High, Low, Close, Volume) candlestick data",
            Self::Trending => "Get trending cryptocurrencies on CoinGecko",
            Self::SearchCoins => "Search for cryptocurrencies by name or symbol",
            Self::DefiProtocols => "Get list of DeFi protocols with TVL from DeFiLlama",
            Self::ProtocolTvl => "Get TVL history and details for a specific DeFi protocol",
            Self::ChainsTvl => "Get TVL for all blockchain networks",
            Self::DefiYields => "Get DeFi yield farming opportunities from DeFiLlama",
            Self::Stablecoins => "Get stablecoin market data and supplies",
        }
    }

    /// Look up an operation by its tool name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    fn input_schema(self) -> Arc<JsonObject> {
        match self {
            Self::CryptoPrice => schema_for::<CryptoPriceParams>(),
            Self::TopCoins => schema_for::<TopCoinsParams>(),
            Self::CoinDetails => schema_for::<CoinDetailsParams>(),
            Self::Ohlcv => schema_for::<OhlcvParams>(),
            Self::SearchCoins => schema_for::<SearchCoinsParams>(),
            Self::ProtocolTvl => schema_for::<ProtocolTvlParams>(),
            Self::Trending
            | Self::DefiProtocols
            | Self::ChainsTvl
            | Self::DefiYields
            | Self::Stablecoins => schema_for::<NoParams>(),
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Catalog entry: a callable tool and its argument contract.
#[derive(Debug, Clone)]
pub struct OperationDescriptor {
    pub kind: OperationKind,
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Arc<JsonObject>,
}

impl OperationDescriptor {
    fn new(kind: OperationKind) -> Self {
        Self {
            kind,
            name: kind.name(),
            description: kind.description(),
            input_schema: kind.input_schema(),
        }
    }

    /// Argument names the schema marks as required.
    #[cfg(test)]
    pub fn required_arguments(&self) -> Vec<&str> {
        self.input_schema
            .get("required")
            .and_then(|r| r.as_array())
            .map(|r| r.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default()
    }

    /// Convert into the MCP tool definition published by `tools/list`.
    pub fn to_tool(&self) -> Tool {
        Tool::new(self.name, self.description, self.input_schema.clone())
    }
}

static CATALOG: LazyLock<Vec<OperationDescriptor>> = LazyLock::new(|| {
    OperationKind::ALL
        .into_iter()
        .map(OperationDescriptor::new)
        .collect()
});

/// The full catalog in declaration order.
pub fn list_operations() -> &'static [OperationDescriptor] {
    &CATALOG
}

/// Generate the JSON schema object for a parameter struct.
fn schema_for<T: JsonSchema>() -> Arc<JsonObject> {
    let mut schema = match serde_json::to_value(schemars::schema_for!(T)) {
        Ok(serde_json::Value::Object(map)) => map,
        _ => JsonObject::new(),
    };
    // MCP clients expect a bare object schema
    schema.remove("$schema");
    schema.remove("title");
    schema.remove("description");
    if let Some(serde_json::Value::Object(properties)) = schema.get_mut("properties") {
        properties.values_mut().for_each(plain_property);
    }
    schema
        .entry("type")
        .or_insert_with(|| serde_json::Value::String("object".to_string()));
    schema
        .entry("properties")
        .or_insert_with(|| serde_json::Value::Object(JsonObject::new()));
    Arc::new(schema)
}

/// Publish optional fields by their JSON type alone: `["number", "null"]`
/// becomes `"number"` and Rust numeric formats are dropped.
fn plain_property(property: &mut serde_json::Value) {
    let Some(property) = property.as_object_mut() else {
        return;
    };
    let collapsed = match property.get("type") {
        Some(serde_json::Value::Array(types)) => {
            let mut concrete = types.iter().filter(|t| t.as_str() != Some("null"));
            match (concrete.next(), concrete.next()) {
                (Some(only), None) => Some(only.clone()),
                _ => None,
            }
        }
        _ => None,
    };
    if let Some(only) = collapsed {
        property.insert("type".to_string(), only);
    }
    property.remove("format");
}
