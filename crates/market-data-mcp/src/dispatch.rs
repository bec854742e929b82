//! Tool dispatch: name + argument bag → typed operation → upstream fetch → result.
//!
//! Every failure (unknown tool, invalid arguments, transport error, non-2xx
//! status, malformed JSON) is converted into [`InvocationResult::Error`] here, so
//! the transport layer always answers with a well-formed tool result.

use std::sync::Arc;

use rmcp::model::JsonObject;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use market_data_client::{ClientError, Endpoint, MarketDataSource};

use crate::catalog::OperationKind;
use crate::tools::*;

/// Number of entries kept from the protocol and yield pool listings.
pub const LISTING_LIMIT: usize = 50;

/// Failures raised while resolving or executing an invocation.
#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: &'static str, reason: String },

    #[error("Unexpected response for {tool}: {reason}")]
    UnexpectedPayload { tool: &'static str, reason: String },

    #[error(transparent)]
    Upstream(#[from] ClientError),
}

/// Outcome of one invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum InvocationResult {
    Payload(Value),
    Error(String),
}

impl InvocationResult {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl From<Result<Value, InvocationError>> for InvocationResult {
    fn from(result: Result<Value, InvocationError>) -> Self {
        match result {
            Ok(payload) => Self::Payload(payload),
            Err(e) => Self::Error(e.to_string()),
        }
    }
}

/// A validated invocation, one variant per catalog entry.
#[derive(Debug, Clone)]
pub enum Operation {
    CryptoPrice(CryptoPriceParams),
    TopCoins(TopCoinsParams),
    CoinDetails(CoinDetailsParams),
    Ohlcv(OhlcvParams),
    Trending,
    SearchCoins(SearchCoinsParams),
    DefiProtocols,
    ProtocolTvl(ProtocolTvlParams),
    ChainsTvl,
    DefiYields,
    Stablecoins,
}

impl Operation {
    /// Resolve a tool name and validate its arguments.
    ///
    /// Missing or mistyped required fields are rejected; unrecognised extra
    /// fields are ignored. Absent arguments are treated as an empty object.
    pub fn parse(name: &str, arguments: Option<JsonObject>) -> Result<Self, InvocationError> {
        let kind = OperationKind::from_name(name)
            .ok_or_else(|| InvocationError::UnknownTool(name.to_string()))?;
        let args = Value::Object(arguments.unwrap_or_default());

        Ok(match kind {
            OperationKind::CryptoPrice => Self::CryptoPrice(parse_args(kind, args)?),
            OperationKind::TopCoins => Self::TopCoins(parse_args(kind, args)?),
            OperationKind::CoinDetails => Self::CoinDetails(parse_args(kind, args)?),
            OperationKind::Ohlcv => Self::Ohlcv(parse_args(kind, args)?),
            OperationKind::Trending => Self::Trending,
            OperationKind::SearchCoins => Self::SearchCoins(parse_args(kind, args)?),
            OperationKind::DefiProtocols => Self::DefiProtocols,
            OperationKind::ProtocolTvl => Self::ProtocolTvl(parse_args(kind, args)?),
            OperationKind::ChainsTvl => Self::ChainsTvl,
            OperationKind::DefiYields => Self::DefiYields,
            OperationKind::Stablecoins => Self::Stablecoins,
        })
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Self::CryptoPrice(_) => OperationKind::CryptoPrice,
            Self::TopCoins(_) => OperationKind::TopCoins,
            Self::CoinDetails(_) => OperationKind::CoinDetails,
            Self::Ohlcv(_) => OperationKind::Ohlcv,
            Self::Trending => OperationKind::Trending,
            Self::SearchCoins(_) => OperationKind::SearchCoins,
            Self::DefiProtocols => OperationKind::DefiProtocols,
            Self::ProtocolTvl(_) => OperationKind::ProtocolTvl,
            Self::ChainsTvl => OperationKind::ChainsTvl,
            Self::DefiYields => OperationKind::DefiYields,
            Self::Stablecoins => OperationKind::Stablecoins,
        }
    }

    /// The upstream call this operation maps to, with defaults applied.
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::CryptoPrice(p) => Endpoint::SimplePrice {
                ids: p.ids.clone(),
                currencies: p.currencies().to_string(),
            },
            Self::TopCoins(p) => Endpoint::CoinMarkets {
                per_page: p.per_page(),
            },
            Self::CoinDetails(p) => Endpoint::CoinDetail { id: p.id.clone() },
            Self::Ohlcv(p) => Endpoint::CoinOhlc {
                id: p.id.clone(),
                days: p.days(),
            },
            Self::Trending => Endpoint::Trending,
            Self::SearchCoins(p) => Endpoint::Search {
                query: p.query.clone(),
            },
            Self::DefiProtocols => Endpoint::Protocols,
            Self::ProtocolTvl(p) => Endpoint::Protocol {
                slug: p.protocol.clone(),
            },
            Self::ChainsTvl => Endpoint::Chains,
            Self::DefiYields => Endpoint::Pools,
            Self::Stablecoins => Endpoint::Stablecoins,
        }
    }

    /// Post-fetch shaping. Only the protocol and yield listings are trimmed.
    fn shape(&self, payload: Value) -> Result<Value, InvocationError> {
        match self {
            Self::DefiProtocols => top_protocols(payload),
            Self::DefiYields => Ok(top_pools(payload)),
            _ => Ok(payload),
        }
    }
}

fn parse_args<T: DeserializeOwned>(kind: OperationKind, args: Value) -> Result<T, InvocationError> {
    serde_json::from_value(args).map_err(|e| InvocationError::InvalidArguments {
        tool: kind.name(),
        reason: e.to_string(),
    })
}

/// First [`LISTING_LIMIT`] protocols in upstream order (TVL descending).
/// Anything other than a list is an upstream failure.
fn top_protocols(payload: Value) -> Result<Value, InvocationError> {
    match payload {
        Value::Array(mut protocols) => {
            protocols.truncate(LISTING_LIMIT);
            Ok(Value::Array(protocols))
        }
        other => Err(InvocationError::UnexpectedPayload {
            tool: OperationKind::DefiProtocols.name(),
            reason: format!("expected a list of protocols, got {other}"),
        }),
    }
}

/// First [`LISTING_LIMIT`] yield pools. The `/pools` body is normally
/// `{"status": ..., "data": [...]}`, occasionally a bare list; any other body
/// passes through untouched.
fn top_pools(payload: Value) -> Value {
    match payload {
        Value::Array(mut pools) => {
            pools.truncate(LISTING_LIMIT);
            Value::Array(pools)
        }
        Value::Object(mut body) => {
            if let Some(Value::Array(pools)) = body.get_mut("data") {
                let mut pools = std::mem::take(pools);
                pools.truncate(LISTING_LIMIT);
                return Value::Array(pools);
            }
            Value::Object(body)
        }
        other => other,
    }
}

/// Executes invocations against a [`MarketDataSource`].
#[derive(Debug, Clone)]
pub struct Dispatcher {
    source: Arc<dyn MarketDataSource>,
}

impl Dispatcher {
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self { source }
    }

    /// Run one invocation. Never fails: errors come back as [`InvocationResult::Error`].
    pub async fn invoke(&self, name: &str, arguments: Option<JsonObject>) -> InvocationResult {
        let result = self.try_invoke(name, arguments).await;
        if let Err(e) = &result {
            let transient = matches!(e, InvocationError::Upstream(c) if c.is_transient());
            warn!(tool = name, error = %e, transient, "Tool invocation failed");
        }
        result.into()
    }

    /// Run a validated operation: exactly one upstream request.
    pub async fn execute(&self, operation: &Operation) -> Result<Value, InvocationError> {
        let endpoint = operation.endpoint();
        debug!(tool = %operation.kind(), ?endpoint, "Dispatching tool call");
        let payload = self.source.fetch(&endpoint).await?;
        operation.shape(payload)
    }

    async fn try_invoke(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<Value, InvocationError> {
        let operation = Operation::parse(name, arguments)?;
        self.execute(&operation).await
    }
}
