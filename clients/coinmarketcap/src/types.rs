use std::collections::HashMap;

use serde::Deserialize;

/// Envelope of the `v2/cryptocurrency/quotes/latest` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct QuotesResponse {
    pub status: Status,
    /// Keyed by the numeric CoinMarketCap id, as a string.
    #[serde(default)]
    pub data: Option<HashMap<String, AssetQuote>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub error_code: i64,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub credit_count: Option<u32>,
}

/// Latest market quote for one asset.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetQuote {
    pub id: u64,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub quote: HashMap<String, UsdQuote>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UsdQuote {
    pub price: Option<f64>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

impl AssetQuote {
    /// USD price, if the API reported a usable one.
    pub fn usd_price(&self) -> Option<f64> {
        self.quote
            .get("USD")
            .and_then(|q| q.price)
            .filter(|p| p.is_finite() && *p > 0.0)
    }
}
