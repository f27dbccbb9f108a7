use serde::{Deserialize, Serialize};

/// Default base URL of the CoinMarketCap Pro API.
pub const DEFAULT_BASE_URL: &str = "https://pro-api.coinmarketcap.com";

/// Configuration for CoinMarketCapClient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinMarketCapClientConfig {
    /// CoinMarketCap Pro API key
    pub api_key: String,
    /// Base URL for API endpoints
    pub base_url: String,
}
