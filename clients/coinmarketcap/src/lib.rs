mod config;
mod quotes;
mod types;

pub use config::{CoinMarketCapClientConfig, DEFAULT_BASE_URL};
pub use quotes::CoinMarketCapClient;
pub use types::{AssetQuote, QuotesResponse, Status, UsdQuote};
