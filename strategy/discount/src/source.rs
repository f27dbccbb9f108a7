use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use clients_coinmarketcap::CoinMarketCapClient;

use crate::types::PriceQuote;

/// Current USD prices for a set of assets.
///
/// Ids the provider cannot price are simply absent from the returned map.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn get_quotes(&self, ids: &[&str]) -> Result<HashMap<String, PriceQuote>>;
}

#[async_trait]
impl PriceSource for CoinMarketCapClient {
    async fn get_quotes(&self, ids: &[&str]) -> Result<HashMap<String, PriceQuote>> {
        let prices = self.latest_usd_prices(ids).await?;
        Ok(prices
            .into_iter()
            .map(|(asset_id, price_usd)| {
                let quote = PriceQuote {
                    asset_id: asset_id.clone(),
                    price_usd,
                };
                (asset_id, quote)
            })
            .collect())
    }
}
