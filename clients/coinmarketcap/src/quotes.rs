use std::collections::HashMap;

use anyhow::{anyhow, bail, Context, Result};
use tracing::{debug, warn};
use url::Url;

use crate::config::CoinMarketCapClientConfig;
use crate::types::QuotesResponse;

const QUOTES_LATEST_PATH: &str = "/v2/cryptocurrency/quotes/latest";

/// Client for the CoinMarketCap Pro quotes API.
pub struct CoinMarketCapClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl CoinMarketCapClient {
    pub fn new(client: reqwest::Client, config: CoinMarketCapClientConfig) -> Self {
        Self {
            client,
            api_key: config.api_key,
            base_url: config.base_url,
        }
    }

    /// Fetches the latest USD prices for the given CoinMarketCap ids in one call.
    ///
    /// Ids the API does not know, or reports without a positive price, are
    /// absent from the returned map.
    pub async fn latest_usd_prices(&self, ids: &[&str]) -> Result<HashMap<String, f64>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut url = Url::parse(&format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            QUOTES_LATEST_PATH
        ))
        .context("coinmarketcap: invalid base url")?;
        url.query_pairs_mut().append_pair("id", &ids.join(","));

        let resp = self
            .client
            .get(url)
            .header("X-CMC_PRO_API_KEY", &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .context("coinmarketcap: request failed")?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .context("coinmarketcap: read body failed")?;

        let prices = parse_quotes(&body, ids).map_err(|e| {
            warn!(http_status = %status, payload = %body, "coinmarketcap: unusable response");
            e
        })?;
        if !status.is_success() {
            bail!("coinmarketcap: non-success status {}", status);
        }
        Ok(prices)
    }
}

/// Extracts USD prices for `ids` from a raw quotes payload.
pub(crate) fn parse_quotes(body: &str, ids: &[&str]) -> Result<HashMap<String, f64>> {
    let parsed: QuotesResponse =
        serde_json::from_str(body).context("coinmarketcap: parse JSON failed")?;

    if parsed.status.error_code != 0 {
        return Err(anyhow!(
            "coinmarketcap: API error {}: {}",
            parsed.status.error_code,
            parsed
                .status
                .error_message
                .as_deref()
                .unwrap_or("unknown error")
        ));
    }

    let data = parsed.data.unwrap_or_default();
    let mut out = HashMap::with_capacity(ids.len());
    let mut missing = Vec::new();
    for id in ids {
        match data.get(*id).and_then(|asset| asset.usd_price()) {
            Some(price) => {
                out.insert(id.to_string(), price);
            }
            None => missing.push(*id),
        }
    }
    if !missing.is_empty() {
        warn!(
            missing = %missing.join(","),
            payload = %body,
            "coinmarketcap: no usable USD price for some ids"
        );
    }
    if let Some(credits) = parsed.status.credit_count {
        debug!(credits, "coinmarketcap: credits used");
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    const OK_BODY: &str = r#"{
        "status": {"error_code": 0, "error_message": null, "credit_count": 1},
        "data": {
            "24498": {"id": 24498, "name": "Carrot", "symbol": "CRT",
                      "quote": {"USD": {"price": 0.412345, "last_updated": "2025-03-01T00:00:00.000Z"}}},
            "27295": {"id": 27295, "name": "Puffer", "symbol": "PUFFER",
                      "quote": {"USD": {"price": 0.81, "last_updated": "2025-03-01T00:00:00.000Z"}}}
        }
    }"#;

    #[test]
    fn extracts_both_prices() {
        let prices = parse_quotes(OK_BODY, &["24498", "27295"]).unwrap();
        assert_eq!(prices.len(), 2);
        assert!((prices["24498"] - 0.412345).abs() < 1e-12);
        assert!((prices["27295"] - 0.81).abs() < 1e-12);
    }

    #[test]
    fn missing_or_null_price_is_omitted() {
        let body = r#"{
            "status": {"error_code": 0},
            "data": {
                "27295": {"id": 27295, "name": "Puffer", "symbol": "PUFFER",
                          "quote": {"USD": {"price": null}}}
            }
        }"#;
        let prices = parse_quotes(body, &["24498", "27295"]).unwrap();
        assert!(prices.is_empty());
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl CapturedLog {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLog {
        type Writer = CapturedLog;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn parse_with_log(body: &str, ids: &[&str]) -> (HashMap<String, f64>, String) {
        let log = CapturedLog::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(log.clone())
            .with_ansi(false)
            .finish();
        let prices = tracing::subscriber::with_default(subscriber, || {
            parse_quotes(body, ids).unwrap()
        });
        (prices, log.contents())
    }

    #[test]
    fn partial_response_logs_payload() {
        let body = r#"{"status":{"error_code":0},"data":{"27295":{"id":27295,"name":"Puffer","symbol":"PUFFER","quote":{"USD":{"price":0.81}}}}}"#;
        let (prices, log) = parse_with_log(body, &["24498", "27295"]);

        assert_eq!(prices.len(), 1);
        assert!(log.contains("WARN"), "{log}");
        assert!(log.contains("missing=24498"), "{log}");
        assert!(log.contains(r#""symbol":"PUFFER""#), "{log}");
    }

    #[test]
    fn complete_response_logs_no_warning() {
        let (prices, log) = parse_with_log(OK_BODY, &["24498", "27295"]);
        assert_eq!(prices.len(), 2);
        assert!(!log.contains("WARN"), "{log}");
    }

    #[test]
    fn api_error_status_is_an_error() {
        let body = r#"{"status": {"error_code": 1001, "error_message": "This API Key is invalid."}}"#;
        let err = parse_quotes(body, &["24498"]).unwrap_err();
        assert!(err.to_string().contains("This API Key is invalid."));
    }

    #[test]
    fn garbage_body_is_an_error() {
        assert!(parse_quotes("<html>bad gateway</html>", &["24498"]).is_err());
    }
}
