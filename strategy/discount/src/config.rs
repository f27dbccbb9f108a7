//! Configuration types for the discount monitor.

use std::time::Duration;

use crate::error::ConfigError;
use crate::types::Recipient;

/// An asset tracked by the monitor.
#[derive(Debug, Clone)]
pub struct AssetConfig {
    /// Price provider id (CoinMarketCap numeric id)
    pub id: String,
    /// Human readable name used in logs and alerts
    pub name: String,
}

impl AssetConfig {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Configuration for DiscountMonitor (parameters only; collaborators are passed to `DiscountMonitor::new`).
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Asset expected to trade at a discount (e.g. Carrot)
    pub discounted_asset: AssetConfig,
    /// Asset the threshold is derived from (e.g. Puffer)
    pub reference_asset: AssetConfig,
    /// Threshold = reference price * discount_ratio; must be in (0, 1]
    pub discount_ratio: f64,
    /// Period between cycles; must be non-zero
    pub check_interval: Duration,
    /// Minimum spacing between notification attempts; zero disables rate limiting
    pub min_notification_interval: Duration,
    /// Alert destinations; may be empty
    pub recipients: Vec<Recipient>,
}

impl MonitorConfig {
    /// Checks everything a cycle relies on. Recipients are deliberately not
    /// checked here; invalid ones are skipped at dispatch time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.discount_ratio > 0.0 && self.discount_ratio <= 1.0) {
            return Err(ConfigError::InvalidRatio(self.discount_ratio));
        }
        if self.check_interval.is_zero() {
            return Err(ConfigError::InvalidCheckInterval);
        }
        if self.discounted_asset.id.trim().is_empty() {
            return Err(ConfigError::MissingAssetId("discounted"));
        }
        if self.reference_asset.id.trim().is_empty() {
            return Err(ConfigError::MissingAssetId("reference"));
        }
        if self.discounted_asset.id.trim() == self.reference_asset.id.trim() {
            return Err(ConfigError::DuplicateAssetId(
                self.discounted_asset.id.trim().to_string(),
            ));
        }
        Ok(())
    }
}

/// Rejects a missing, blank or placeholder credential; returns the trimmed value otherwise.
pub fn validate_credential<'a>(
    name: &'static str,
    value: Option<&'a str>,
) -> Result<&'a str, ConfigError> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingCredential(name))?;
    if utils::is_placeholder(value) {
        return Err(ConfigError::PlaceholderCredential(name));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config() -> MonitorConfig {
        MonitorConfig {
            discounted_asset: AssetConfig::new("24498", "Carrot"),
            reference_asset: AssetConfig::new("27295", "Puffer"),
            discount_ratio: 0.55,
            check_interval: Duration::from_secs(300),
            min_notification_interval: Duration::from_secs(3600),
            recipients: Vec::new(),
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert_eq!(config().validate(), Ok(()));
    }

    #[test]
    fn ratio_must_be_in_range() {
        for ratio in [0.0, -0.5, 1.01] {
            let cfg = MonitorConfig {
                discount_ratio: ratio,
                ..config()
            };
            assert_eq!(cfg.validate(), Err(ConfigError::InvalidRatio(ratio)));
        }
        let cfg = MonitorConfig {
            discount_ratio: 1.0,
            ..config()
        };
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn zero_check_interval_is_rejected() {
        let cfg = MonitorConfig {
            check_interval: Duration::ZERO,
            ..config()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidCheckInterval));
    }

    #[test]
    fn zero_notification_interval_is_allowed() {
        let cfg = MonitorConfig {
            min_notification_interval: Duration::ZERO,
            ..config()
        };
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn asset_ids_must_be_present_and_distinct() {
        let mut cfg = config();
        cfg.reference_asset.id = " ".into();
        assert_eq!(cfg.validate(), Err(ConfigError::MissingAssetId("reference")));

        let mut cfg = config();
        cfg.reference_asset.id = "24498".into();
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::DuplicateAssetId("24498".into()))
        );
    }

    #[test]
    fn credentials() {
        assert_eq!(
            validate_credential("CMC_API_KEY", None),
            Err(ConfigError::MissingCredential("CMC_API_KEY"))
        );
        assert_eq!(
            validate_credential("CMC_API_KEY", Some("  ")),
            Err(ConfigError::MissingCredential("CMC_API_KEY"))
        );
        assert_eq!(
            validate_credential("TELEGRAM_BOT_TOKEN", Some("YOUR_TELEGRAM_BOT_TOKEN")),
            Err(ConfigError::PlaceholderCredential("TELEGRAM_BOT_TOKEN"))
        );
        assert_eq!(
            validate_credential("CMC_API_KEY", Some(" b54bcf4d-1bca-4e8e-9a24-22ff2c3d462c ")),
            Ok("b54bcf4d-1bca-4e8e-9a24-22ff2c3d462c")
        );
    }
}
