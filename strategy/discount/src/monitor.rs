//! Discount monitor implementation
//!
//! Runs the fetch -> evaluate -> gate -> dispatch cycle, once immediately and
//! then on a fixed period until shut down.

use std::future::Future;

use chrono::{DateTime, Utc};
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::config::MonitorConfig;
use crate::dispatcher::{dispatch, is_valid_recipient, MessagingGateway};
use crate::error::{ConfigError, CycleError};
use crate::evaluator::evaluate;
use crate::gate::NotificationGate;
use crate::message::{format_alert, ratio_percent};
use crate::source::PriceSource;
use crate::types::{CycleReport, PriceQuote};

/// Discount Monitor
///
/// Owns the notification gate, so gate state is only ever touched by the
/// task driving the monitor.
pub struct DiscountMonitor<S, G> {
    source: S,
    gateway: G,
    config: MonitorConfig,
    gate: NotificationGate,
}

impl<S, G> DiscountMonitor<S, G>
where
    S: PriceSource,
    G: MessagingGateway,
{
    /// Creates a new `DiscountMonitor`
    ///
    /// # Arguments
    /// * `config` - A validated `MonitorConfig`
    /// * `source` - Price source for both assets
    /// * `gateway` - Messaging gateway used to deliver alerts
    pub fn new(config: MonitorConfig, source: S, gateway: G) -> Self {
        let gate = NotificationGate::new(config.min_notification_interval);
        Self {
            source,
            gateway,
            config,
            gate,
        }
    }

    pub fn gate(&self) -> &NotificationGate {
        &self.gate
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Performs one complete cycle as of `now`.
    ///
    /// Never fails: every problem is logged and reflected in the returned
    /// `CycleReport`. The gate is advanced only when at least one recipient
    /// was actually tried.
    pub async fn run_cycle(&mut self, now: DateTime<Utc>) -> CycleReport {
        let discounted_name = self.config.discounted_asset.name.as_str();
        let reference_name = self.config.reference_asset.name.as_str();

        // Step 1: Fetch prices
        info!("Fetching current prices...");
        let (discounted, reference) = match self.fetch_prices().await {
            Ok(quotes) => quotes,
            Err(e) => {
                error!(error = %e, "Error: could not fetch prices");
                return CycleReport::SourceFailed(e);
            }
        };
        info!(
            "Current prices: {}: ${:.6}, {}: ${:.6}",
            discounted_name, discounted.price_usd, reference_name, reference.price_usd
        );

        // Step 2: Evaluate
        let ratio = self.config.discount_ratio;
        let result = match evaluate(discounted.price_usd, reference.price_usd, ratio) {
            Ok(result) => result,
            Err(e) => {
                error!(error = %e, "Error: unusable prices");
                return CycleReport::SourceFailed(CycleError::InvalidInput(e));
            }
        };
        info!(
            "Discount threshold ({} of {}): ${:.6}",
            ratio_percent(ratio),
            reference_name,
            result.threshold_price
        );

        if !result.is_discounted {
            info!(
                "No discount detected. {} price is above the threshold.",
                discounted_name
            );
            return CycleReport::NoDiscount(result);
        }
        info!(
            "Discount detected! {} is {:.2}% below the threshold",
            discounted_name, result.discount_percent
        );

        // Step 3: Gate
        if !self.gate.may_notify(now) {
            let next_allowed_at = self.gate.next_allowed_at();
            info!(
                next_allowed_at = ?next_allowed_at,
                "Skipped notification due to rate limit"
            );
            return CycleReport::RateLimited {
                result,
                next_allowed_at,
            };
        }

        // Step 4: Dispatch and record
        let message = format_alert(
            discounted_name,
            reference_name,
            discounted.price_usd,
            reference.price_usd,
            ratio,
            &result,
        );
        let summary = dispatch(&self.gateway, &message, &self.config.recipients).await;
        if summary.attempted() {
            self.gate.record_dispatch(now);
        } else {
            warn!("No valid recipients to notify; rate limit not advanced");
        }
        info!(
            sent = summary.sent,
            failed = summary.failed,
            skipped = summary.skipped,
            "Dispatch finished"
        );

        CycleReport::Dispatched { result, summary }
    }

    /// Runs cycles on the configured period until `shutdown` resolves.
    ///
    /// The first cycle runs immediately. Cycles never overlap: a tick that
    /// fires while a cycle is still running is skipped. Shutdown is only
    /// observed between cycles, so an in-flight cycle always completes.
    ///
    /// Fails without running any cycle if the configuration is invalid.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<(), ConfigError>
    where
        F: Future<Output = ()>,
    {
        self.config.validate()?;

        let valid_recipients = self
            .config
            .recipients
            .iter()
            .filter(|r| is_valid_recipient(r.as_str()))
            .count();
        info!("Price monitoring started");
        info!(
            "Checking prices every {:?}, notifying at most every {:?}",
            self.config.check_interval, self.config.min_notification_interval
        );
        info!(
            recipients = self.config.recipients.len(),
            valid = valid_recipients,
            "Alert recipients configured"
        );
        if valid_recipients == 0 {
            warn!("No valid recipients configured; discounts will only be logged");
        }

        let mut ticker = tokio::time::interval(self.config.check_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    self.run_cycle(Utc::now()).await;
                }
            }
        }

        info!("Monitoring stopped");
        Ok(())
    }

    async fn fetch_prices(&self) -> Result<(PriceQuote, PriceQuote), CycleError> {
        let discounted_id = self.config.discounted_asset.id.as_str();
        let reference_id = self.config.reference_asset.id.as_str();

        let mut quotes = self
            .source
            .get_quotes(&[discounted_id, reference_id])
            .await
            .map_err(CycleError::SourceUnavailable)?;

        let discounted = quotes
            .remove(discounted_id)
            .ok_or_else(|| CycleError::MissingQuote {
                asset_id: discounted_id.to_string(),
            })?;
        let reference = quotes
            .remove(reference_id)
            .ok_or_else(|| CycleError::MissingQuote {
                asset_id: reference_id.to_string(),
            })?;
        Ok((discounted, reference))
    }
}
