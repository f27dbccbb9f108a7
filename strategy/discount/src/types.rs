//! Shared types for the discount strategy.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::error::CycleError;

/// A single asset's USD price at fetch time.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    pub asset_id: String,
    pub price_usd: f64,
}

/// Outcome of comparing the discounted asset against the reference asset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscountResult {
    /// Reference price multiplied by the discount ratio
    pub threshold_price: f64,
    /// Whether the discounted asset trades strictly below the threshold
    pub is_discounted: bool,
    /// Distance below the threshold, in percent of the threshold; 0 when not discounted
    pub discount_percent: f64,
}

/// Destination of an alert (a Telegram chat id or `@channel`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Recipient(String);

impl Recipient {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Recipient {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for Recipient {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryStatus {
    Sent,
    /// Recipient id was empty or placeholder-like; no network call was made
    SkippedInvalid,
    Failed { reason: String },
}

/// Result of one delivery attempt to one recipient.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOutcome {
    pub recipient: Recipient,
    pub status: DeliveryStatus,
}

/// Aggregate of a dispatch across all recipients.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchSummary {
    pub outcomes: Vec<DispatchOutcome>,
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl DispatchSummary {
    pub fn from_outcomes(outcomes: Vec<DispatchOutcome>) -> Self {
        let mut summary = Self::default();
        for outcome in &outcomes {
            match outcome.status {
                DeliveryStatus::Sent => summary.sent += 1,
                DeliveryStatus::SkippedInvalid => summary.skipped += 1,
                DeliveryStatus::Failed { .. } => summary.failed += 1,
            }
        }
        summary.outcomes = outcomes;
        summary
    }

    /// True when at least one recipient was actually tried, successfully or not.
    pub fn attempted(&self) -> bool {
        self.sent + self.failed > 0
    }
}

/// What a single monitoring cycle did.
#[derive(Debug)]
pub enum CycleReport {
    /// Prices could not be obtained or were unusable; nothing else happened
    SourceFailed(CycleError),
    NoDiscount(DiscountResult),
    /// Discount found but the notification gate was closed
    RateLimited {
        result: DiscountResult,
        next_allowed_at: Option<DateTime<Utc>>,
    },
    Dispatched {
        result: DiscountResult,
        summary: DispatchSummary,
    },
}
