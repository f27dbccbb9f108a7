//! Discount alert strategy crate.
//!
//! Watches the price of one asset relative to a reference asset and notifies
//! a set of chats when it trades below a configured fraction of the
//! reference, with a minimum spacing between notifications.

pub mod config;
mod dispatcher;
mod error;
mod evaluator;
mod gate;
mod message;
mod monitor;
mod source;
mod types;

pub use config::{validate_credential, AssetConfig, MonitorConfig};
pub use dispatcher::{dispatch, is_valid_recipient, MessagingGateway};
pub use error::{ConfigError, CycleError, EvaluateError};
pub use evaluator::evaluate;
pub use gate::NotificationGate;
pub use message::format_alert;
pub use monitor::DiscountMonitor;
pub use source::PriceSource;
pub use types::{
    CycleReport, DeliveryStatus, DiscountResult, DispatchOutcome, DispatchSummary, PriceQuote,
    Recipient,
};
