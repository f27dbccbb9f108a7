//! Error taxonomy for the discount strategy.

use thiserror::Error;

/// Invalid process configuration. Fatal at startup.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),
    #[error("credential {0} still holds a placeholder value")]
    PlaceholderCredential(&'static str),
    #[error("discount ratio must be in (0, 1], got {0}")]
    InvalidRatio(f64),
    #[error("check interval must be greater than zero")]
    InvalidCheckInterval,
    #[error("missing asset id for the {0} asset")]
    MissingAssetId(&'static str),
    #[error("discounted and reference asset share the id {0}")]
    DuplicateAssetId(String),
}

/// Inputs the discount evaluator refuses to compute with.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluateError {
    #[error("{asset} price must be a finite number, got {value}")]
    NonFinitePrice { asset: &'static str, value: f64 },
    #[error("{asset} price must be positive, got {value}")]
    NonPositivePrice { asset: &'static str, value: f64 },
    #[error("discount ratio must be in (0, 1], got {0}")]
    RatioOutOfRange(f64),
}

/// Reasons a cycle ended before reaching the discount decision.
#[derive(Error, Debug)]
pub enum CycleError {
    #[error("price source unavailable: {0:#}")]
    SourceUnavailable(anyhow::Error),
    #[error("no price returned for asset {asset_id}")]
    MissingQuote { asset_id: String },
    #[error(transparent)]
    InvalidInput(#[from] EvaluateError),
}
