use crate::error::EvaluateError;
use crate::types::DiscountResult;

/// Compares the discounted asset's price against `ratio` times the reference price.
///
/// # Arguments
/// * `discounted_price` - USD price of the asset expected to trade at a discount
/// * `reference_price` - USD price of the reference asset
/// * `ratio` - Fraction of the reference price that forms the threshold, in (0, 1]
///
/// # Returns
/// A `DiscountResult`, or an `EvaluateError` when a price is not a positive
/// finite number or the ratio is out of range.
pub fn evaluate(
    discounted_price: f64,
    reference_price: f64,
    ratio: f64,
) -> Result<DiscountResult, EvaluateError> {
    check_price("discounted", discounted_price)?;
    check_price("reference", reference_price)?;
    if !(ratio > 0.0 && ratio <= 1.0) {
        return Err(EvaluateError::RatioOutOfRange(ratio));
    }

    let threshold_price = reference_price * ratio;
    let is_discounted = discounted_price < threshold_price;
    let discount_percent = if is_discounted {
        (threshold_price - discounted_price) / threshold_price * 100.0
    } else {
        0.0
    };

    Ok(DiscountResult {
        threshold_price,
        is_discounted,
        discount_percent,
    })
}

fn check_price(asset: &'static str, value: f64) -> Result<(), EvaluateError> {
    if !value.is_finite() {
        return Err(EvaluateError::NonFinitePrice { asset, value });
    }
    if value <= 0.0 {
        return Err(EvaluateError::NonPositivePrice { asset, value });
    }
    Ok(())
}
