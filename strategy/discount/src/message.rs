use crate::types::DiscountResult;

/// Formats the alert text sent to every recipient.
pub fn format_alert(
    discounted_name: &str,
    reference_name: &str,
    discounted_price: f64,
    reference_price: f64,
    ratio: f64,
    result: &DiscountResult,
) -> String {
    format!(
        "🚨 DISCOUNT ALERT 🚨\n\n\
         {discounted_name} is trading at a {:.2}% discount!\n\n\
         🥕 {discounted_name}: ${:.6}\n\
         🐡 {reference_name}: ${:.6}\n\
         📉 Threshold ({} of {reference_name}): ${:.6}",
        result.discount_percent,
        discounted_price,
        reference_price,
        ratio_percent(ratio),
        result.threshold_price,
    )
}

/// Discount ratio as a whole percentage, e.g. `0.55` -> `55%`.
pub(crate) fn ratio_percent(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ratio_percent_has_no_float_noise() {
        assert_eq!(ratio_percent(0.55), "55%");
        assert_eq!(ratio_percent(0.5), "50%");
        assert_eq!(ratio_percent(1.0), "100%");
    }

    #[test]
    fn renders_alert() {
        let result = DiscountResult {
            threshold_price: 55.0,
            is_discounted: true,
            discount_percent: 9.090909,
        };
        let text = format_alert("Carrot", "Puffer", 50.0, 100.0, 0.55, &result);
        assert_eq!(
            text,
            "🚨 DISCOUNT ALERT 🚨\n\n\
             Carrot is trading at a 9.09% discount!\n\n\
             🥕 Carrot: $50.000000\n\
             🐡 Puffer: $100.000000\n\
             📉 Threshold (55% of Puffer): $55.000000"
        );
    }
}
