//! KPI formulas shared by the analytics operations.
//!
//! Percentages are rounded to two decimals half-up on the value scaled by
//! 10,000. Reports built from the same data must agree digit for digit, so
//! every percentage in the engine goes through [`percentage`].

/// Ratio as a percentage with two decimals; 0 when the denominator is 0.
pub fn percentage(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    ((numerator as f64 / denominator as f64) * 10_000.0).round() / 100.0
}

/// Accepted share of all adjudicated adhesions
/// (accepted + rejected + under review).
pub fn effectiveness(accepted: u64, rejected: u64, in_review: u64) -> f64 {
    percentage(accepted, accepted + rejected + in_review)
}

/// Received share of assigned sheets.
pub fn compliance(received: u64, assigned: u64) -> f64 {
    percentage(received, assigned)
}
