//! Currency normalization through a fixed pivot.
//!
//! Rates are static configuration, not live market data: each code maps to
//! the value of one unit in the pivot currency. Conversion routes through
//! the pivot, so any two listed codes can be converted without a full
//! cross-rate matrix.

use std::collections::HashMap;

/// Static conversion table: code → units of pivot per unit of that currency.
///
/// Unknown codes are treated as pivot-equivalent (rate 1.0). That is a
/// deliberate lenient-degradation policy, not an error: a ranking request
/// must never fail because the rate table is missing a code.
#[derive(Debug, Clone)]
pub struct RateTable {
    pivot: String,
    rates: HashMap<String, f64>,
}

impl RateTable {
    /// Build a table from `(code, rate)` pairs. Non-positive and non-finite
    /// rates are skipped; those codes fall back to 1.0 like unknown codes.
    pub fn new(pivot: impl Into<String>, rates: impl IntoIterator<Item = (&'static str, f64)>) -> Self {
        let rates = rates
            .into_iter()
            .filter(|&(_, r)| r.is_finite() && r > 0.0)
            .map(|(code, r)| (code.to_string(), r))
            .collect();
        Self {
            pivot: pivot.into(),
            rates,
        }
    }

    /// The static USD-pivot table the product ships with.
    pub fn default_usd() -> Self {
        Self::new(
            "USD",
            [
                ("USD", 1.0),
                ("EUR", 1.09),
                ("GBP", 1.27),
                ("JPY", 0.0067),
                ("AUD", 0.65),
                ("CAD", 0.74),
                ("SGD", 0.74),
            ],
        )
    }

    pub fn pivot(&self) -> &str {
        &self.pivot
    }

    /// Rate for a code; unknown codes are pivot-equivalent.
    pub fn rate(&self, code: &str) -> f64 {
        self.rates.get(code).copied().unwrap_or(1.0)
    }

    /// Convert `amount` from one currency to another through the pivot.
    ///
    /// Same-currency conversion returns `amount` unchanged (bitwise exact,
    /// no rate arithmetic applied).
    pub fn convert(&self, amount: f64, from: &str, to: &str) -> f64 {
        if from == to {
            return amount;
        }
        let in_pivot = amount * self.rate(from);
        in_pivot / self.rate(to)
    }
}
