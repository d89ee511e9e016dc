//! Final schema enforcement for extracted records.

use crate::models::config::Defaults;
use crate::models::record::CanonicalRecord;

use super::rules::patterns::CANONICAL_PRICE;

/// True when `price` is exactly `税込<digits grouped by thousands>円`.
pub fn is_canonical_price(price: &str) -> bool {
    CANONICAL_PRICE.is_match(price)
}

/// Turns possibly-missing fields into a [`CanonicalRecord`].
///
/// This is the only place that decides whether a price is acceptable;
/// upstream stages treat their price output as provisional.
#[derive(Debug, Clone, Default)]
pub struct RecordValidator {
    defaults: Defaults,
}

impl RecordValidator {
    pub fn new(defaults: Defaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    /// Validate both fields, substituting defaults where needed.
    pub fn validate(&self, label: Option<String>, price: Option<String>) -> CanonicalRecord {
        self.validate_with_warnings(label, price).0
    }

    /// Like [`validate`](Self::validate), also describing every substitution.
    pub fn validate_with_warnings(
        &self,
        label: Option<String>,
        price: Option<String>,
    ) -> (CanonicalRecord, Vec<String>) {
        let mut warnings = Vec::new();

        let label = match label {
            Some(label) if !label.trim().is_empty() => label,
            Some(_) => {
                warnings.push("Label was blank, using unknown label".to_string());
                self.defaults.unknown_label.clone()
            }
            None => {
                warnings.push("Could not extract label".to_string());
                self.defaults.unknown_label.clone()
            }
        };

        let price = match price {
            Some(price) if is_canonical_price(&price) => price,
            Some(price) => {
                warnings.push(format!("Price {:?} is not canonical, using zero price", price));
                self.defaults.zero_price.clone()
            }
            None => {
                warnings.push("Could not extract price".to_string());
                self.defaults.zero_price.clone()
            }
        };

        (CanonicalRecord { label, price }, warnings)
    }
}
