//! Request and normalized result types
//!
//! These are the only types shared between the orchestrator and the history
//! store. Their serde form (camelCase) is the persisted history encoding, not
//! the service wire format; the wire format is owned by [`crate::schema`].

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A product classification request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationRequest {
    /// Free-text product description (required)
    pub product_description: String,
    /// Country of origin, free text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_of_origin: Option<String>,
    /// Declared customs value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_value: Option<f64>,
}

impl ClassificationRequest {
    /// Create a request for a description (trimmed)
    pub fn new(product_description: impl Into<String>) -> Self {
        Self {
            product_description: product_description.into().trim().to_string(),
            country_of_origin: None,
            declared_value: None,
        }
    }

    /// Set the country of origin; blank input leaves it absent
    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        let country = country.into().trim().to_string();
        self.country_of_origin = (!country.is_empty()).then_some(country);
        self
    }

    /// Set the declared value; non-finite values leave it absent
    #[must_use]
    pub fn with_declared_value(mut self, value: f64) -> Self {
        self.declared_value = value.is_finite().then_some(value);
        self
    }

    /// The description as it goes on the wire
    #[must_use]
    pub fn description(&self) -> &str {
        self.product_description.trim()
    }

    /// The country of origin as it goes on the wire
    #[must_use]
    pub fn country(&self) -> Option<&str> {
        self.country_of_origin
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// The declared value as it goes on the wire
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        self.declared_value.filter(|v| v.is_finite())
    }

    /// Check the request can be submitted
    pub fn validate(&self) -> Result<()> {
        if self.description().is_empty() {
            return Err(Error::Validation(
                "product description must not be empty".to_string(),
            ));
        }
        if let Some(value) = self.value() {
            if value < 0.0 {
                return Err(Error::Validation(format!(
                    "declared value must not be negative (got {value})"
                )));
            }
        }
        Ok(())
    }
}

/// A free-form supplementary row attached by some backends
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultItem {
    /// Row label
    pub label: String,
    /// Row value
    pub value: String,
}

impl ResultItem {
    /// Create an item
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Normalized classification result
///
/// Every field is always present. Missing text fields are `""`, missing
/// lists are empty, and a missing `product` echoes the submitted description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassificationResult {
    /// Harmonized Tariff Schedule code
    pub hts_code: String,
    /// Product name as understood by the service
    pub product: String,
    /// Duty rate
    pub duty_rate: String,
    /// VAT rate
    pub vat: String,
    /// Applicable trade agreement (wire name `tlc`)
    pub trade_agreement: String,
    /// Classification rationale
    pub rationale: String,
    /// Warnings raised by the service
    pub warnings: Vec<String>,
    /// Supplementary rows
    pub items: Vec<ResultItem>,
}
