//! Schema - Versioned wire field mappings
//!
//! The classification service has shipped several incompatible field naming
//! conventions. Each one is a [`FieldMapping`]; the orchestrator only ever
//! talks to the wire through the active mapping, so a new backend revision is
//! a new table here (or in configuration), not a code change.
//!
//! | preset | request body                                              | response names                                   |
//! |--------|-----------------------------------------------------------|--------------------------------------------------|
//! | `v1`   | `description`                                             | `hts_code, product, duty_rate, vat, tlc, ...`     |
//! | `v2`   | `product_description, country_of_origin?, declared_value?`| same as `v1`                                     |
//! | `hs`   | `product_description`                                     | `hs_code, description, reasoning, considerations`|

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::ClassificationRequest;

/// Names of the preset mappings
pub const PRESET_NAMES: &[&str] = &["v1", "v2", "hs"];

/// Request body field names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestFields {
    /// Wire name of the description
    pub description: String,
    /// Wire name of the country of origin; `None` means the backend does not accept it
    #[serde(default)]
    pub country_of_origin: Option<String>,
    /// Wire name of the declared value; `None` means the backend does not accept it
    #[serde(default)]
    pub declared_value: Option<String>,
}

/// A response field surfaced as a supplementary `{label, value}` row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemField {
    /// Row label
    pub label: String,
    /// Wire field name
    pub field: String,
}

/// Response field names
///
/// Each logical field lists wire names in priority order; the first one
/// present (and not `null`) wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseFields {
    /// HTS code names
    pub hts_code: Vec<String>,
    /// Product names
    pub product: Vec<String>,
    /// Duty rate names
    pub duty_rate: Vec<String>,
    /// VAT names
    pub vat: Vec<String>,
    /// Trade agreement names
    pub trade_agreement: Vec<String>,
    /// Rationale names
    pub rationale: Vec<String>,
    /// Warning list names
    pub warnings: Vec<String>,
    /// Supplementary row list names
    pub items: Vec<String>,
    /// Scalar fields appended to `items`
    pub item_fields: Vec<ItemField>,
}

/// A versioned mapping between the wire format and the normalized model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Mapping version label (for logging)
    pub version: String,
    /// Request body names
    pub request: RequestFields,
    /// Response body names
    #[serde(default)]
    pub response: ResponseFields,
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

fn standard_response() -> ResponseFields {
    ResponseFields {
        hts_code: names(&["hts_code"]),
        product: names(&["product"]),
        duty_rate: names(&["duty_rate"]),
        vat: names(&["vat"]),
        trade_agreement: names(&["tlc", "trade_agreement"]),
        rationale: names(&["rationale"]),
        warnings: names(&["warnings"]),
        items: names(&["items"]),
        item_fields: Vec::new(),
    }
}

impl FieldMapping {
    /// Early backends: `{description}` only
    #[must_use]
    pub fn v1() -> Self {
        Self {
            version: "v1".to_string(),
            request: RequestFields {
                description: "description".to_string(),
                country_of_origin: None,
                declared_value: None,
            },
            response: standard_response(),
        }
    }

    /// Current backends: description plus optional trade metadata
    #[must_use]
    pub fn v2() -> Self {
        Self {
            version: "v2".to_string(),
            request: RequestFields {
                description: "product_description".to_string(),
                country_of_origin: Some("country_of_origin".to_string()),
                declared_value: Some("declared_value".to_string()),
            },
            response: standard_response(),
        }
    }

    /// HS-code backend (`/api/classify`), answering with `hs_code`/`reasoning`
    #[must_use]
    pub fn hs() -> Self {
        Self {
            version: "hs".to_string(),
            request: RequestFields {
                description: "product_description".to_string(),
                country_of_origin: None,
                declared_value: None,
            },
            response: ResponseFields {
                hts_code: names(&["hs_code", "hts_code"]),
                product: names(&["description", "product"]),
                duty_rate: names(&["duty_rate"]),
                vat: names(&["vat"]),
                trade_agreement: names(&["tlc"]),
                rationale: names(&["reasoning", "rationale"]),
                warnings: names(&["considerations", "warnings"]),
                items: names(&["items"]),
                item_fields: vec![
                    ItemField {
                        label: "Confidence".to_string(),
                        field: "confidence".to_string(),
                    },
                    ItemField {
                        label: "Chapter".to_string(),
                        field: "chapter".to_string(),
                    },
                ],
            },
        }
    }

    /// Look up a preset by name
    #[must_use]
    pub fn preset(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "v1" | "legacy" => Some(Self::v1()),
            "v2" => Some(Self::v2()),
            "hs" => Some(Self::hs()),
            _ => None,
        }
    }

    /// Build the request body
    ///
    /// Optional fields are only sent when present on the request and
    /// accepted by this mapping.
    #[must_use]
    pub fn encode_request(&self, request: &ClassificationRequest) -> Value {
        let mut body = Map::new();
        body.insert(
            self.request.description.clone(),
            Value::String(request.description().to_string()),
        );

        if let (Some(name), Some(country)) = (&self.request.country_of_origin, request.country()) {
            body.insert(name.clone(), Value::String(country.to_string()));
        }

        if let (Some(name), Some(value)) = (&self.request.declared_value, request.value()) {
            if let Some(number) = serde_json::Number::from_f64(value) {
                body.insert(name.clone(), Value::Number(number));
            }
        }

        Value::Object(body)
    }
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self::v2()
    }
}
