//! Normalization of loosely-typed service responses
//!
//! Every known field is read independently through the active
//! [`ResponseFields`] table and defaulted when absent, so a partial or
//! garbled response still yields a complete [`ClassificationResult`].
//! Unknown fields are ignored.

use serde_json::{Map, Value};
use tracing::debug;

use crate::schema::ResponseFields;
use crate::types::{ClassificationResult, ResultItem};

/// Map a decoded response object onto the normalized result
///
/// `description` is echoed into `product` when the service omits it.
#[must_use]
pub fn normalize(
    body: &Map<String, Value>,
    fields: &ResponseFields,
    description: &str,
) -> ClassificationResult {
    let product = lookup(body, &fields.product)
        .and_then(text)
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| description.to_string());

    let warnings = lookup(body, &fields.warnings)
        .map(string_list)
        .unwrap_or_default();

    let mut items = lookup(body, &fields.items)
        .map(item_rows)
        .unwrap_or_default();

    for extra in &fields.item_fields {
        if let Some(value) = body.get(&extra.field).and_then(text) {
            items.push(ResultItem::new(extra.label.clone(), value));
        }
    }

    ClassificationResult {
        hts_code: text_field(body, &fields.hts_code),
        product,
        duty_rate: text_field(body, &fields.duty_rate),
        vat: text_field(body, &fields.vat),
        trade_agreement: text_field(body, &fields.trade_agreement),
        rationale: text_field(body, &fields.rationale),
        warnings,
        items,
    }
}

fn text_field(body: &Map<String, Value>, names: &[String]) -> String {
    lookup(body, names).and_then(text).unwrap_or_default()
}

/// First wire name that is present and not `null`
fn lookup<'a>(body: &'a Map<String, Value>, names: &[String]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| body.get(name))
        .find(|value| !value.is_null())
}

/// Render a scalar as display text; containers become compact JSON
fn text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(list) => list.iter().filter_map(text).collect(),
        Value::String(s) if s.trim().is_empty() => Vec::new(),
        other => text(other).into_iter().collect(),
    }
}

fn item_rows(value: &Value) -> Vec<ResultItem> {
    match value {
        Value::Array(list) => list.iter().filter_map(item_row).collect(),
        // {"Section": "XI", "Unit": "kg"}
        Value::Object(map) => map
            .iter()
            .filter_map(|(label, v)| text(v).map(|v| ResultItem::new(label.clone(), v)))
            .collect(),
        other => {
            debug!(kind = ?other, "Ignoring items field with unexpected shape");
            Vec::new()
        }
    }
}

fn item_row(value: &Value) -> Option<ResultItem> {
    match value {
        Value::Object(map) => {
            let label = ["label", "name", "key"]
                .iter()
                .find_map(|k| map.get(*k).and_then(text))
                .unwrap_or_default();
            let value = map.get("value").and_then(text).unwrap_or_default();
            if label.is_empty() && value.is_empty() {
                None
            } else {
                Some(ResultItem::new(label, value))
            }
        }
        // ["Unit", "kg"]
        Value::Array(pair) if pair.len() == 2 => Some(ResultItem::new(
            text(&pair[0]).unwrap_or_default(),
            text(&pair[1]).unwrap_or_default(),
        )),
        Value::Null => None,
        other => text(other).map(|v| ResultItem::new(String::new(), v)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldMapping;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_empty_body_is_fully_defaulted() {
        let result = normalize(&Map::new(), &FieldMapping::v2().response, "Green tea");

        assert_eq!(result.hts_code, "");
        assert_eq!(result.product, "Green tea");
        assert_eq!(result.duty_rate, "");
        assert_eq!(result.vat, "");
        assert_eq!(result.trade_agreement, "");
        assert_eq!(result.rationale, "");
        assert!(result.warnings.is_empty());
        assert!(result.items.is_empty());
    }

    #[test]
    fn test_every_subset_of_fields_is_defaulted() {
        let full = json!({
            "hts_code": "4202.31.60",
            "product": "Wallet",
            "duty_rate": "8%",
            "vat": "20%",
            "tlc": "USMCA",
            "rationale": "leather",
            "warnings": ["check lining"],
            "items": [{"label": "Unit", "value": "No."}]
        });
        let keys: Vec<String> = obj(full.clone()).keys().cloned().collect();
        let fields = FieldMapping::v2().response;

        for mask in 0u32..(1 << keys.len()) {
            let mut body = obj(full.clone());
            for (i, key) in keys.iter().enumerate() {
                if mask & (1 << i) != 0 {
                    body.remove(key);
                }
            }
            let result = normalize(&body, &fields, "wallet");
            let round: ClassificationResult =
                serde_json::from_value(serde_json::to_value(&result).unwrap()).unwrap();
            assert_eq!(round, result);
            assert!(!result.product.is_empty());
        }
    }

    #[test]
    fn test_trade_agreement_read_from_tlc() {
        let body = obj(json!({"tlc": "CPTPP", "trade_agreement": "ignored"}));
        let result = normalize(&body, &FieldMapping::v2().response, "x");
        assert_eq!(result.trade_agreement, "CPTPP");

        let body = obj(json!({"trade_agreement": "USMCA"}));
        let result = normalize(&body, &FieldMapping::v2().response, "x");
        assert_eq!(result.trade_agreement, "USMCA");
    }

    #[test]
    fn test_loose_types_are_stringified() {
        let body = obj(json!({
            "hts_code": 4202316000u64,
            "duty_rate": 8,
            "vat": null,
            "warnings": "single warning",
            "items": {"Section": "VIII"}
        }));
        let result = normalize(&body, &FieldMapping::v2().response, "x");

        assert_eq!(result.hts_code, "4202316000");
        assert_eq!(result.duty_rate, "8");
        assert_eq!(result.vat, "");
        assert_eq!(result.warnings, vec!["single warning".to_string()]);
        assert_eq!(result.items, vec![ResultItem::new("Section", "VIII")]);
    }

    #[test]
    fn test_malformed_items_are_skipped() {
        let body = obj(json!({
            "items": [{"label": "Unit", "value": 2}, {}, null, ["Origin", "CN"]]
        }));
        let result = normalize(&body, &FieldMapping::v2().response, "x");
        assert_eq!(
            result.items,
            vec![ResultItem::new("Unit", "2"), ResultItem::new("Origin", "CN")]
        );
    }

    #[test]
    fn test_hs_mapping() {
        let body = obj(json!({
            "hs_code": "6109.10",
            "description": "T-shirts, knitted, of cotton",
            "confidence": "high",
            "reasoning": "Knitted cotton garment",
            "chapter": "61 - Apparel, knitted",
            "considerations": ["fibre content", "knit vs woven"]
        }));
        let result = normalize(&body, &FieldMapping::hs().response, "cotton tee");

        assert_eq!(result.hts_code, "6109.10");
        assert_eq!(result.product, "T-shirts, knitted, of cotton");
        assert_eq!(result.rationale, "Knitted cotton garment");
        assert_eq!(result.warnings.len(), 2);
        assert_eq!(
            result.items,
            vec![
                ResultItem::new("Confidence", "high"),
                ResultItem::new("Chapter", "61 - Apparel, knitted"),
            ]
        );
    }
}
