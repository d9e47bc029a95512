use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A record exactly as the upstream collection returned it.
pub type RawRecord = Value;

/// Typed view over a [`RawRecord`] for one collection.
///
/// Every field is optional and read leniently: strings and numbers are accepted,
/// anything else (including blank strings) reads as missing.
pub trait RecordContract: DeserializeOwned {
    /// Property projection to request from upstream.
    const PROPERTIES: &'static [&'static str];

    fn from_raw(raw: &RawRecord) -> Result<Self, serde_json::Error> {
        Self::deserialize(raw)
    }
}

/// Order-line record, dated by ship/record date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OrderLineRecord {
    #[serde(rename = "RecordDate", default, deserialize_with = "lenient_text")]
    pub record_date: Option<String>,
    #[serde(rename = "ExtendedPrice", default, deserialize_with = "lenient_text")]
    pub extended_price: Option<String>,
    #[serde(rename = "WBItProductCode", default, deserialize_with = "lenient_text")]
    pub product_code: Option<String>,
}

impl RecordContract for OrderLineRecord {
    const PROPERTIES: &'static [&'static str] = &["RecordDate", "ExtendedPrice", "WBItProductCode"];
}

/// Ledger record, dated by invoice date. Amounts may be signed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InvoiceLedgerRecord {
    #[serde(rename = "FRDerInvDate", default, deserialize_with = "lenient_text")]
    pub invoice_date: Option<String>,
    #[serde(rename = "DomAmount", default, deserialize_with = "lenient_text")]
    pub amount: Option<String>,
    #[serde(rename = "FRDerDescription", default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(rename = "FRDerProductCode", default, deserialize_with = "lenient_text")]
    pub derived_product_code: Option<String>,
    #[serde(rename = "ItemProductCode", default, deserialize_with = "lenient_text")]
    pub item_product_code: Option<String>,
    #[serde(rename = "WBItProductCode", default, deserialize_with = "lenient_text")]
    pub wb_product_code: Option<String>,
}

impl InvoiceLedgerRecord {
    /// First non-empty product code, in fixed precedence order.
    pub fn product_code(&self) -> Option<&str> {
        [
            &self.derived_product_code,
            &self.item_product_code,
            &self.wb_product_code,
        ]
        .into_iter()
        .find_map(|code| code.as_deref())
    }
}

impl RecordContract for InvoiceLedgerRecord {
    const PROPERTIES: &'static [&'static str] = &[
        "FRDerInvDate",
        "DomAmount",
        "FRDerDescription",
        "FRDerProductCode",
        "ItemProductCode",
        "WBItProductCode",
    ];
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let text = match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => return Ok(None),
    };
    if text.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_strings_and_numbers_and_ignores_extra_fields() {
        let raw = json!({
            "RecordDate": "2024-01-05 00:00:00",
            "ExtendedPrice": 12.5,
            "WBItProductCode": "SV",
            "_ItemId": "PBT=[coitem] coi.ID=[abc]",
        });
        let rec = OrderLineRecord::from_raw(&raw).unwrap();
        assert_eq!(rec.record_date.as_deref(), Some("2024-01-05 00:00:00"));
        assert_eq!(rec.extended_price.as_deref(), Some("12.5"));
        assert_eq!(rec.product_code.as_deref(), Some("SV"));
    }

    #[test]
    fn null_blank_and_nested_values_read_as_missing() {
        let raw = json!({
            "RecordDate": null,
            "ExtendedPrice": "  ",
            "WBItProductCode": {"nested": true},
        });
        let rec = OrderLineRecord::from_raw(&raw).unwrap();
        assert_eq!(rec, OrderLineRecord::default());
    }

    #[test]
    fn non_object_record_is_rejected() {
        assert!(OrderLineRecord::from_raw(&json!("not a record")).is_err());
        assert!(InvoiceLedgerRecord::from_raw(&json!([1, 2, 3])).is_err());
    }

    #[test]
    fn product_code_uses_first_non_empty_candidate() {
        let rec = InvoiceLedgerRecord::from_raw(&json!({
            "FRDerProductCode": "",
            "ItemProductCode": "sv",
            "WBItProductCode": "WIDGET",
        }))
        .unwrap();
        assert_eq!(rec.product_code(), Some("sv"));

        let rec = InvoiceLedgerRecord::from_raw(&json!({"WBItProductCode": "WIDGET"})).unwrap();
        assert_eq!(rec.product_code(), Some("WIDGET"));

        assert_eq!(InvoiceLedgerRecord::default().product_code(), None);
    }
}
