//! Raw wire types for the Square REST API.
//!
//! Everything here mirrors the vendor's JSON shapes as loosely as the vendor
//! sends them: nearly every field is optional, integers may arrive as
//! numbers or strings, and records may be soft-deleted. The normalizer is
//! the only consumer; the rest of the system never sees these types.

use serde::{Deserialize, Deserializer};

/// Response from `GET /v2/catalog/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListCatalogResponse {
    #[serde(default)]
    pub objects: Vec<CatalogObject>,
    /// Present when more pages remain.
    pub cursor: Option<String>,
}

/// One raw catalog record: an item, a nested variation, an image, or a
/// category, discriminated by `type`.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogObject {
    #[serde(rename = "type")]
    pub object_type: String,
    pub id: String,
    #[serde(default)]
    pub is_deleted: bool,
    pub item_data: Option<ItemData>,
    pub item_variation_data: Option<ItemVariationData>,
    pub image_data: Option<ImageData>,
    pub category_data: Option<CategoryData>,
}

/// Payload of an `ITEM` record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemData {
    pub name: Option<String>,
    pub description: Option<String>,
    /// One of three places a category reference may appear.
    pub category_id: Option<String>,
    /// Another: a list of memberships.
    pub categories: Option<Vec<CategoryRef>>,
    /// And another: the reporting rollup.
    pub reporting_category: Option<CategoryRef>,
    pub image_ids: Option<Vec<String>>,
    /// Nested `ITEM_VARIATION` records.
    pub variations: Option<Vec<CatalogObject>>,
}

/// A reference to a category from an item.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRef {
    pub id: Option<String>,
}

/// Payload of a nested `ITEM_VARIATION` record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemVariationData {
    pub item_id: Option<String>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub ordinal: Option<i64>,
    pub price_money: Option<RawMoney>,
}

/// A raw money value; the amount is a 64-bit integer the vendor may encode
/// as a JSON number or a string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMoney {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub amount: Option<i64>,
    pub currency: Option<String>,
}

/// Payload of an `IMAGE` record.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageData {
    pub url: Option<String>,
}

/// Payload of a `CATEGORY` record.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryData {
    pub name: Option<String>,
}

/// Response from `POST /v2/online-checkout/payment-links`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePaymentLinkResponse {
    pub payment_link: Option<PaymentLink>,
    #[serde(default)]
    pub errors: Vec<SquareApiError>,
}

/// A hosted payment page created by the provider.
#[derive(Debug, Clone, serde::Serialize, Deserialize)]
pub struct PaymentLink {
    pub id: Option<String>,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_url: Option<String>,
}

/// Structured error entry in a Square response body.
#[derive(Debug, Clone, Deserialize)]
pub struct SquareApiError {
    pub category: Option<String>,
    pub code: Option<String>,
    pub detail: Option<String>,
}

/// Accept an integer encoded as a JSON number or a string.
fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_i64(),
        Some(serde_json::Value::String(s)) => s.parse::<i64>().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_amount_accepts_number_or_string() {
        let from_number: RawMoney =
            serde_json::from_value(json!({ "amount": 15000, "currency": "USD" }))
                .expect("number amount");
        assert_eq!(from_number.amount, Some(15000));

        let from_string: RawMoney =
            serde_json::from_value(json!({ "amount": "2250", "currency": "USD" }))
                .expect("string amount");
        assert_eq!(from_string.amount, Some(2250));

        let missing: RawMoney = serde_json::from_value(json!({})).expect("empty money");
        assert_eq!(missing.amount, None);
    }

    #[test]
    fn test_unparseable_amount_is_none() {
        let garbage: RawMoney =
            serde_json::from_value(json!({ "amount": "lots" })).expect("garbage amount");
        assert_eq!(garbage.amount, None);
    }
}
