use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::product::{
    AppliedDiscount as DomainAppliedDiscount, DiscountKind, NewProduct as DomainNewProduct,
    Product as DomainProduct, UpdateProduct as DomainUpdateProduct,
};
use crate::models::decimal;

/// Product as serialized by the catalog API.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub is_out_of_stock: bool,
    #[serde(with = "decimal::cents")]
    pub price: i64,
    #[serde(
        default,
        rename = "finalPrice",
        alias = "final_price",
        with = "decimal::cents_option"
    )]
    pub final_price: Option<i64>,
    #[serde(default)]
    pub discount: Option<AppliedDiscountRecord>,
    #[serde(default, alias = "hasCouponApplied")]
    pub has_coupon_applied: bool,
    #[serde(default)]
    pub coupon_code: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppliedDiscountRecord {
    #[serde(rename = "type")]
    pub kind: DiscountKind,
    #[serde(deserialize_with = "decimal::float::deserialize")]
    pub value: f64,
    #[serde(default)]
    pub applied_at: Option<DateTime<Utc>>,
}

/// Body of `POST /products`.
#[derive(Debug, Serialize)]
pub struct NewProductBody<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(with = "decimal::cents")]
    pub price: i64,
    pub stock: i64,
}

/// Body of `PATCH /products/{id}`; absent fields are left unchanged.
#[derive(Debug, Serialize)]
pub struct UpdateProductBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "decimal::cents_option"
    )]
    pub price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
}

impl From<AppliedDiscountRecord> for DomainAppliedDiscount {
    fn from(value: AppliedDiscountRecord) -> Self {
        Self {
            kind: value.kind,
            value: value.value,
            applied_at: value.applied_at,
        }
    }
}

impl From<ProductRecord> for DomainProduct {
    fn from(value: ProductRecord) -> Self {
        let final_price_cents = value.final_price.unwrap_or(value.price);
        let product = Self {
            id: value.id,
            name: value.name,
            description: value.description.filter(|text| !text.trim().is_empty()),
            stock: value.stock,
            is_out_of_stock: value.is_out_of_stock,
            price_cents: value.price,
            final_price_cents,
            discount: value.discount.map(Into::into),
            has_coupon_applied: value.has_coupon_applied,
            coupon_code: value.coupon_code,
            created_at: value.created_at,
            updated_at: value.updated_at,
        };

        if !product.pricing_consistent() {
            log::warn!(
                "Product {} has inconsistent pricing: price={} final={} discount={:?}",
                product.id,
                product.price_cents,
                product.final_price_cents,
                product.discount
            );
        }

        product
    }
}

impl<'a> From<&'a DomainNewProduct> for NewProductBody<'a> {
    fn from(value: &'a DomainNewProduct) -> Self {
        Self {
            name: value.name.as_str(),
            description: value.description.as_deref(),
            price: value.price_cents,
            stock: value.stock,
        }
    }
}

impl<'a> From<&'a DomainUpdateProduct> for UpdateProductBody<'a> {
    fn from(value: &'a DomainUpdateProduct) -> Self {
        Self {
            name: value.name.as_deref(),
            description: value.description.as_deref(),
            price: value.price_cents,
            stock: value.stock,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_backend_product_with_discount() {
        let raw = json!({
            "id": 7,
            "name": "Coffee",
            "description": "Dark roast",
            "stock": 0,
            "is_out_of_stock": true,
            "price": 20.00,
            "finalPrice": 18.0,
            "discount": {"type": "PERCENT", "value": 10, "applied_at": "2024-01-01T00:00:00Z"},
            "has_coupon_applied": true,
            "coupon_code": "SAVE10"
        });

        let record: ProductRecord = serde_json::from_value(raw).expect("record should decode");
        let product = DomainProduct::from(record);

        assert_eq!(product.price_cents, 2000);
        assert_eq!(product.final_price_cents, 1800);
        assert!(product.is_out_of_stock);
        assert!(product.has_coupon_applied);
        assert_eq!(product.coupon_code.as_deref(), Some("SAVE10"));
        let discount = product.discount.expect("discount present");
        assert_eq!(discount.kind, DiscountKind::Percent);
        assert_eq!(discount.value, 10.0);
        assert!(discount.applied_at.is_some());
    }

    #[test]
    fn missing_final_price_falls_back_to_base_price() {
        let raw = json!({"id": 1, "name": "Tea", "stock": 4, "price": "3.5"});

        let record: ProductRecord = serde_json::from_value(raw).expect("record should decode");
        let product = DomainProduct::from(record);

        assert_eq!(product.price_cents, 350);
        assert_eq!(product.final_price_cents, 350);
        assert!(product.discount.is_none());
        assert!(product.pricing_consistent());
    }

    #[test]
    fn accepts_camel_case_coupon_flag() {
        let raw = json!({"id": 1, "name": "Tea", "price": 1, "hasCouponApplied": true});

        let record: ProductRecord = serde_json::from_value(raw).expect("record should decode");

        assert!(record.has_coupon_applied);
    }

    #[test]
    fn update_body_skips_absent_fields() {
        let update = DomainUpdateProduct::new().price_cents(1999).stock(3);

        let body = serde_json::to_value(UpdateProductBody::from(&update)).expect("serialize");

        assert_eq!(body, json!({"price": 19.99, "stock": 3}));
    }

    #[test]
    fn new_product_body_omits_missing_description() {
        let product = DomainNewProduct::new("X", 1000, 5);

        let body = serde_json::to_value(NewProductBody::from(&product)).expect("serialize");

        assert_eq!(body, json!({"name": "X", "price": 10.0, "stock": 5}));
    }
}
