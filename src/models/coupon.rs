use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::coupon::Coupon;
use crate::domain::product::DiscountKind;
use crate::models::decimal;

/// Coupon as listed by `GET /coupons`.
#[derive(Debug, Clone, Deserialize)]
pub struct CouponRecord {
    #[serde(default)]
    pub id: Option<i64>,
    pub code: String,
    #[serde(rename = "type")]
    pub kind: DiscountKind,
    #[serde(deserialize_with = "decimal::float::deserialize")]
    pub value: f64,
    #[serde(default, alias = "oneShot")]
    pub one_shot: bool,
    #[serde(default, alias = "validFrom")]
    pub valid_from: Option<DateTime<Utc>>,
    #[serde(default, alias = "validUntil")]
    pub valid_until: Option<DateTime<Utc>>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<CouponRecord> for Coupon {
    fn from(value: CouponRecord) -> Self {
        Self {
            code: value.code.trim().to_uppercase(),
            kind: value.kind,
            value: value.value,
            one_shot: value.one_shot,
            valid_from: value.valid_from,
            valid_until: value.valid_until,
            created_at: value.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_fixed_coupon() {
        let raw = json!({
            "id": 3,
            "code": "FIVEOFF",
            "type": "FIXED",
            "value": "5.00",
            "one_shot": true,
            "valid_from": "2024-01-01T00:00:00Z",
            "valid_until": "2030-01-01T00:00:00Z"
        });

        let coupon: Coupon = serde_json::from_value::<CouponRecord>(raw)
            .expect("coupon should decode")
            .into();

        assert_eq!(coupon.code, "FIVEOFF");
        assert_eq!(coupon.kind, DiscountKind::Fixed);
        assert_eq!(coupon.value, 5.0);
        assert!(coupon.one_shot);
        assert!(coupon.valid_until.is_some());
        assert!(coupon.created_at.is_none());
    }
}
