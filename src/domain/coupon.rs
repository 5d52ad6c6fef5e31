use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::product::DiscountKind;

/// Coupon known to the catalog API. The lifecycle is owned by the API; the
/// admin front end only lists coupons and references them by code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    /// Unique, upper-case code.
    pub code: String,
    pub kind: DiscountKind,
    /// Percentage for `Percent` coupons, currency units for `Fixed` ones.
    pub value: f64,
    /// Whether the coupon may be redeemed only once.
    pub one_shot: bool,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Coupon {
    /// Whether `now` falls inside the validity window. Open bounds always match.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        let started = self.valid_from.is_none_or(|from| now >= from);
        let not_expired = self.valid_until.is_none_or(|until| now <= until);
        started && not_expired
    }

    /// Short label used by the coupon picker, e.g. `SAVE10 (10%)`.
    pub fn label(&self) -> String {
        match self.kind {
            DiscountKind::Percent => format!("{} ({}%)", self.code, self.value),
            DiscountKind::Fixed => format!("{} (-{:.2})", self.code, self.value),
        }
    }
}
