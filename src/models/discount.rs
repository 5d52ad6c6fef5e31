use serde::Serialize;

/// Body of `POST /products/{id}/discount/coupon`.
#[derive(Debug, Serialize)]
pub struct ApplyCouponBody<'a> {
    pub code: &'a str,
}

/// Body of `POST /products/{id}/discount/percent`.
#[derive(Debug, Serialize)]
pub struct ApplyPercentageBody {
    pub percentage: f64,
}
