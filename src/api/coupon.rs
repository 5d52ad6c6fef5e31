use async_trait::async_trait;

use crate::api::errors::ApiResult;
use crate::api::{CouponReader, HttpCatalogClient};
use crate::domain::coupon::Coupon;
use crate::models::coupon::CouponRecord;

#[async_trait]
impl CouponReader for HttpCatalogClient {
    async fn list_coupons(&self) -> ApiResult<Vec<Coupon>> {
        let request = self.http.get(self.url("/coupons"));
        let records: Vec<CouponRecord> = self.send_json(request).await?;
        Ok(records.into_iter().map(Coupon::from).collect())
    }
}
