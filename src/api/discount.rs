use async_trait::async_trait;

use crate::api::errors::ApiResult;
use crate::api::{DiscountWriter, HttpCatalogClient};
use crate::models::discount::{ApplyCouponBody, ApplyPercentageBody};

#[async_trait]
impl DiscountWriter for HttpCatalogClient {
    async fn apply_coupon(&self, product_id: i64, code: &str) -> ApiResult<()> {
        let request = self
            .http
            .post(self.url(&format!("/products/{product_id}/discount/coupon")))
            .json(&ApplyCouponBody { code });
        self.send(request).await?;
        Ok(())
    }

    async fn apply_percentage(&self, product_id: i64, percentage: f64) -> ApiResult<()> {
        let request = self
            .http
            .post(self.url(&format!("/products/{product_id}/discount/percent")))
            .json(&ApplyPercentageBody { percentage });
        self.send(request).await?;
        Ok(())
    }

    async fn remove_discount(&self, product_id: i64) -> ApiResult<()> {
        let request = self
            .http
            .delete(self.url(&format!("/products/{product_id}/discount")));
        self.send(request).await?;
        Ok(())
    }
}
