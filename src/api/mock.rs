use async_trait::async_trait;
use mockall::mock;

use super::{CouponReader, DiscountWriter, ProductReader, ProductWriter};
use crate::api::errors::ApiResult;
use crate::domain::{
    coupon::Coupon,
    product::{NewProduct, Product, ProductListQuery, ProductPage, UpdateProduct},
};

mock! {
    pub ProductReader {}

    #[async_trait]
    impl ProductReader for ProductReader {
        async fn list_products(&self, query: ProductListQuery) -> ApiResult<ProductPage>;
        async fn get_product(&self, id: i64) -> ApiResult<Product>;
    }
}

mock! {
    pub ProductWriter {}

    #[async_trait]
    impl ProductWriter for ProductWriter {
        async fn create_product(&self, new_product: &NewProduct) -> ApiResult<Product>;
        async fn update_product(
            &self,
            product_id: i64,
            updates: &UpdateProduct,
        ) -> ApiResult<Product>;
        async fn delete_product(&self, product_id: i64) -> ApiResult<()>;
    }
}

mock! {
    pub DiscountWriter {}

    #[async_trait]
    impl DiscountWriter for DiscountWriter {
        async fn apply_coupon(&self, product_id: i64, code: &str) -> ApiResult<()>;
        async fn apply_percentage(&self, product_id: i64, percentage: f64) -> ApiResult<()>;
        async fn remove_discount(&self, product_id: i64) -> ApiResult<()>;
    }
}

mock! {
    pub CouponReader {}

    #[async_trait]
    impl CouponReader for CouponReader {
        async fn list_coupons(&self) -> ApiResult<Vec<Coupon>>;
    }
}
