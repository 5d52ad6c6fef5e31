use async_trait::async_trait;

use crate::api::errors::ApiResult;
use crate::api::{HttpCatalogClient, ProductReader, ProductWriter};
use crate::domain::product::{
    NewProduct, Product, ProductListQuery, ProductPage, UpdateProduct, format_cents,
    parse_decimal_cents,
};
use crate::models::page::PageRecord;
use crate::models::product::{NewProductBody, ProductRecord, UpdateProductBody};

#[async_trait]
impl ProductReader for HttpCatalogClient {
    async fn list_products(&self, query: ProductListQuery) -> ApiResult<ProductPage> {
        let params = list_params(&query);
        let request = self.http.get(self.url("/products")).query(&params);
        let page: PageRecord = self.send_json(request).await?;
        Ok(page.into())
    }

    async fn get_product(&self, id: i64) -> ApiResult<Product> {
        let request = self.http.get(self.url(&format!("/products/{id}")));
        let record: ProductRecord = self.send_json(request).await?;
        Ok(record.into())
    }
}

#[async_trait]
impl ProductWriter for HttpCatalogClient {
    async fn create_product(&self, new_product: &NewProduct) -> ApiResult<Product> {
        let request = self
            .http
            .post(self.url("/products"))
            .json(&NewProductBody::from(new_product));
        let record: ProductRecord = self.send_json(request).await?;
        Ok(record.into())
    }

    async fn update_product(
        &self,
        product_id: i64,
        updates: &UpdateProduct,
    ) -> ApiResult<Product> {
        let request = self
            .http
            .patch(self.url(&format!("/products/{product_id}")))
            .json(&UpdateProductBody::from(updates));
        let record: ProductRecord = self.send_json(request).await?;
        Ok(record.into())
    }

    async fn delete_product(&self, product_id: i64) -> ApiResult<()> {
        let request = self
            .http
            .delete(self.url(&format!("/products/{product_id}")));
        self.send(request).await?;
        Ok(())
    }
}

/// Query string for `GET /products`. Unset filters are omitted.
fn list_params(query: &ProductListQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("page", query.page.to_string()),
        ("size", query.size.to_string()),
        ("sort", query.sort_param().to_string()),
    ];

    let filters = &query.filters;
    if let Some(search) = filters.search.as_ref() {
        params.push(("search", search.clone()));
    }
    if let Some(min_price) = filters.min_price.as_ref() {
        params.push(("minPrice", price_param(min_price)));
    }
    if let Some(max_price) = filters.max_price.as_ref() {
        params.push(("maxPrice", price_param(max_price)));
    }
    if let Some(flag) = filters.has_discount {
        params.push(("hasDiscount", flag.to_string()));
    }
    if let Some(flag) = filters.only_out_of_stock {
        params.push(("onlyOutOfStock", flag.to_string()));
    }
    if let Some(flag) = filters.with_coupon_applied {
        params.push(("withCouponApplied", flag.to_string()));
    }

    params
}

/// Normalize `12,5` to `12.50`; anything unparsable is forwarded untouched
/// and left for the catalog API to reject.
fn price_param(raw: &str) -> String {
    match parse_decimal_cents(raw) {
        Some(cents) => format_cents(cents),
        None => raw.trim().to_string(),
    }
}
