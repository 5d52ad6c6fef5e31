//! HTTP client for the remote catalog API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::api::errors::{ApiError, ApiResult};
use crate::domain::coupon::Coupon;
use crate::domain::product::{NewProduct, Product, ProductListQuery, ProductPage, UpdateProduct};
use crate::models::error::ErrorBody;

pub mod coupon;
pub mod discount;
pub mod errors;
pub mod product;

#[cfg(test)]
pub mod mock;

#[derive(Clone)]
/// reqwest-backed client that implements every catalog trait.
pub struct HttpCatalogClient {
    http: reqwest::Client, // reqwest::Client is an Arc internally
    base_url: String,
}

impl HttpCatalogClient {
    /// Build a client for `base_url` (e.g. `http://localhost:8080/api/v1`).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Wrap an already configured `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send `request` and turn non-success statuses into [`ApiError`].
    async fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let message = ErrorBody::message_from(&body);
        log::debug!("Catalog API answered {status}: {message:?}");
        Err(ApiError::from_status(status.as_u16(), message))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = self.send(request).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Read-only operations over catalog products.
#[async_trait]
pub trait ProductReader: Send + Sync {
    async fn list_products(&self, query: ProductListQuery) -> ApiResult<ProductPage>;
    async fn get_product(&self, id: i64) -> ApiResult<Product>;
}

/// Write operations over catalog products.
#[async_trait]
pub trait ProductWriter: Send + Sync {
    async fn create_product(&self, new_product: &NewProduct) -> ApiResult<Product>;
    async fn update_product(&self, product_id: i64, updates: &UpdateProduct)
    -> ApiResult<Product>;
    async fn delete_product(&self, product_id: i64) -> ApiResult<()>;
}

/// Discount operations on a single product.
#[async_trait]
pub trait DiscountWriter: Send + Sync {
    async fn apply_coupon(&self, product_id: i64, code: &str) -> ApiResult<()>;
    async fn apply_percentage(&self, product_id: i64, percentage: f64) -> ApiResult<()>;
    async fn remove_discount(&self, product_id: i64) -> ApiResult<()>;
}

/// Read-only access to the coupon registry.
#[async_trait]
pub trait CouponReader: Send + Sync {
    async fn list_coupons(&self) -> ApiResult<Vec<Coupon>>;
}
