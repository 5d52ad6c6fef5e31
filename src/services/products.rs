use serde::Serialize;

use crate::DEFAULT_PAGE_SIZE;
use crate::api::errors::ApiResult;
use crate::api::{ProductReader, ProductWriter};
use crate::domain::product::{
    DiscountKind, FilterPatch, Meta, NewProduct, Product, ProductFilters, ProductListQuery,
    ProductPage, UpdateProduct, format_cents,
};
use crate::services::{ServiceError, ServiceResult};

/// Banner shown when the list cannot be loaded.
pub const LIST_ERROR_MESSAGE: &str = "Failed to load products. Is the catalog API running?";

/// Fallback used when a failed save carries no usable message.
pub const SAVE_ERROR_FALLBACK: &str = "Unknown error while saving the product.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    Idle,
    Loading,
    Loaded,
    Error,
}

/// Handle for one in-flight list request.
///
/// Only the most recently issued ticket may write its result back.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    sequence: u64,
    query: ProductListQuery,
}

impl FetchTicket {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn query(&self) -> &ProductListQuery {
        &self.query
    }
}

/// Client-side state of the product list.
#[derive(Debug, Clone)]
pub struct ProductController {
    products: Vec<Product>,
    meta: Option<Meta>,
    status: FetchStatus,
    error: Option<String>,
    page: usize,
    filters: ProductFilters,
    sequence: u64,
}

impl Default for ProductController {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductController {
    pub fn new() -> Self {
        Self {
            products: Vec::new(),
            meta: None,
            status: FetchStatus::Idle,
            error: None,
            page: 0,
            filters: ProductFilters::default(),
            sequence: 0,
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn meta(&self) -> Option<&Meta> {
        self.meta.as_ref()
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == FetchStatus::Loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn filters(&self) -> &ProductFilters {
        &self.filters
    }

    /// Product from the currently loaded page, if present.
    pub fn find(&self, id: i64) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// Start a list request for the current page and filters.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.sequence += 1;
        self.status = FetchStatus::Loading;
        self.error = None;

        let query =
            ProductListQuery::new(self.page, DEFAULT_PAGE_SIZE).filters(self.filters.clone());
        FetchTicket {
            sequence: self.sequence,
            query,
        }
    }

    /// Store the outcome of `ticket`. Returns `false` when a newer fetch was
    /// started in the meantime and the result was discarded.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: ApiResult<ProductPage>) -> bool {
        if ticket.sequence != self.sequence {
            log::debug!(
                "Discarding stale product list response {} (latest is {})",
                ticket.sequence,
                self.sequence
            );
            return false;
        }

        match result {
            Ok(page) => {
                self.products = page.items;
                self.meta = Some(page.meta);
                self.status = FetchStatus::Loaded;
            }
            Err(err) => {
                log::error!("Failed to load products: {err}");
                self.status = FetchStatus::Error;
                self.error = Some(LIST_ERROR_MESSAGE.to_string());
            }
        }

        true
    }

    /// Reload the list with the current page and filters.
    pub async fn fetch_products<C>(&mut self, client: &C)
    where
        C: ProductReader + ?Sized,
    {
        let ticket = self.begin_fetch();
        let result = client.list_products(ticket.query().clone()).await;
        self.complete_fetch(ticket, result);
    }

    /// Merge `patch` into the filters and go back to the first page.
    pub fn set_filters(&mut self, patch: FilterPatch) {
        self.filters.merge(patch);
        self.page = 0;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Create a product, or update `editing_id` when set, then reload the
    /// list. A failure leaves the controller untouched.
    pub async fn save<C>(
        &mut self,
        client: &C,
        draft: NewProduct,
        editing_id: Option<i64>,
    ) -> ServiceResult<Product>
    where
        C: ProductReader + ProductWriter + ?Sized,
    {
        let saved = match editing_id {
            Some(product_id) => {
                client
                    .update_product(product_id, &UpdateProduct::from(&draft))
                    .await
            }
            None => client.create_product(&draft).await,
        }
        .map_err(|err| ServiceError::from_api(&err, SAVE_ERROR_FALLBACK))?;

        self.fetch_products(client).await;
        Ok(saved)
    }

    /// Delete `product_id` once `confirm` agrees. Failures are only logged.
    pub async fn delete_by_id<C, F>(&mut self, client: &C, product_id: i64, confirm: F) -> bool
    where
        C: ProductReader + ProductWriter + ?Sized,
        F: FnOnce(i64) -> bool,
    {
        if !confirm(product_id) {
            return false;
        }

        match client.delete_product(product_id).await {
            Ok(()) => {
                self.fetch_products(client).await;
                true
            }
            Err(err) => {
                log::error!("Failed to delete product {product_id}: {err}");
                false
            }
        }
    }

    pub async fn get_by_id<C>(&self, client: &C, product_id: i64) -> ServiceResult<Product>
    where
        C: ProductReader + ?Sized,
    {
        client.get_product(product_id).await.map_err(ServiceError::from)
    }

    /// Snapshot for the list template.
    pub fn view(&self) -> ProductListView {
        ProductListView {
            products: self.products.iter().map(ProductView::from).collect(),
            pagination: self.meta.as_ref().map(PaginationView::from),
            status: self.status,
            error: self.error.clone(),
            filters: self.filters.clone(),
        }
    }
}

/// Data required to render the products list.
#[derive(Debug, Serialize)]
pub struct ProductListView {
    pub products: Vec<ProductView>,
    pub pagination: Option<PaginationView>,
    pub status: FetchStatus,
    pub error: Option<String>,
    pub filters: ProductFilters,
}

/// View model for one table row.
#[derive(Debug, Serialize)]
pub struct ProductView {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub stock: i64,
    pub is_out_of_stock: bool,
    pub price: String,
    pub final_price: String,
    pub has_discount: bool,
    pub discount_label: Option<String>,
    pub has_coupon_applied: bool,
    pub coupon_code: Option<String>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        let discount_label = product.discount.as_ref().map(|discount| match discount.kind {
            DiscountKind::Percent => format!("-{}%", discount.value),
            DiscountKind::Fixed => format!("-{:.2}", discount.value),
        });

        Self {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            stock: product.stock,
            is_out_of_stock: product.is_out_of_stock,
            price: format_cents(product.price_cents),
            final_price: format_cents(product.final_price_cents),
            has_discount: product.has_discount(),
            discount_label,
            has_coupon_applied: product.has_coupon_applied,
            coupon_code: product.coupon_code.clone(),
        }
    }
}

/// Pager state. `page` is zero-based, `number` is what users see.
#[derive(Debug, Serialize)]
pub struct PaginationView {
    pub page: usize,
    pub number: usize,
    pub total_pages: usize,
    pub total_items: u64,
    pub previous: Option<usize>,
    pub next: Option<usize>,
    pub visible: bool,
}

impl From<&Meta> for PaginationView {
    fn from(meta: &Meta) -> Self {
        Self {
            page: meta.page,
            number: meta.page + 1,
            total_pages: meta.total_pages,
            total_items: meta.total_items,
            previous: meta.has_previous().then(|| meta.page - 1),
            next: meta.has_next().then(|| meta.page + 1),
            visible: meta.total_pages > 1,
        }
    }
}
