//! Helpers for integration tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use catalog_admin::api::errors::{ApiError, ApiResult};
use catalog_admin::api::{CouponReader, DiscountWriter, ProductReader, ProductWriter};
use catalog_admin::domain::coupon::Coupon;
use catalog_admin::domain::product::{
    AppliedDiscount, DiscountKind, Meta, NewProduct, Product, ProductListQuery, ProductPage,
    UpdateProduct, parse_decimal_cents,
};

/// In-process stand-in for the catalog API. Derived fields (`finalPrice`,
/// `is_out_of_stock`) are computed the same way the real backend does.
#[derive(Default)]
pub struct InMemoryCatalog {
    state: Mutex<CatalogState>,
    fail_lists: AtomicBool,
    fail_deletes: AtomicBool,
    list_calls: AtomicUsize,
}

#[derive(Default)]
struct CatalogState {
    next_id: i64,
    products: Vec<StoredProduct>,
    coupons: Vec<Coupon>,
}

#[derive(Clone)]
struct StoredProduct {
    id: i64,
    name: String,
    description: Option<String>,
    price_cents: i64,
    stock: i64,
    discount: Option<AppliedDiscount>,
    coupon_code: Option<String>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a product directly and return its id.
    pub fn seed_product(&self, name: &str, price_cents: i64, stock: i64) -> i64 {
        let mut state = self.lock();
        state.next_id += 1;
        let id = state.next_id;
        state.products.push(StoredProduct {
            id,
            name: name.to_string(),
            description: None,
            price_cents,
            stock,
            discount: None,
            coupon_code: None,
        });
        id
    }

    pub fn seed_coupon(&self, code: &str, kind: DiscountKind, value: f64) {
        let now = Utc::now();
        self.lock().coupons.push(Coupon {
            code: code.to_string(),
            kind,
            value,
            one_shot: false,
            valid_from: Some(now - chrono::Duration::days(1)),
            valid_until: Some(now + chrono::Duration::days(30)),
            created_at: Some(now),
        });
    }

    pub fn fail_lists(&self, fail: bool) {
        self.fail_lists.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn product(&self, id: i64) -> Option<Product> {
        self.lock()
            .products
            .iter()
            .find(|product| product.id == id)
            .map(to_domain)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CatalogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_product<T>(
        &self,
        id: i64,
        f: impl FnOnce(&mut StoredProduct) -> ApiResult<T>,
    ) -> ApiResult<T> {
        let mut state = self.lock();
        match state.products.iter_mut().find(|product| product.id == id) {
            Some(product) => f(product),
            None => Err(ApiError::NotFound {
                message: Some(format!("Product with ID {id} not found.")),
            }),
        }
    }
}

fn final_price(price_cents: i64, discount: Option<&AppliedDiscount>) -> i64 {
    match discount {
        None => price_cents,
        Some(discount) => match discount.kind {
            DiscountKind::Percent => {
                price_cents - (price_cents as f64 * discount.value / 100.0).round() as i64
            }
            DiscountKind::Fixed => price_cents - (discount.value * 100.0).round() as i64,
        },
    }
}

fn to_domain(stored: &StoredProduct) -> Product {
    Product {
        id: stored.id,
        name: stored.name.clone(),
        description: stored.description.clone(),
        stock: stored.stock,
        is_out_of_stock: stored.stock == 0,
        price_cents: stored.price_cents,
        final_price_cents: final_price(stored.price_cents, stored.discount.as_ref()),
        discount: stored.discount.clone(),
        has_coupon_applied: stored.coupon_code.is_some(),
        coupon_code: stored.coupon_code.clone(),
        created_at: None,
        updated_at: None,
    }
}

fn attach_discount(
    product: &mut StoredProduct,
    discount: AppliedDiscount,
    coupon_code: Option<String>,
) -> ApiResult<()> {
    if product.discount.is_some() {
        return Err(ApiError::Rejected {
            status: 409,
            message: Some("This product already has an active discount.".to_string()),
        });
    }
    if final_price(product.price_cents, Some(&discount)) < 1 {
        return Err(ApiError::Rejected {
            status: 422,
            message: Some("The discount results in a final price below 0.01.".to_string()),
        });
    }
    product.discount = Some(discount);
    product.coupon_code = coupon_code;
    Ok(())
}

#[async_trait]
impl ProductReader for InMemoryCatalog {
    async fn list_products(&self, query: ProductListQuery) -> ApiResult<ProductPage> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(ApiError::Network("connection refused".to_string()));
        }

        let state = self.lock();
        let filters = &query.filters;
        let search = filters.search.as_ref().map(|term| term.to_lowercase());
        let min = filters.min_price.as_deref().and_then(parse_decimal_cents);
        let max = filters.max_price.as_deref().and_then(parse_decimal_cents);

        let mut matching: Vec<Product> = state
            .products
            .iter()
            .filter(|product| {
                search.as_ref().is_none_or(|term| {
                    product.name.to_lowercase().contains(term)
                        || product
                            .description
                            .as_ref()
                            .is_some_and(|text| text.to_lowercase().contains(term))
                })
            })
            .filter(|product| min.is_none_or(|min| product.price_cents >= min))
            .filter(|product| max.is_none_or(|max| product.price_cents <= max))
            .filter(|product| {
                filters
                    .has_discount
                    .is_none_or(|flag| product.discount.is_some() == flag)
            })
            .filter(|product| {
                filters
                    .only_out_of_stock
                    .is_none_or(|flag| !flag || product.stock == 0)
            })
            .filter(|product| {
                filters
                    .with_coupon_applied
                    .is_none_or(|flag| product.coupon_code.is_some() == flag)
            })
            .map(to_domain)
            .collect();
        matching.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

        let total_items = matching.len();
        let total_pages = total_items.div_ceil(query.size.max(1));
        let items = matching
            .into_iter()
            .skip(query.page * query.size)
            .take(query.size)
            .collect();

        Ok(ProductPage {
            items,
            meta: Meta {
                page: query.page,
                limit: query.size,
                total_items: total_items as u64,
                total_pages,
            },
        })
    }

    async fn get_product(&self, id: i64) -> ApiResult<Product> {
        self.with_product(id, |product| Ok(to_domain(product)))
    }
}

#[async_trait]
impl ProductWriter for InMemoryCatalog {
    async fn create_product(&self, new_product: &NewProduct) -> ApiResult<Product> {
        let mut state = self.lock();
        if state
            .products
            .iter()
            .any(|product| product.name.eq_ignore_ascii_case(&new_product.name))
        {
            return Err(ApiError::Rejected {
                status: 409,
                message: Some(format!(
                    "A product named '{}' already exists.",
                    new_product.name
                )),
            });
        }

        state.next_id += 1;
        let stored = StoredProduct {
            id: state.next_id,
            name: new_product.name.clone(),
            description: new_product.description.clone(),
            price_cents: new_product.price_cents,
            stock: new_product.stock,
            discount: None,
            coupon_code: None,
        };
        let product = to_domain(&stored);
        state.products.push(stored);
        Ok(product)
    }

    async fn update_product(&self, product_id: i64, updates: &UpdateProduct) -> ApiResult<Product> {
        self.with_product(product_id, |product| {
            if let Some(name) = updates.name.as_ref() {
                product.name = name.clone();
            }
            if let Some(description) = updates.description.as_ref() {
                product.description = Some(description.clone());
            }
            if let Some(price_cents) = updates.price_cents {
                product.price_cents = price_cents;
            }
            if let Some(stock) = updates.stock {
                product.stock = stock;
            }
            Ok(to_domain(product))
        })
    }

    async fn delete_product(&self, product_id: i64) -> ApiResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(ApiError::Network("connection reset".to_string()));
        }

        let mut state = self.lock();
        let before = state.products.len();
        state.products.retain(|product| product.id != product_id);
        if state.products.len() == before {
            return Err(ApiError::NotFound { message: None });
        }
        Ok(())
    }
}

#[async_trait]
impl DiscountWriter for InMemoryCatalog {
    async fn apply_coupon(&self, product_id: i64, code: &str) -> ApiResult<()> {
        let coupon = self
            .lock()
            .coupons
            .iter()
            .find(|coupon| coupon.code == code.trim().to_uppercase())
            .cloned()
            .ok_or_else(|| ApiError::NotFound {
                message: Some(format!("Coupon with code '{code}' not found.")),
            })?;

        self.with_product(product_id, |product| {
            let discount = AppliedDiscount {
                kind: coupon.kind,
                value: coupon.value,
                applied_at: Some(Utc::now()),
            };
            attach_discount(product, discount, Some(coupon.code.clone()))
        })
    }

    async fn apply_percentage(&self, product_id: i64, percentage: f64) -> ApiResult<()> {
        self.with_product(product_id, |product| {
            let discount = AppliedDiscount {
                kind: DiscountKind::Percent,
                value: percentage,
                applied_at: Some(Utc::now()),
            };
            attach_discount(product, discount, None)
        })
    }

    async fn remove_discount(&self, product_id: i64) -> ApiResult<()> {
        self.with_product(product_id, |product| {
            if product.discount.take().is_none() {
                return Err(ApiError::NotFound {
                    message: Some(format!(
                        "Product with ID {product_id} has no active discount to remove."
                    )),
                });
            }
            product.coupon_code = None;
            Ok(())
        })
    }
}

#[async_trait]
impl CouponReader for InMemoryCatalog {
    async fn list_coupons(&self) -> ApiResult<Vec<Coupon>> {
        Ok(self.lock().coupons.clone())
    }
}
