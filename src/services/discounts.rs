use chrono::Utc;
use serde::Serialize;

use crate::api::{CouponReader, DiscountWriter};
use crate::domain::coupon::Coupon;
use crate::domain::product::Product;
use crate::services::products::ProductView;
use crate::services::{ServiceError, ServiceResult};

/// Upper bound for direct percentage discounts unless configured otherwise.
pub const DEFAULT_PERCENT_MAX: f64 = 80.0;

/// Fallback used when a failed discount call carries no usable message.
pub const DISCOUNT_ERROR_FALLBACK: &str = "Unknown error while applying the discount.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountOutcome {
    /// The catalog API accepted the change and the modal closed.
    Applied,
    /// The modal was not open; nothing was sent.
    NoTarget,
}

/// Modal used to apply or remove a discount on one product.
#[derive(Debug, Clone)]
pub struct DiscountModal {
    target: Option<Product>,
    percent_max: f64,
}

impl Default for DiscountModal {
    fn default() -> Self {
        Self::new(DEFAULT_PERCENT_MAX)
    }
}

impl DiscountModal {
    pub fn new(percent_max: f64) -> Self {
        Self {
            target: None,
            percent_max,
        }
    }

    pub fn open(&mut self, product: Product) {
        self.target = Some(product);
    }

    pub fn close(&mut self) {
        self.target = None;
    }

    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<&Product> {
        self.target.as_ref()
    }

    pub fn percent_max(&self) -> f64 {
        self.percent_max
    }

    pub async fn apply_coupon<C>(
        &mut self,
        client: &C,
        code: &str,
    ) -> ServiceResult<DiscountOutcome>
    where
        C: DiscountWriter + ?Sized,
    {
        let Some(product_id) = self.target_id() else {
            return Ok(DiscountOutcome::NoTarget);
        };

        let code = normalize_coupon_code(code);
        if code.is_empty() {
            return Err(ServiceError::Form("Enter a coupon code.".to_string()));
        }

        client
            .apply_coupon(product_id, &code)
            .await
            .map_err(|err| ServiceError::from_api(&err, DISCOUNT_ERROR_FALLBACK))?;

        log::info!("Applied coupon {code} to product {product_id}");
        self.close();
        Ok(DiscountOutcome::Applied)
    }

    pub async fn apply_percentage<C>(
        &mut self,
        client: &C,
        percentage: f64,
    ) -> ServiceResult<DiscountOutcome>
    where
        C: DiscountWriter + ?Sized,
    {
        let Some(product_id) = self.target_id() else {
            return Ok(DiscountOutcome::NoTarget);
        };

        validate_percentage(percentage, self.percent_max)?;

        client
            .apply_percentage(product_id, percentage)
            .await
            .map_err(|err| ServiceError::from_api(&err, DISCOUNT_ERROR_FALLBACK))?;

        log::info!("Applied {percentage}% discount to product {product_id}");
        self.close();
        Ok(DiscountOutcome::Applied)
    }

    pub async fn remove_discount<C>(&mut self, client: &C) -> ServiceResult<DiscountOutcome>
    where
        C: DiscountWriter + ?Sized,
    {
        let Some(product_id) = self.target_id() else {
            return Ok(DiscountOutcome::NoTarget);
        };

        client
            .remove_discount(product_id)
            .await
            .map_err(|err| ServiceError::from_api(&err, DISCOUNT_ERROR_FALLBACK))?;

        log::info!("Removed discount from product {product_id}");
        self.close();
        Ok(DiscountOutcome::Applied)
    }

    /// Coupons valid right now, sorted by code, for the picker.
    pub async fn coupons<C>(&self, client: &C) -> ServiceResult<Vec<Coupon>>
    where
        C: CouponReader + ?Sized,
    {
        let now = Utc::now();
        let mut coupons: Vec<Coupon> = client
            .list_coupons()
            .await?
            .into_iter()
            .filter(|coupon| coupon.is_valid_at(now))
            .collect();
        coupons.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(coupons)
    }

    /// View model for the open modal; `None` while closed. A failed coupon
    /// lookup is shown inline and never blocks the modal.
    pub fn view(
        &self,
        coupons: ServiceResult<Vec<Coupon>>,
        error: Option<String>,
    ) -> Option<DiscountModalView> {
        let product = self.target.as_ref()?;
        let (coupons, coupons_error) = match coupons {
            Ok(coupons) => (coupons.iter().map(CouponOption::from).collect(), None),
            Err(err) => {
                log::warn!("Failed to load coupons: {err}");
                (Vec::new(), Some("Coupons are unavailable right now.".to_string()))
            }
        };

        Some(DiscountModalView {
            product: ProductView::from(product),
            percent_max: self.percent_max,
            coupons,
            coupons_error,
            error,
        })
    }

    fn target_id(&self) -> Option<i64> {
        self.target.as_ref().map(|product| product.id)
    }
}

#[derive(Debug, Serialize)]
pub struct DiscountModalView {
    pub product: ProductView,
    pub percent_max: f64,
    pub coupons: Vec<CouponOption>,
    pub coupons_error: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CouponOption {
    pub code: String,
    pub label: String,
    pub one_shot: bool,
}

impl From<&Coupon> for CouponOption {
    fn from(coupon: &Coupon) -> Self {
        Self {
            code: coupon.code.clone(),
            label: coupon.label(),
            one_shot: coupon.one_shot,
        }
    }
}

/// Coupon codes are case-insensitive on input and stored upper-case.
pub fn normalize_coupon_code(code: &str) -> String {
    code.trim().to_uppercase()
}

fn validate_percentage(percentage: f64, max: f64) -> ServiceResult<()> {
    if percentage.is_finite() && (1.0..=max).contains(&percentage) {
        Ok(())
    } else {
        Err(ServiceError::Form(format!(
            "Discount must be between 1% and {max}%."
        )))
    }
}
