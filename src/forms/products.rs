use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::product::{FilterPatch, NewProduct, Product, format_cents, parse_decimal_cents};
use crate::forms::{
    empty_string_as_none, optional_bool, sanitize_inline_text, sanitize_multiline_text,
};

const NAME_MIN_LEN: usize = 3;
const NAME_MAX_LEN: usize = 100;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

const DESCRIPTION_MAX_LEN: u64 = 300;

const STOCK_MAX: i64 = 999_999;

/// Eight integer digits, two fractional ones.
const PRICE_MAX_CENTS: i64 = 9_999_999_999;

/// Result type returned by the product form helpers.
pub type ProductFormResult<T> = Result<T, ProductFormError>;

/// Errors that can occur while processing product forms.
#[derive(Debug, Error)]
pub enum ProductFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("Name must have between 3 and 100 characters.")]
    InvalidName,
    #[error("Enter a valid price, e.g. 12.50 (got `{value}`).")]
    InvalidPrice { value: String },
    #[error("Price must be between 0.01 and 99999999.99.")]
    PriceOutOfRange,
    #[error("Stock must be a whole number between 0 and 999999.")]
    InvalidStock,
    #[error("Minimum price cannot exceed maximum price.")]
    InvalidPriceRange,
}

/// Create/edit product form. Values stay as typed so a failed submission can
/// be shown again unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProductForm {
    #[validate(length(max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = DESCRIPTION_MAX_LEN))]
    pub description: Option<String>,
    pub price: String,
    pub stock: String,
}

impl ProductForm {
    /// Initial values for editing `product`.
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: format_cents(product.price_cents),
            stock: product.stock.to_string(),
        }
    }

    /// Validates and sanitizes the payload into a domain `NewProduct`.
    pub fn into_new_product(self) -> ProductFormResult<NewProduct> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        let name_len = name.chars().count();
        if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&name_len) {
            return Err(ProductFormError::InvalidName);
        }

        let price_cents = parse_price(&self.price)?;
        if !(1..=PRICE_MAX_CENTS).contains(&price_cents) {
            return Err(ProductFormError::PriceOutOfRange);
        }

        let stock = self
            .stock
            .trim()
            .parse::<i64>()
            .map_err(|_| ProductFormError::InvalidStock)?;
        if !(0..=STOCK_MAX).contains(&stock) {
            return Err(ProductFormError::InvalidStock);
        }

        let mut new_product = NewProduct::new(name, price_cents, stock);

        let description = self
            .description
            .as_deref()
            .map(sanitize_multiline_text)
            .filter(|value| !value.is_empty());
        if let Some(description) = description {
            new_product = new_product.with_description(description);
        }

        Ok(new_product)
    }
}

fn parse_price(raw: &str) -> ProductFormResult<i64> {
    parse_decimal_cents(raw).ok_or_else(|| ProductFormError::InvalidPrice {
        value: raw.trim().to_string(),
    })
}

/// Price range and flag filters submitted from the list controls.
#[derive(Debug, Default, Deserialize)]
pub struct FilterForm {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub min_price: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub max_price: Option<String>,
    #[serde(default, deserialize_with = "optional_bool")]
    pub has_discount: Option<bool>,
    #[serde(default, deserialize_with = "optional_bool")]
    pub only_out_of_stock: Option<bool>,
    #[serde(default, deserialize_with = "optional_bool")]
    pub with_coupon_applied: Option<bool>,
}

impl FilterForm {
    /// Every field is sent, so blank bounds clear the stored ones.
    pub fn into_patch(self) -> ProductFormResult<FilterPatch> {
        let min = self.min_price.as_deref().map(parse_price).transpose()?;
        let max = self.max_price.as_deref().map(parse_price).transpose()?;
        if let (Some(min), Some(max)) = (min, max)
            && min > max
        {
            return Err(ProductFormError::InvalidPriceRange);
        }

        Ok(FilterPatch::new()
            .min_price(self.min_price.unwrap_or_default())
            .max_price(self.max_price.unwrap_or_default())
            .has_discount(self.has_discount)
            .only_out_of_stock(self.only_out_of_stock)
            .with_coupon_applied(self.with_coupon_applied))
    }
}

/// Live search box.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Zero-based page requested by the pager.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
}

/// Delete form; the browser sets `confirmed` after the user agreed.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteProductForm {
    #[serde(default)]
    pub confirmed: bool,
}
