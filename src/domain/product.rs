use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of price reduction attached to a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DiscountKind {
    /// Percentage of the base price.
    Percent,
    /// Fixed amount subtracted from the base price.
    Fixed,
}

/// Discount currently active on a product, as computed by the catalog API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedDiscount {
    pub kind: DiscountKind,
    /// Percentage (1-100) for `Percent`, currency units for `Fixed`.
    pub value: f64,
    pub applied_at: Option<DateTime<Utc>>,
}

/// Domain representation of a catalog product.
///
/// The client never owns an authoritative copy: every value here comes from
/// the catalog API and is replaced wholesale on the next fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier assigned by the catalog API.
    pub id: i64,
    /// Human-readable name of the product.
    pub name: String,
    /// Optional longer description shown in the table.
    pub description: Option<String>,
    /// Units available for sale.
    pub stock: i64,
    /// Derived server-side from `stock`.
    pub is_out_of_stock: bool,
    /// Base price in the smallest currency unit.
    pub price_cents: i64,
    /// Price after the active discount, in the smallest currency unit.
    pub final_price_cents: i64,
    /// Active discount, if any.
    pub discount: Option<AppliedDiscount>,
    /// Whether the active discount came from a coupon.
    pub has_coupon_applied: bool,
    /// Code of the applied coupon when the API reports it.
    pub coupon_code: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Whether a discount is currently active.
    pub fn has_discount(&self) -> bool {
        self.discount.is_some()
    }

    /// Checks `final <= price` and `discount.is_none() <=> final == price`.
    pub fn pricing_consistent(&self) -> bool {
        self.final_price_cents <= self.price_cents
            && (self.discount.is_none() == (self.final_price_cents == self.price_cents))
    }
}

/// Payload required to create a product.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub stock: i64,
}

impl NewProduct {
    /// Build a new product payload with the mandatory fields.
    pub fn new(name: impl Into<String>, price_cents: i64, stock: i64) -> Self {
        Self {
            name: name.into(),
            description: None,
            price_cents,
            stock,
        }
    }

    /// Attach a descriptive text to the product payload.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update sent with `PATCH`; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub stock: Option<i64>,
}

impl UpdateProduct {
    /// Create a patch object with no changes applied yet.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn price_cents(mut self, price_cents: i64) -> Self {
        self.price_cents = Some(price_cents);
        self
    }

    pub fn stock(mut self, stock: i64) -> Self {
        self.stock = Some(stock);
        self
    }
}

impl From<&NewProduct> for UpdateProduct {
    /// The edit form submits the whole editable subset.
    fn from(value: &NewProduct) -> Self {
        Self {
            name: Some(value.name.clone()),
            description: value.description.clone(),
            price_cents: Some(value.price_cents),
            stock: Some(value.stock),
        }
    }
}

/// Filters applied to the product listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductFilters {
    /// Free-text search over name and description.
    pub search: Option<String>,
    /// Lower price bound as typed by the user.
    pub min_price: Option<String>,
    /// Upper price bound as typed by the user.
    pub max_price: Option<String>,
    /// Restrict to products with (or without) an active discount.
    pub has_discount: Option<bool>,
    /// Restrict to products with zero stock.
    pub only_out_of_stock: Option<bool>,
    /// Restrict to products whose discount came from a coupon.
    pub with_coupon_applied: Option<bool>,
}

impl ProductFilters {
    /// Merge `patch` into the current filters. Empty strings clear a field.
    pub fn merge(&mut self, patch: FilterPatch) {
        if let Some(search) = patch.search {
            self.search = non_blank(search);
        }
        if let Some(min_price) = patch.min_price {
            self.min_price = non_blank(min_price);
        }
        if let Some(max_price) = patch.max_price {
            self.max_price = non_blank(max_price);
        }
        if let Some(flag) = patch.has_discount {
            self.has_discount = flag;
        }
        if let Some(flag) = patch.only_out_of_stock {
            self.only_out_of_stock = flag;
        }
        if let Some(flag) = patch.with_coupon_applied {
            self.with_coupon_applied = flag;
        }
    }

    /// Whether a price bound is set.
    pub fn has_price_range(&self) -> bool {
        self.min_price.is_some() || self.max_price.is_some()
    }

    /// Whether any filter at all is set.
    pub fn is_active(&self) -> bool {
        self.search.is_some()
            || self.has_price_range()
            || self.has_discount.is_some()
            || self.only_out_of_stock.is_some()
            || self.with_coupon_applied.is_some()
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Partial change to [`ProductFilters`]; untouched fields stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub search: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub has_discount: Option<Option<bool>>,
    pub only_out_of_stock: Option<Option<bool>>,
    pub with_coupon_applied: Option<Option<bool>>,
}

impl FilterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn min_price(mut self, value: impl Into<String>) -> Self {
        self.min_price = Some(value.into());
        self
    }

    pub fn max_price(mut self, value: impl Into<String>) -> Self {
        self.max_price = Some(value.into());
        self
    }

    pub fn has_discount(mut self, flag: Option<bool>) -> Self {
        self.has_discount = Some(flag);
        self
    }

    pub fn only_out_of_stock(mut self, flag: Option<bool>) -> Self {
        self.only_out_of_stock = Some(flag);
        self
    }

    pub fn with_coupon_applied(mut self, flag: Option<bool>) -> Self {
        self.with_coupon_applied = Some(flag);
        self
    }

    /// Patch that clears both price bounds.
    pub fn clear_price_range() -> Self {
        Self::new().min_price("").max_price("")
    }
}

/// Listing order requested from the catalog API.
pub const PRODUCT_SORT: &str = "name,asc";

/// Query definition used to list products.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductListQuery {
    /// Zero-based page index.
    pub page: usize,
    /// Page size.
    pub size: usize,
    pub filters: ProductFilters,
}

impl ProductListQuery {
    /// Construct a query for `page` with `size` items, sorted by name ascending.
    pub fn new(page: usize, size: usize) -> Self {
        Self {
            page,
            size,
            filters: ProductFilters::default(),
        }
    }

    pub fn filters(mut self, filters: ProductFilters) -> Self {
        self.filters = filters;
        self
    }

    /// Value of the `sort` query parameter.
    pub fn sort_param(&self) -> &'static str {
        PRODUCT_SORT
    }
}

/// Pagination descriptor returned alongside a list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Meta {
    /// Zero-based page index.
    pub page: usize,
    pub limit: usize,
    pub total_items: u64,
    pub total_pages: usize,
}

impl Meta {
    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }
}

/// One page of products as returned by the list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub meta: Meta,
}

/// Parse a decimal amount such as `12.5` or `12,50` into cents.
///
/// At most two fractional digits are accepted. Returns `None` for anything
/// that is not a plain non-negative decimal.
pub fn parse_decimal_cents(input: &str) -> Option<i64> {
    let normalized = input.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }

    let (whole, fraction) = match normalized.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (normalized.as_str(), ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if fraction.len() > 2 {
        return None;
    }
    let digits = |part: &str| part.chars().all(|ch| ch.is_ascii_digit());
    if !digits(whole) || !digits(fraction) {
        return None;
    }

    let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let fraction: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().ok()? * 10,
        _ => fraction.parse().ok()?,
    };

    whole.checked_mul(100)?.checked_add(fraction)
}

/// Render cents as a decimal string with two fractional digits.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(
        price_cents: i64,
        final_price_cents: i64,
        discount: Option<AppliedDiscount>,
    ) -> Product {
        Product {
            id: 1,
            name: "Widget".to_string(),
            description: None,
            stock: 3,
            is_out_of_stock: false,
            price_cents,
            final_price_cents,
            discount,
            has_coupon_applied: false,
            coupon_code: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn merge_keeps_untouched_fields_and_clears_blank_ones() {
        let mut filters = ProductFilters::default();
        filters.merge(FilterPatch::new().search("coffee").min_price("10"));
        filters.merge(FilterPatch::new().max_price("50"));

        assert_eq!(filters.search.as_deref(), Some("coffee"));
        assert_eq!(filters.min_price.as_deref(), Some("10"));
        assert_eq!(filters.max_price.as_deref(), Some("50"));

        filters.merge(FilterPatch::clear_price_range());
        assert_eq!(filters.search.as_deref(), Some("coffee"));
        assert!(!filters.has_price_range());

        filters.merge(FilterPatch::new().search("   "));
        assert!(!filters.is_active());
    }

    #[test]
    fn merge_sets_and_clears_flags() {
        let mut filters = ProductFilters::default();
        filters.merge(FilterPatch::new().has_discount(Some(false)));
        assert_eq!(filters.has_discount, Some(false));

        filters.merge(FilterPatch::new().only_out_of_stock(Some(true)));
        assert_eq!(filters.has_discount, Some(false));
        assert_eq!(filters.only_out_of_stock, Some(true));

        filters.merge(FilterPatch::new().has_discount(None));
        assert_eq!(filters.has_discount, None);
    }

    #[test]
    fn list_query_defaults_to_name_ascending() {
        let query = ProductListQuery::new(0, 10);
        assert_eq!(query.sort_param(), "name,asc");
        assert_eq!(query.page, 0);
        assert_eq!(query.size, 10);
    }

    #[test]
    fn parse_decimal_cents_accepts_common_inputs() {
        assert_eq!(parse_decimal_cents("12.34"), Some(1234));
        assert_eq!(parse_decimal_cents("12,5"), Some(1250));
        assert_eq!(parse_decimal_cents(" 7 "), Some(700));
        assert_eq!(parse_decimal_cents(".99"), Some(99));
        assert_eq!(parse_decimal_cents("1.234"), None);
        assert_eq!(parse_decimal_cents("-1"), None);
        assert_eq!(parse_decimal_cents("abc"), None);
        assert_eq!(parse_decimal_cents(""), None);
    }

    #[test]
    fn format_cents_pads_fraction() {
        assert_eq!(format_cents(1234), "12.34");
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(format_cents(-250), "-2.50");
    }

    #[test]
    fn pricing_consistency_tracks_discount_presence() {
        assert!(product(1000, 1000, None).pricing_consistent());
        assert!(!product(1000, 900, None).pricing_consistent());

        let discount = AppliedDiscount {
            kind: DiscountKind::Percent,
            value: 10.0,
            applied_at: None,
        };
        assert!(product(1000, 900, Some(discount.clone())).pricing_consistent());
        assert!(!product(1000, 1100, Some(discount)).pricing_consistent());
    }

    #[test]
    fn meta_navigation_bounds() {
        let meta = Meta {
            page: 0,
            limit: 10,
            total_items: 25,
            total_pages: 3,
        };
        assert!(!meta.has_previous());
        assert!(meta.has_next());

        let last = Meta { page: 2, ..meta };
        assert!(last.has_previous());
        assert!(!last.has_next());
    }
}
