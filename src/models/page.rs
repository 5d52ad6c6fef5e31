use serde::Deserialize;

use crate::domain::product::{Meta, Product, ProductPage};
use crate::models::product::ProductRecord;

/// Envelope of `GET /products`.
#[derive(Debug, Clone, Deserialize)]
pub struct PageRecord {
    #[serde(default)]
    pub data: Vec<ProductRecord>,
    pub meta: MetaRecord,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaRecord {
    pub page: usize,
    pub limit: usize,
    pub total_items: u64,
    pub total_pages: usize,
}

impl From<MetaRecord> for Meta {
    fn from(value: MetaRecord) -> Self {
        Self {
            page: value.page,
            limit: value.limit,
            total_items: value.total_items,
            total_pages: value.total_pages,
        }
    }
}

impl From<PageRecord> for ProductPage {
    fn from(value: PageRecord) -> Self {
        Self {
            items: value.data.into_iter().map(Product::from).collect(),
            meta: value.meta.into(),
        }
    }
}
