//! Per-browser state: the product list, the discount modal and the search
//! debouncer, keyed by the id stored in the session cookie.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use crate::api::{DiscountWriter, ProductReader};
use crate::debounce::Debounce;
use crate::services::discounts::{DiscountModal, DiscountOutcome};
use crate::services::products::ProductController;
use crate::services::ServiceResult;

/// State owned by one admin browser session.
#[derive(Debug, Clone, Default)]
pub struct AdminSession {
    pub products: ProductController,
    pub discount: DiscountModal,
}

impl AdminSession {
    pub fn new(percent_max: f64) -> Self {
        Self {
            products: ProductController::new(),
            discount: DiscountModal::new(percent_max),
        }
    }

    /// Open the modal for `product_id`, taken from the loaded page when
    /// possible and fetched otherwise.
    pub async fn open_discount<C>(&mut self, client: &C, product_id: i64) -> ServiceResult<()>
    where
        C: ProductReader + ?Sized,
    {
        let product = match self.products.find(product_id) {
            Some(product) => product.clone(),
            None => self.products.get_by_id(client, product_id).await?,
        };
        self.discount.open(product);
        Ok(())
    }

    pub async fn apply_coupon<C>(
        &mut self,
        client: &C,
        code: &str,
    ) -> ServiceResult<DiscountOutcome>
    where
        C: DiscountWriter + ProductReader + ?Sized,
    {
        let outcome = self.discount.apply_coupon(client, code).await?;
        self.after_discount(client, outcome).await;
        Ok(outcome)
    }

    pub async fn apply_percentage<C>(
        &mut self,
        client: &C,
        percentage: f64,
    ) -> ServiceResult<DiscountOutcome>
    where
        C: DiscountWriter + ProductReader + ?Sized,
    {
        let outcome = self.discount.apply_percentage(client, percentage).await?;
        self.after_discount(client, outcome).await;
        Ok(outcome)
    }

    pub async fn remove_discount<C>(&mut self, client: &C) -> ServiceResult<DiscountOutcome>
    where
        C: DiscountWriter + ProductReader + ?Sized,
    {
        let outcome = self.discount.remove_discount(client).await?;
        self.after_discount(client, outcome).await;
        Ok(outcome)
    }

    /// Final prices are computed by the catalog API, so reload after a change.
    async fn after_discount<C>(&mut self, client: &C, outcome: DiscountOutcome)
    where
        C: ProductReader + ?Sized,
    {
        if outcome == DiscountOutcome::Applied {
            self.products.fetch_products(client).await;
        }
    }
}

/// Settings shared by every session created by a [`SessionStore`].
#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub search_debounce: Duration,
    pub percent_max: f64,
    pub idle_ttl: Duration,
}

pub struct SessionEntry {
    state: tokio::sync::Mutex<AdminSession>,
    search: Debounce<String>,
    last_seen: Mutex<Instant>,
}

impl SessionEntry {
    fn new(settings: &SessionSettings) -> Self {
        Self {
            state: tokio::sync::Mutex::new(AdminSession::new(settings.percent_max)),
            search: Debounce::new(settings.search_debounce),
            last_seen: Mutex::new(Instant::now()),
        }
    }

    pub fn state(&self) -> &tokio::sync::Mutex<AdminSession> {
        &self.state
    }

    /// Debouncer for the live search box. Lives outside the state lock so
    /// keystrokes never wait on a list request.
    pub fn search(&self) -> &Debounce<String> {
        &self.search
    }

    fn touch(&self) {
        *self.last_seen.lock().unwrap_or_else(PoisonError::into_inner) = Instant::now();
    }

    fn idle_for(&self) -> Duration {
        self.last_seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .elapsed()
    }
}

#[derive(Clone)]
/// Registry of live sessions shared by all actix workers.
pub struct SessionStore {
    entries: Arc<Mutex<HashMap<String, Arc<SessionEntry>>>>,
    settings: SessionSettings,
}

impl SessionStore {
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            settings,
        }
    }

    /// Entry for `key`, created on first use. Idle entries are evicted on
    /// the way.
    pub fn entry(&self, key: &str) -> Arc<SessionEntry> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Self::evict_idle(&mut entries, self.settings.idle_ttl);

        let entry = entries
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(SessionEntry::new(&self.settings)));
        entry.touch();
        Arc::clone(entry)
    }

    pub fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = entries.remove(key) {
            entry.search.cancel();
        }
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn evict_idle(entries: &mut HashMap<String, Arc<SessionEntry>>, ttl: Duration) {
        entries.retain(|key, entry| {
            if entry.idle_for() <= ttl {
                return true;
            }
            log::debug!("Evicting idle session state {key}");
            entry.search.cancel();
            false
        });
    }
}
