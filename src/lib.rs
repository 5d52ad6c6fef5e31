pub mod api;
pub mod config;
pub mod debounce;
pub mod domain;
pub mod forms;
pub mod models;
pub mod routes;
pub mod services;

/// Products per list page.
pub const DEFAULT_PAGE_SIZE: usize = 10;
