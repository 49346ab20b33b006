//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

pub mod auth;
pub mod catalog;
pub mod debounce;
mod demo;
pub mod logging;
pub mod store;

pub use auth::AuthService;
pub use catalog::{ProductCatalog, ProductQuery, ALL_CATEGORIES};
pub use debounce::{Debouncer, SEARCH_DEBOUNCE};
pub use demo::DemoService;
pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};
pub use store::{ProductState, ProductStore, ProductsHook, ProductsView, StoreAction};
