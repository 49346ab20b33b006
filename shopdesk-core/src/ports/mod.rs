//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies: the remote shop,
//! local session persistence and user prompts. Services and pages depend
//! only on these traits.

mod prompt;
mod session_store;
mod shop_api;

pub use prompt::Prompt;
pub use session_store::{SessionStore, REFRESH_TOKEN_KEY, TOKEN_KEY, USER_KEY};
pub use shop_api::ShopApi;
