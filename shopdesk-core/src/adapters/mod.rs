//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - reqwest HTTP client for the DummyJSON `ShopApi`
//! - in-process seeded shop for demo mode
//! - JSON file and in-memory `SessionStore`s
//! - scripted `Prompt` for non-interactive runs

pub mod dummyjson;
pub mod memory;
pub mod memory_session;
pub mod scripted_prompt;
pub mod session_file;

#[cfg(test)]
pub mod dummyjson_mock;

pub use dummyjson::DummyJsonClient;
pub use memory::{ApiCall, InMemoryShop};
pub use memory_session::MemorySessionStore;
pub use scripted_prompt::ScriptedPrompt;
pub use session_file::FileSessionStore;
