//! Session store port - local key/value persistence

use serde_json::Value as JsonValue;

use crate::domain::result::Result;

/// Key holding the bearer token string
pub const TOKEN_KEY: &str = "token";
/// Key holding the refresh token string
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
/// Key holding the logged-in user record
pub const USER_KEY: &str = "loggedInUser";

/// Small persistent key/value store for session state
///
/// Writes happen only on login, refresh and logout. There is no expiry.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<JsonValue>>;

    fn set(&self, key: &str, value: JsonValue) -> Result<()>;

    /// Remove a key; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;

    /// Apply several writes at once: `Some` sets a key, `None` removes it
    ///
    /// Either every write lands or none does.
    fn write_batch(&self, writes: Vec<(&str, Option<JsonValue>)>) -> Result<()>;
}
