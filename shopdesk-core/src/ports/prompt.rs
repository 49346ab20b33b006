//! Prompt port - blocking confirmations and notices shown to the user

/// User interaction that blocks the current flow
pub trait Prompt: Send + Sync {
    /// Ask a yes/no question; `false` means the user declined
    fn confirm(&self, message: &str) -> bool;

    /// Show a notice the user must acknowledge
    fn notify(&self, message: &str);
}
