use std::sync::Arc;

use crate::domain::User;
use crate::pages::Route;
use crate::services::AuthService;

const MISSING_CREDENTIALS: &str = "Please enter your username and password";
const LOGIN_FAILED: &str = "login failed. please try again.";

/// Username/password form
pub struct LoginPage {
    auth: Arc<AuthService>,
    pub username: String,
    pub password: String,
    error: Option<String>,
    submitting: bool,
}

impl LoginPage {
    pub fn new(auth: Arc<AuthService>) -> Self {
        Self {
            auth,
            username: String::new(),
            password: String::new(),
            error: None,
            submitting: false,
        }
    }

    /// Log in; on success the caller navigates to the returned route
    pub async fn submit(&mut self) -> Option<Route> {
        if self.username.trim().is_empty() || self.password.is_empty() {
            self.error = Some(MISSING_CREDENTIALS.to_string());
            return None;
        }

        self.submitting = true;
        self.error = None;
        let result = self.auth.login(self.username.trim(), &self.password).await;
        self.submitting = false;

        match result {
            Ok(_) => {
                self.password.clear();
                Some(Route::Home)
            }
            Err(e) => {
                self.error = Some(e.user_message(LOGIN_FAILED));
                None
            }
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn user(&self) -> Option<User> {
        self.auth.logged_in_user()
    }
}
