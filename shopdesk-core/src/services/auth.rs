//! Auth service - login, logout and the current session
//!
//! Owns the session lifetime: opened from the session store, replaced on
//! login or refresh, cleared on logout. Controllers only ever see the user;
//! the bearer token stays inside this service and the API calls it feeds.

use std::sync::{Arc, RwLock};

use serde_json::Value as JsonValue;

use crate::domain::result::{Error, Result};
use crate::domain::{AuthToken, LoginRequest, Session, User};
use crate::ports::{SessionStore, ShopApi, REFRESH_TOKEN_KEY, TOKEN_KEY, USER_KEY};
use crate::services::logging::{events, LoggingService};

pub struct AuthService {
    api: Arc<dyn ShopApi>,
    store: Arc<dyn SessionStore>,
    session: RwLock<Session>,
    logger: Option<Arc<LoggingService>>,
}

impl AuthService {
    /// Open the session persisted in `store`
    ///
    /// A stored user record that no longer parses is ignored rather than
    /// failing the whole session.
    pub fn open(
        api: Arc<dyn ShopApi>,
        store: Arc<dyn SessionStore>,
        logger: Option<Arc<LoggingService>>,
    ) -> Result<Self> {
        let token = store
            .get(TOKEN_KEY)?
            .and_then(|v| v.as_str().map(AuthToken::new))
            .filter(|t| !t.is_empty());
        let refresh_token = store
            .get(REFRESH_TOKEN_KEY)?
            .and_then(|v| v.as_str().map(str::to_string));
        let user = store
            .get(USER_KEY)?
            .and_then(|v| serde_json::from_value::<User>(v).ok());

        Ok(Self {
            api,
            store,
            session: RwLock::new(Session {
                token,
                refresh_token,
                user,
            }),
            logger,
        })
    }

    /// Snapshot of the current session
    pub fn session(&self) -> Session {
        self.session
            .read()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    /// Credential to attach to the next request, if logged in
    pub fn token(&self) -> Option<AuthToken> {
        self.session.read().ok().and_then(|s| s.token.clone())
    }

    pub fn logged_in_user(&self) -> Option<User> {
        self.session.read().ok().and_then(|s| s.user.clone())
    }

    pub fn is_logged_in(&self) -> bool {
        self.session
            .read()
            .map(|s| s.is_authenticated())
            .unwrap_or(false)
    }

    /// Log in and persist the token and user
    ///
    /// On failure nothing is written and the previous session is kept.
    pub async fn login(&self, username: &str, password: &str) -> Result<User> {
        let response = self
            .api
            .login(&LoginRequest::new(username, password))
            .await?;

        self.store.write_batch(vec![
            (
                TOKEN_KEY,
                Some(JsonValue::String(response.token.as_str().to_string())),
            ),
            (
                REFRESH_TOKEN_KEY,
                response.refresh_token.clone().map(JsonValue::String),
            ),
            (USER_KEY, Some(serde_json::to_value(&response.user)?)),
        ])?;

        self.replace_session(Session {
            token: Some(response.token),
            refresh_token: response.refresh_token,
            user: Some(response.user.clone()),
        })?;

        self.log(events::LOGIN_SUCCEEDED);
        Ok(response.user)
    }

    /// Forget the token and user, locally and on disk
    pub fn logout(&self) -> Result<()> {
        self.store.write_batch(vec![
            (TOKEN_KEY, None),
            (REFRESH_TOKEN_KEY, None),
            (USER_KEY, None),
        ])?;
        self.replace_session(Session::anonymous())?;
        self.log(events::LOGOUT);
        Ok(())
    }

    /// Ask the server who the current token belongs to
    pub async fn current_user(&self) -> Result<User> {
        let token = self.token();
        self.api.current_user(token.as_ref()).await
    }

    /// Exchange the current token for a new one and store it
    ///
    /// Never called automatically; a 401 elsewhere does not trigger it.
    pub async fn refresh(&self) -> Result<()> {
        let token = self
            .token()
            .ok_or_else(|| Error::Unauthorized { message: Some("Not logged in".to_string()) })?;
        let pair = self.api.refresh_auth(Some(&token)).await?;

        let mut writes = vec![(
            TOKEN_KEY,
            Some(JsonValue::String(pair.token.as_str().to_string())),
        )];
        if let Some(refresh) = &pair.refresh_token {
            writes.push((REFRESH_TOKEN_KEY, Some(JsonValue::String(refresh.clone()))));
        }
        self.store.write_batch(writes)?;

        let mut session = self.session();
        session.token = Some(pair.token);
        if pair.refresh_token.is_some() {
            session.refresh_token = pair.refresh_token;
        }
        self.replace_session(session)
    }

    fn replace_session(&self, session: Session) -> Result<()> {
        let mut current = self
            .session
            .write()
            .map_err(|_| Error::storage("session lock poisoned"))?;
        *current = session;
        Ok(())
    }

    fn log(&self, event: &str) {
        if let Some(logger) = &self.logger {
            let _ = logger.log_event(event);
        }
    }
}
