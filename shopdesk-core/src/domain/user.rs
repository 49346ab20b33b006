//! User and login domain models

use serde::{Deserialize, Serialize};

use super::session::AuthToken;

/// The account a session is logged in as
///
/// The bearer token is never part of this record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl User {
    pub fn new(id: u64, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            email: None,
            first_name: None,
            last_name: None,
            gender: None,
            image: None,
        }
    }

    /// "First Last" when both are known, otherwise the username
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            _ => self.username.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Successful login: a bearer token, an optional refresh token and the user
///
/// The server may name the bearer `token` or `accessToken`, and may return
/// the user nested under `user` or flattened into the top-level object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawLogin")]
pub struct LoginResponse {
    pub token: AuthToken,
    pub refresh_token: Option<String>,
    pub user: User,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLogin {
    token: Option<String>,
    access_token: Option<String>,
    refresh_token: Option<String>,
    user: Option<User>,
    id: Option<u64>,
    username: Option<String>,
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    gender: Option<String>,
    image: Option<String>,
}

impl TryFrom<RawLogin> for LoginResponse {
    type Error = String;

    fn try_from(raw: RawLogin) -> std::result::Result<Self, Self::Error> {
        let token = raw
            .token
            .or(raw.access_token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| "login response has no token".to_string())?;

        let user = match raw.user {
            Some(user) => user,
            None => User {
                id: raw
                    .id
                    .ok_or_else(|| "login response has no user".to_string())?,
                username: raw.username.unwrap_or_default(),
                email: raw.email,
                first_name: raw.first_name,
                last_name: raw.last_name,
                gender: raw.gender,
                image: raw.image,
            },
        };

        Ok(Self {
            token: AuthToken::new(token),
            refresh_token: raw.refresh_token,
            user,
        })
    }
}

/// Body returned by the refresh endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawTokenPair")]
pub struct TokenPair {
    pub token: AuthToken,
    pub refresh_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTokenPair {
    token: Option<String>,
    access_token: Option<String>,
    refresh_token: Option<String>,
}

impl TryFrom<RawTokenPair> for TokenPair {
    type Error = String;

    fn try_from(raw: RawTokenPair) -> std::result::Result<Self, Self::Error> {
        let token = raw
            .token
            .or(raw.access_token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| "refresh response has no token".to_string())?;
        Ok(Self {
            token: AuthToken::new(token),
            refresh_token: raw.refresh_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_flat_user_with_access_token() {
        let json = r#"{
            "id": 1,
            "username": "emilys",
            "email": "emily.johnson@x.dummyjson.com",
            "firstName": "Emily",
            "lastName": "Johnson",
            "gender": "female",
            "image": "https://dummyjson.com/icon/emilys/128",
            "accessToken": "eyJhbGciOi",
            "refreshToken": "eyJyZWZyZXNo"
        }"#;

        let login: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(login.token.as_str(), "eyJhbGciOi");
        assert_eq!(login.refresh_token.as_deref(), Some("eyJyZWZyZXNo"));
        assert_eq!(login.user.id, 1);
        assert_eq!(login.user.display_name(), "Emily Johnson");
    }

    #[test]
    fn test_login_nested_user_with_token() {
        let json = r#"{"token": "abc", "user": {"id": 7, "username": "michaelw"}}"#;
        let login: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(login.token.as_str(), "abc");
        assert!(login.refresh_token.is_none());
        assert_eq!(login.user.username, "michaelw");
    }

    #[test]
    fn test_login_without_token_is_rejected() {
        let json = r#"{"id": 1, "username": "emilys"}"#;
        assert!(serde_json::from_str::<LoginResponse>(json).is_err());

        let json = r#"{"token": "", "id": 1}"#;
        assert!(serde_json::from_str::<LoginResponse>(json).is_err());
    }

    #[test]
    fn test_user_serialization_never_has_token() {
        let user = User::new(1, "emilys");
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("token").is_none());
        assert_eq!(value, serde_json::json!({"id": 1, "username": "emilys"}));
    }

    #[test]
    fn test_token_pair_accepts_access_token() {
        let pair: TokenPair =
            serde_json::from_str(r#"{"accessToken": "new", "refreshToken": "r2"}"#).unwrap();
        assert_eq!(pair.token.as_str(), "new");
        assert_eq!(pair.refresh_token.as_deref(), Some("r2"));
    }
}
