use serde_json::Value;
use thiserror::Error;

/// Credentials and HTTP settings for the Fable API
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub user_id: String,
    pub auth_token: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            user_id: String::new(),
            auth_token: String::new(),
            timeout_secs: 10,
        }
    }
}

impl ApiConfig {
    pub fn new(user_id: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            auth_token: auth_token.into(),
            ..Default::default()
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.user_id.is_empty() && !self.auth_token.is_empty()
    }

    /// The token as it must be re-sent: users often paste the whole
    /// `Authorization` header value, so a leading scheme label is stripped.
    pub fn bare_token(&self) -> &str {
        let token = self.auth_token.trim();
        for scheme in ["JWT ", "Token ", "Bearer "] {
            if let Some(rest) = token.strip_prefix(scheme) {
                return rest;
            }
        }
        token
    }
}

/// Metadata for one of the user's book lists (system or custom)
#[derive(Debug, Clone)]
pub struct BookList {
    pub id: String,
    pub name: String,
    pub count: u64,
}

impl BookList {
    /// Parse list metadata from a raw catalog entry. Entries without an id
    /// cannot be fetched and yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let id = match obj.get("id")? {
            Value::String(s) if !s.is_empty() => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        let name = obj
            .get("name")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or("Unknown")
            .to_string();
        let count = obj.get("count").and_then(Value::as_u64).unwrap_or(0);

        Some(Self { id, name, count })
    }
}

/// Errors that can occur when talking to the Fable API
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0} is not set. Please configure your Fable credentials")]
    MissingCredentials(&'static str),

    #[error("Request timeout")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to fetch {operation}: {message}")]
    RequestFailed { operation: String, message: String },

    #[error("Unexpected response format from Fable API while fetching {operation}")]
    UnexpectedFormat { operation: String },
}

impl ApiError {
    pub(crate) fn request(operation: impl Into<String>, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::RequestFailed {
                operation: operation.into(),
                message: err.to_string(),
            }
        }
    }
}
