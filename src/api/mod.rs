mod client;
mod types;

pub use client::FableClient;
pub use types::{ApiConfig, ApiError, BookList};

use std::env;

/// Environment variable names for Fable credentials
pub const ENV_FABLE_USER_ID: &str = "FABLE_USER_ID";
pub const ENV_FABLE_AUTH_TOKEN: &str = "FABLE_AUTH_TOKEN";

/// Load API configuration from environment variables
///
/// Required environment variables:
/// - `FABLE_USER_ID`: the account's user id (a UUID, visible in request URLs
///   to api.fable.co)
/// - `FABLE_AUTH_TOKEN`: the authentication token, with or without a
///   `JWT `/`Token `/`Bearer ` prefix
///
/// Both can be set in a `.env` file in the working directory.
pub fn config_from_env(timeout_secs: u64) -> ApiConfig {
    let user_id = env::var(ENV_FABLE_USER_ID).unwrap_or_default();
    let auth_token = env::var(ENV_FABLE_AUTH_TOKEN).unwrap_or_default();

    ApiConfig {
        user_id,
        auth_token,
        timeout_secs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to serialize env var tests (they share global state)
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_config_from_env_defaults() {
        let _lock = ENV_TEST_MUTEX.lock().unwrap();

        env::remove_var(ENV_FABLE_USER_ID);
        env::remove_var(ENV_FABLE_AUTH_TOKEN);

        let config = config_from_env(10);

        assert!(config.user_id.is_empty());
        assert!(config.auth_token.is_empty());
        assert_eq!(config.timeout_secs, 10);
        assert!(!config.is_configured());
    }

    #[test]
    fn test_config_from_env_with_values() {
        let _lock = ENV_TEST_MUTEX.lock().unwrap();

        env::set_var(ENV_FABLE_USER_ID, "user-uuid");
        env::set_var(ENV_FABLE_AUTH_TOKEN, "JWT secret");

        let config = config_from_env(30);

        assert_eq!(config.user_id, "user-uuid");
        assert_eq!(config.auth_token, "JWT secret");
        assert_eq!(config.bare_token(), "secret");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.is_configured());

        env::remove_var(ENV_FABLE_USER_ID);
        env::remove_var(ENV_FABLE_AUTH_TOKEN);
    }
}
