use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on post-shutdown cleanup of background tasks (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// Quiet window before a brochure page draft is written (default: `1000`).
    pub autosave_debounce_ms: u64,
    /// Rewrite reversed-looking words in content page bodies on save (default: on).
    pub normalize_reversed_words: bool,
    /// First manager account, created at startup when no manager exists.
    pub bootstrap_manager: Option<BootstrapManager>,
}

/// Credentials for the bootstrap manager account.
#[derive(Clone)]
pub struct BootstrapManager {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl std::fmt::Debug for BootstrapManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapManager")
            .field("email", &self.email)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                    |
    /// |------------------------------|----------------------------|
    /// | `HOST`                       | `0.0.0.0`                  |
    /// | `PORT`                       | `3000`                     |
    /// | `CORS_ORIGINS`               | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`      | `30`                       |
    /// | `AUTOSAVE_DEBOUNCE_MS`       | `1000`                     |
    /// | `NORMALIZE_REVERSED_WORDS`   | `true`                     |
    /// | `BOOTSTRAP_MANAGER_EMAIL`    | unset                      |
    /// | `BOOTSTRAP_MANAGER_PASSWORD` | unset                      |
    /// | `BOOTSTRAP_MANAGER_NAME`     | `Manager`                  |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let autosave_debounce_ms: u64 = std::env::var("AUTOSAVE_DEBOUNCE_MS")
            .unwrap_or_else(|_| "1000".into())
            .parse()
            .expect("AUTOSAVE_DEBOUNCE_MS must be a valid u64");

        let normalize_reversed_words = std::env::var("NORMALIZE_REVERSED_WORDS")
            .map(|v| parse_flag(&v).expect("NORMALIZE_REVERSED_WORDS must be true or false"))
            .unwrap_or(true);

        let bootstrap_manager = match (
            std::env::var("BOOTSTRAP_MANAGER_EMAIL"),
            std::env::var("BOOTSTRAP_MANAGER_PASSWORD"),
        ) {
            (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => {
                Some(BootstrapManager {
                    email,
                    password,
                    name: std::env::var("BOOTSTRAP_MANAGER_NAME")
                        .unwrap_or_else(|_| "Manager".into()),
                })
            }
            _ => None,
        };

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt,
            autosave_debounce_ms,
            normalize_reversed_words,
            bootstrap_manager,
        }
    }
}

/// Accepts `true/false`, `1/0`, `yes/no`, `on/off`, case-insensitive.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" off "), Some(false));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn bootstrap_debug_hides_password() {
        let b = BootstrapManager {
            email: "boss@example.com".into(),
            password: "hunter2-hunter2".into(),
            name: "Boss".into(),
        };
        assert!(!format!("{b:?}").contains("hunter2"));
    }
}
