/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
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
    /// Per-operation database timeout in seconds (default: `5`).
    pub db_timeout_secs: u64,
    /// HMAC secret for validating identity provider tokens.
    pub identity_jwt_secret: String,
    /// Email that is promoted to ADMIN at startup and receives moderation
    /// notifications. Unset disables both.
    pub admin_email: Option<String>,
    /// When true, listings created by an admin skip the moderation queue.
    pub admin_auto_approve: bool,
    /// Presence heartbeat time-to-live in seconds (default: `40`).
    pub presence_ttl_secs: u64,
    /// Public site base URL, used in notification emails.
    pub public_url: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `DB_TIMEOUT_SECS`      | `5`                        |
    /// | `IDENTITY_JWT_SECRET`  | (required)                 |
    /// | `ADMIN_EMAIL`          | (unset)                    |
    /// | `ADMIN_AUTO_APPROVE`   | `true`                     |
    /// | `PRESENCE_TTL_SECS`    | `40`                       |
    /// | `PUBLIC_URL`           | `http://localhost:3000`    |
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

        let db_timeout_secs: u64 = std::env::var("DB_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("DB_TIMEOUT_SECS must be a valid u64");

        let identity_jwt_secret =
            std::env::var("IDENTITY_JWT_SECRET").expect("IDENTITY_JWT_SECRET must be set");

        let admin_email = std::env::var("ADMIN_EMAIL")
            .ok()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty());

        let admin_auto_approve = std::env::var("ADMIN_AUTO_APPROVE")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);

        let presence_ttl_secs: u64 = std::env::var("PRESENCE_TTL_SECS")
            .unwrap_or_else(|_| "40".into())
            .parse()
            .expect("PRESENCE_TTL_SECS must be a valid u64");

        let public_url =
            std::env::var("PUBLIC_URL").unwrap_or_else(|_| "http://localhost:3000".into());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            db_timeout_secs,
            identity_jwt_secret,
            admin_email,
            admin_auto_approve,
            presence_ttl_secs,
            public_url,
        }
    }
}
