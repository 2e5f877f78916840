use crate::auth::JwtConfig;

/// Server configuration
///
/// Every item can be overridden through environment variables:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | /var/lib/souk | Working directory (database, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | DELIVERY_EARNING | 5.0 | Flat courier fee per order |
/// | REJECTION_COOLDOWN_MINUTES | 30 | Decline cooldown window |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | Graceful shutdown budget |
///
/// JWT settings come from `JWT_SECRET`, `JWT_EXPIRATION_MINUTES`,
/// `JWT_ISSUER` and `JWT_AUDIENCE` via [`JwtConfig`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for the database and log files
    pub work_dir: String,
    pub http_port: u16,
    pub jwt: JwtConfig,
    pub environment: String,
    /// Flat fee credited to the courier per delivered order
    pub delivery_earning: f64,
    /// How long a declined order stays hidden from the declining courier
    pub rejection_cooldown_minutes: i64,
    pub shutdown_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/souk".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            delivery_earning: std::env::var("DELIVERY_EARNING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5.0),
            rejection_cooldown_minutes: std::env::var("REJECTION_COOLDOWN_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            shutdown_timeout_ms: std::env::var("SHUTDOWN_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10000),
        }
    }

    /// Override the test-sensitive settings; used by integration tests
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn database_path(&self) -> String {
        format!("{}/db", self.work_dir)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
