/// Server configuration
///
/// # Environment variables
///
/// Every setting can be overridden through the environment:
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | WORK_DIR | ./work_dir | Working directory (logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | LOG_LEVEL | info | tracing level filter |
/// | LATE_FEE_PER_DAY | 50.0 | Flat fee per day an order comes back late |
/// | STATUS_ADVANCE_INTERVAL_SECS | 300 | Period of the approved-order activation sweep |
///
/// # Example
///
/// ```ignore
/// HTTP_PORT=8080 LATE_FEE_PER_DAY=75 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory, stores log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Log level filter passed to the tracing subscriber
    pub log_level: String,
    /// Flat fee charged per day an order is returned late
    pub late_fee_per_day: f64,
    /// Interval of the background sweep that activates approved orders
    pub status_advance_interval_secs: u64,
}

impl Config {
    /// Load configuration from environment variables, using defaults for
    /// anything unset
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./work_dir".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            late_fee_per_day: std::env::var("LATE_FEE_PER_DAY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50.0),
            status_advance_interval_secs: std::env::var("STATUS_ADVANCE_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
        }
    }

    /// Override the port, commonly needed in tests
    pub fn with_port(mut self, http_port: u16) -> Self {
        self.http_port = http_port;
        self
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
