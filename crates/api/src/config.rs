use std::time::Duration;

use bookvisit_upstream::UpstreamConfig;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
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
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Upstream service locations.
    pub upstream: UpstreamSettings,
    /// Booking window and session lifetime.
    pub booking: BookingSettings,
}

#[derive(Debug, Clone)]
pub struct UpstreamSettings {
    pub prison_api_url: String,
    pub contact_registry_url: String,
    pub visit_scheduler_url: String,
    pub timeout_secs: u64,
}

impl UpstreamSettings {
    pub fn prison_api(&self) -> UpstreamConfig {
        UpstreamConfig::new(&self.prison_api_url, self.timeout())
    }

    pub fn contact_registry(&self) -> UpstreamConfig {
        UpstreamConfig::new(&self.contact_registry_url, self.timeout())
    }

    pub fn visit_scheduler(&self) -> UpstreamConfig {
        UpstreamConfig::new(&self.visit_scheduler_url, self.timeout())
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone)]
pub struct BookingSettings {
    /// Earliest bookable day, in days from today.
    pub min_advance_booking_days: i64,
    /// Latest bookable day, in days from today. Also the ban horizon.
    pub max_advance_booking_days: i64,
    /// Idle lifetime of a booking session.
    pub session_ttl_mins: u64,
}

impl BookingSettings {
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_mins * 60)
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.into())
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                         | Default                    |
    /// |---------------------------------|----------------------------|
    /// | `HOST`                          | `0.0.0.0`                  |
    /// | `PORT`                          | `3000`                     |
    /// | `CORS_ORIGINS`                  | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`          | `30`                       |
    /// | `PRISON_API_URL`                | `http://localhost:8081`    |
    /// | `PRISONER_CONTACT_REGISTRY_URL` | `http://localhost:8082`    |
    /// | `VISIT_SCHEDULER_URL`           | `http://localhost:8083`    |
    /// | `UPSTREAM_TIMEOUT_SECS`         | `10`                       |
    /// | `MIN_ADVANCE_BOOKING_DAYS`      | `2`                        |
    /// | `MAX_ADVANCE_BOOKING_DAYS`      | `28`                       |
    /// | `SESSION_TTL_MINS`              | `120`                      |
    pub fn from_env() -> Self {
        let host = env_or("HOST", "0.0.0.0");

        let port: u16 = env_or("PORT", "3000")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let upstream = UpstreamSettings {
            prison_api_url: env_or("PRISON_API_URL", "http://localhost:8081"),
            contact_registry_url: env_or("PRISONER_CONTACT_REGISTRY_URL", "http://localhost:8082"),
            visit_scheduler_url: env_or("VISIT_SCHEDULER_URL", "http://localhost:8083"),
            timeout_secs: env_or("UPSTREAM_TIMEOUT_SECS", "10")
                .parse()
                .expect("UPSTREAM_TIMEOUT_SECS must be a valid u64"),
        };

        let booking = BookingSettings {
            min_advance_booking_days: env_or("MIN_ADVANCE_BOOKING_DAYS", "2")
                .parse()
                .expect("MIN_ADVANCE_BOOKING_DAYS must be a valid i64"),
            max_advance_booking_days: env_or("MAX_ADVANCE_BOOKING_DAYS", "28")
                .parse()
                .expect("MAX_ADVANCE_BOOKING_DAYS must be a valid i64"),
            session_ttl_mins: env_or("SESSION_TTL_MINS", "120")
                .parse()
                .expect("SESSION_TTL_MINS must be a valid u64"),
        };
        assert!(
            booking.min_advance_booking_days <= booking.max_advance_booking_days,
            "MIN_ADVANCE_BOOKING_DAYS must not exceed MAX_ADVANCE_BOOKING_DAYS"
        );

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            upstream,
            booking,
        }
    }
}
