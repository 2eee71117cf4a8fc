use std::env;
use std::path::PathBuf;

use chrono::Duration;

const DEFAULT_SESSION_TTL_HOURS: i64 = 24;
/// One year.
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub migrations_path: PathBuf,
    /// How long a bearer token stays valid after it is issued.
    pub session_ttl_hours: i64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: env::var("BUDGETEER_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("BUDGETEER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(7070),
            database_path: env::var("BUDGETEER_DATABASE_URL")
                .map(|v| {
                    PathBuf::from(
                        v.strip_prefix("sqlite://")
                            .or_else(|| v.strip_prefix("sqlite:"))
                            .unwrap_or(&v),
                    )
                })
                .unwrap_or_else(|_| PathBuf::from("data/budgeteer.db")),
            migrations_path: env::var("BUDGETEER_MIGRATIONS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("migrations")),
            session_ttl_hours: parse_session_ttl_hours(
                env::var("BUDGETEER_SESSION_TTL_HOURS").ok().as_deref(),
            ),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::hours(self.session_ttl_hours.clamp(0, MAX_SESSION_TTL_HOURS))
    }
}

/// Positive hour counts up to [`MAX_SESSION_TTL_HOURS`]; anything else
/// falls back to the default.
fn parse_session_ttl_hours(value: Option<&str>) -> i64 {
    value
        .and_then(|h| h.trim().parse::<i64>().ok())
        .filter(|h| (1..=MAX_SESSION_TTL_HOURS).contains(h))
        .unwrap_or(DEFAULT_SESSION_TTL_HOURS)
}
