use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: u64,
    pub refresh_ttl_minutes: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    /// Upper bound for every single store call.
    pub store_timeout_ms: u64,
    pub leaderboard_size: i64,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "clickboard".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "clickboard-users".into()),
            ttl_minutes: ttl_minutes("JWT_TTL_MINUTES", 60)?,
            refresh_ttl_minutes: ttl_minutes("JWT_REFRESH_TTL_MINUTES", 60 * 24 * 14)?,
        };
        Ok(Self {
            database_url,
            db_max_connections: env_or("DB_MAX_CONNECTIONS", 10),
            store_timeout_ms: env_or("STORE_TIMEOUT_MS", 2_000),
            leaderboard_size: env_or("LEADERBOARD_SIZE", 5),
            jwt,
        })
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

/// Token lifetimes are between one minute and one year.
const MAX_TTL_MINUTES: u64 = 60 * 24 * 365;

fn ttl_minutes(key: &str, default: u64) -> anyhow::Result<u64> {
    let Ok(raw) = std::env::var(key) else {
        return Ok(default);
    };
    let minutes: u64 = raw
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("{key} must be a whole number of minutes, got {raw:?}"))?;
    anyhow::ensure!(
        (1..=MAX_TTL_MINUTES).contains(&minutes),
        "{key} must be between 1 and {MAX_TTL_MINUTES} minutes, got {minutes}"
    );
    Ok(minutes)
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
