use anyhow::{bail, Context, Result};
use chrono::{Days, Local};
use std::str::FromStr;

/// Process configuration, assembled from environment variables.
///
/// Everything has a development default so `cargo run` works on a bare
/// machine; production deployments are expected to set the variables
/// explicitly.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub database: DatabaseConfig,
    pub schedule: ScheduleSeed,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        Ok(Self {
            server: ServerConfig {
                port: parse_env("PORT", "8080")?,
            },
            auth: AuthConfig {
                // Override in production.
                admin_token: env_or("ADMIN_TOKEN", "admin123"),
            },
            storage: StorageConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            schedule: ScheduleSeed::from_env(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub admin_token: String,
}

/// Which reservation store backs the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

impl StorageConfig {
    fn from_env() -> Result<Self> {
        let raw = env_or("STORAGE_BACKEND", "postgres");
        let backend = match raw.to_ascii_lowercase().as_str() {
            "postgres" => StorageBackend::Postgres,
            "memory" => StorageBackend::Memory,
            other => bail!("STORAGE_BACKEND must be `postgres` or `memory`, got `{other}`"),
        };
        Ok(Self { backend })
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

impl DatabaseConfig {
    fn from_env() -> Result<Self> {
        Ok(Self {
            host: env_or("DATABASE_HOST", "localhost"),
            port: parse_env("DATABASE_PORT", "5432")?,
            username: env_or("DATABASE_USERNAME", "app"),
            password: env_or("DATABASE_PASSWORD", "passwd"),
            database: env_or("DATABASE_NAME", "app"),
        })
    }
}

/// Raw schedule settings used to build the initial in-process schedule.
///
/// Values are kept as strings here; parsing and validation happen in the
/// domain layer so a bad seed fails startup with the same errors an admin
/// update would produce.
#[derive(Debug, Clone)]
pub struct ScheduleSeed {
    pub locations: Vec<String>,
    pub primary: ServiceSeed,
    pub secondary: ServiceSeed,
}

#[derive(Debug, Clone)]
pub struct ServiceSeed {
    pub open_time: String,
    pub close_time: String,
    pub slot_duration_minutes: String,
    pub cabin_count: String,
    pub people_per_cabin: String,
    pub allowed_dates: Vec<String>,
}

impl ScheduleSeed {
    fn from_env() -> Self {
        Self {
            locations: csv_or(&env_or("LOCATIONS", "central")),
            primary: ServiceSeed::from_env("PRIMARY", "09:00", "13:00", "15", "4", "4"),
            secondary: ServiceSeed::from_env("SECONDARY", "10:00", "18:00", "30", "4", "1"),
        }
    }
}

impl ServiceSeed {
    fn from_env(
        prefix: &str,
        open_time: &str,
        close_time: &str,
        slot_duration_minutes: &str,
        cabin_count: &str,
        people_per_cabin: &str,
    ) -> Self {
        let listed = csv_or(&env_or(&format!("{prefix}_ALLOWED_DATES"), ""));
        let allowed_dates = if listed.is_empty() {
            // Nothing curated yet: offer the next two weeks so a fresh
            // development instance is bookable out of the box.
            upcoming_dates(14)
        } else {
            listed
        };
        Self {
            open_time: env_or(&format!("{prefix}_OPEN_TIME"), open_time),
            close_time: env_or(&format!("{prefix}_CLOSE_TIME"), close_time),
            slot_duration_minutes: env_or(
                &format!("{prefix}_SLOT_MINUTES"),
                slot_duration_minutes,
            ),
            cabin_count: env_or(&format!("{prefix}_CABIN_COUNT"), cabin_count),
            people_per_cabin: env_or(&format!("{prefix}_PEOPLE_PER_CABIN"), people_per_cabin),
            allowed_dates,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    env_or(key, default)
        .parse()
        .with_context(|| format!("failed to parse environment variable {key}"))
}

fn csv_or(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn upcoming_dates(days: u64) -> Vec<String> {
    let today = Local::now().date_naive();
    (0..days)
        .filter_map(|offset| today.checked_add_days(Days::new(offset)))
        .map(|date| date.format("%Y-%m-%d").to_string())
        .collect()
}
