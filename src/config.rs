use std::{env, ops::Range, path::PathBuf};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub generator: GeneratorSettings,
}

/// Knobs for the synthetic flat dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorSettings {
    pub order_count: usize,
    pub max_lines_per_order: usize,
    pub seed: Option<u64>,
    pub first_order_id: i32,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            order_count: 20,
            max_lines_per_order: 1,
            seed: None,
            first_order_id: 1000,
        }
    }
}

impl GeneratorSettings {
    /// Consecutive order ids starting at `first_order_id`; an error when the
    /// last one would not fit in an `i32`.
    pub fn order_ids(&self) -> AppResult<Range<i32>> {
        i32::try_from(self.order_count)
            .ok()
            .and_then(|count| self.first_order_id.checked_add(count))
            .map(|end| self.first_order_id..end)
            .ok_or_else(|| {
                AppError::Config(format!(
                    "{} orders starting at id {} overflow the order id range",
                    self.order_count, self.first_order_id
                ))
            })
    }
}

/// Individual connection parameters, used when `DATABASE_URL` is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl DatabaseSettings {
    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.database
        )
    }
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database_url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => DatabaseSettings {
                host: var("DB_HOST", "localhost"),
                port: parse_or(&lookup, "DB_PORT", 5433)?,
                database: var("DB_NAME", "warehouse"),
                user: var("DB_USER", "dataeng"),
                password: var("DB_PASSWORD", "dataeng123"),
            }
            .url(),
        };

        let defaults = GeneratorSettings::default();
        let generator = GeneratorSettings {
            order_count: parse_or(&lookup, "ORDER_COUNT", defaults.order_count)?,
            max_lines_per_order: parse_or(
                &lookup,
                "MAX_LINES_PER_ORDER",
                defaults.max_lines_per_order,
            )?,
            seed: match lookup("GENERATOR_SEED") {
                Some(raw) => Some(parse_value("GENERATOR_SEED", &raw)?),
                None => None,
            },
            first_order_id: defaults.first_order_id,
        };
        if generator.max_lines_per_order == 0 {
            return Err(AppError::Config(
                "MAX_LINES_PER_ORDER must be at least 1".into(),
            ));
        }
        generator.order_ids()?;

        Ok(Self {
            database_url,
            host: var("APP_HOST", "127.0.0.1"),
            port: parse_or(&lookup, "APP_PORT", 3000)?,
            data_dir: PathBuf::from(var("DATA_DIR", "data")),
            generator,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> AppResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, raw: &str) -> AppResult<T> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| AppError::Config(format!("{key} has invalid value {raw:?}")))
}
