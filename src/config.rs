use std::env;
use std::path::PathBuf;

/// Length of the rolling dashboard window when nothing else is configured.
pub const DEFAULT_DASHBOARD_DAYS: i64 = 30;

/// Number of recent incomes and expenses listed on the dashboard.
pub const DEFAULT_RECENT_LIMIT: i64 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub migrations_path: PathBuf,
    pub dashboard_days: i64,
    pub recent_limit: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 7070,
            database_path: PathBuf::from("data/ledgerlens.db"),
            migrations_path: PathBuf::from("migrations"),
            dashboard_days: DEFAULT_DASHBOARD_DAYS,
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        Self {
            host: env::var("LEDGERLENS_HOST").unwrap_or(defaults.host),
            port: parse_var("LEDGERLENS_PORT").unwrap_or(defaults.port),
            database_path: env::var("LEDGERLENS_DATABASE_URL")
                .map(|v| {
                    PathBuf::from(
                        v.strip_prefix("sqlite://")
                            .or_else(|| v.strip_prefix("sqlite:"))
                            .unwrap_or(&v),
                    )
                })
                .unwrap_or(defaults.database_path),
            migrations_path: env::var("LEDGERLENS_MIGRATIONS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.migrations_path),
            dashboard_days: parse_var("LEDGERLENS_DASHBOARD_DAYS")
                .filter(|days: &i64| *days > 0)
                .unwrap_or(defaults.dashboard_days),
            recent_limit: parse_var("LEDGERLENS_RECENT_LIMIT")
                .filter(|limit: &i64| *limit >= 0)
                .unwrap_or(defaults.recent_limit),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    match env::var(name) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(var = name, value = %raw, "Ignoring unparsable setting");
                None
            }
        },
        Err(_) => None,
    }
}
