use crate::config::Config;
use crate::date_utils;
use crate::db::DbPool;
use crate::source::SqliteSource;
use chrono::NaiveDate;
use std::sync::Arc;

/// Source of "today" for windows that are relative to the current date.
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Arc<Config>,
    clock: Clock,
}

impl AppState {
    pub fn new(db: DbPool, config: Config) -> Self {
        Self::with_clock(db, config, Arc::new(date_utils::today))
    }

    pub fn with_clock(db: DbPool, config: Config, clock: Clock) -> Self {
        Self {
            db,
            config: Arc::new(config),
            clock,
        }
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    /// Transaction source for the report assembler, backed by the same pool.
    pub fn source(&self) -> SqliteSource {
        SqliteSource::new(self.db.clone())
    }
}
