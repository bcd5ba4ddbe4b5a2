use std::{env, path::PathBuf};

use anyhow::{Context, Result};
use derive_getters::Getters;
use rust_decimal::Decimal;

use crate::engine::{DEFAULT_MIN_FOREIGN_TICKET, EngineConfig};

const DEFAULT_DATABASE: &str = "~/.rebalance-calc/portfolio.db";

/// Runtime settings, read from the environment (and `.env`, loaded by the
/// binary before this runs).
#[derive(Clone, Debug, Getters)]
pub struct Settings {
    database: PathBuf,
    local_currency: String,
    foreign_currency: String,
    min_foreign_ticket: Decimal,
    continue_on_rate_error: bool,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let database = env::var("REBALANCE_DATABASE").unwrap_or_else(|_| DEFAULT_DATABASE.into());

        let min_foreign_ticket = match env::var("REBALANCE_MIN_FOREIGN_TICKET") {
            Ok(value) => value.trim().parse::<Decimal>().with_context(|| {
                format!("Invalid REBALANCE_MIN_FOREIGN_TICKET '{}'", value)
            })?,
            Err(_) => DEFAULT_MIN_FOREIGN_TICKET,
        };

        let continue_on_rate_error = match env::var("REBALANCE_CONTINUE_ON_RATE_ERROR") {
            Ok(value) => value.trim().parse::<bool>().with_context(|| {
                format!("Invalid REBALANCE_CONTINUE_ON_RATE_ERROR '{}'", value)
            })?,
            Err(_) => false,
        };

        Ok(Self {
            database: expand_path(&database),
            local_currency: env::var("REBALANCE_LOCAL_CURRENCY").unwrap_or_else(|_| "BRL".into()),
            foreign_currency: env::var("REBALANCE_FOREIGN_CURRENCY")
                .unwrap_or_else(|_| "USD".into()),
            min_foreign_ticket,
            continue_on_rate_error,
        })
    }

    pub fn with_database(mut self, database: &str) -> Self {
        self.database = expand_path(database);
        self
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new(self.min_foreign_ticket, self.continue_on_rate_error)
    }
}

fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}
