use std::{fmt, sync::Arc};

use chrono::{Datelike, Utc};
use sea_orm::DatabaseConnection;

use crate::{LeagueEvent, LogNotifier, Notifier, ResultEngine, ValidationRules};

mod access;
mod clubs;
mod coaches;
mod ledger;
mod players;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// One page of a listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based.
    pub page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

pub struct Engine {
    database: DatabaseConnection,
    rules: ValidationRules,
    notifier: Arc<dyn Notifier>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("database", &self.database)
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Rules every mutation is validated against.
    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    /// Hand a committed change to the notifier. Failures are only logged.
    fn notify(&self, event: LeagueEvent) {
        if let Err(err) = self.notifier.notify(&event) {
            tracing::warn!(?event, "{err}");
        }
    }
}

fn current_year() -> i32 {
    Utc::now().year()
}

/// Treat a blank club reference as no club.
fn club_ref(code: Option<&str>) -> Option<&str> {
    code.map(str::trim).filter(|c| !c.is_empty())
}

/// The builder for `Engine`
pub struct EngineBuilder {
    database: DatabaseConnection,
    rules: ValidationRules,
    notifier: Arc<dyn Notifier>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            database: DatabaseConnection::default(),
            rules: ValidationRules::default(),
            notifier: Arc::new(LogNotifier),
        }
    }
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Override the default validation rules.
    pub fn rules(mut self, rules: ValidationRules) -> EngineBuilder {
        self.rules = rules;
        self
    }

    /// Receive post-commit events. Defaults to [`LogNotifier`].
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> EngineBuilder {
        self.notifier = notifier;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            rules: self.rules,
            notifier: self.notifier,
        })
    }
}
