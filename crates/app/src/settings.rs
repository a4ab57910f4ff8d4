//! Handles settings for the application. Configuration is written in
//! `settings.toml`; any key can be overridden with a `LEAGUE__` environment
//! variable (`LEAGUE__SERVER__PORT=8080`).
//!
//! See `settings.toml` for the configuration.
use config::{Config, ConfigError, Environment, File};
use engine::{BudgetPolicy, ValidationRules};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

#[derive(Debug, Default, Deserialize)]
pub struct Engine {
    #[serde(default)]
    pub budget_policy: BudgetPolicy,
    /// Replaces the default set of characters rejected in names.
    pub forbidden_chars: Option<String>,
}

impl Engine {
    pub fn rules(&self) -> ValidationRules {
        let rules = ValidationRules::default().with_budget_policy(self.budget_policy);
        match &self.forbidden_chars {
            Some(chars) => rules.with_forbidden_chars(chars.chars()),
            None => rules,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Option<Server>,
    #[serde(default)]
    pub engine: Engine,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings").required(false))
            .add_source(
                Environment::with_prefix("LEAGUE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn parse(toml: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn full_settings() {
        let settings = parse(
            r##"
            [app]
            level = "debug"

            [server]
            port = 3000
            database = { sqlite = "league.db" }

            [engine]
            budget_policy = "allow_zero"
            forbidden_chars = "#@"
            "##,
        );
        assert_eq!(settings.app.level, "debug");
        let server = settings.server.unwrap();
        assert!(matches!(server.database, Database::Sqlite(ref path) if path == "league.db"));
        let rules = settings.engine.rules();
        assert_eq!(rules.budget_policy, BudgetPolicy::AllowZero);
        assert_eq!(rules.forbidden_chars.len(), 2);
    }

    #[test]
    fn defaults_without_server() {
        let settings = parse("");
        assert_eq!(settings.app.level, "info");
        assert!(settings.server.is_none());
        assert_eq!(settings.engine.budget_policy, BudgetPolicy::Strict);
    }
}
