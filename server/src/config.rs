// server/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use sqlx::postgres::PgConnectOptions;
use std::env;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
  #[default]
  Pretty,
  Json,
}

impl FromStr for LogFormat {
  type Err = AppError;

  fn from_str(value: &str) -> Result<Self> {
    match value.to_ascii_lowercase().as_str() {
      "pretty" => Ok(LogFormat::Pretty),
      "json" => Ok(LogFormat::Json),
      other => Err(AppError::Config(format!("Invalid LOG_FORMAT '{}': expected 'pretty' or 'json'", other))),
    }
  }
}

/// Where the PostgreSQL store lives.
#[derive(Clone, PartialEq, Eq)]
pub enum DatabaseSettings {
  Url(String),
  Parts {
    host: String,
    port: u16,
    username: String,
    password: Option<String>,
    database: String,
  },
}

// Hand-written so credentials never reach the logs.
impl fmt::Debug for DatabaseSettings {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DatabaseSettings::Url(_) => f.debug_tuple("Url").field(&"[REDACTED]").finish(),
      DatabaseSettings::Parts {
        host,
        port,
        username,
        database,
        ..
      } => f
        .debug_struct("Parts")
        .field("host", host)
        .field("port", port)
        .field("username", username)
        .field("password", &"[REDACTED]")
        .field("database", database)
        .finish(),
    }
  }
}

impl DatabaseSettings {
  pub fn connect_options(&self) -> Result<PgConnectOptions> {
    match self {
      DatabaseSettings::Url(url) => {
        PgConnectOptions::from_str(url).map_err(|e| AppError::Config(format!("Invalid DATABASE_URL: {}", e)))
      }
      DatabaseSettings::Parts {
        host,
        port,
        username,
        password,
        database,
      } => {
        let options = PgConnectOptions::new()
          .host(host)
          .port(*port)
          .username(username)
          .database(database);
        Ok(match password {
          Some(password) => options.password(password),
          None => options,
        })
      }
    }
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database: DatabaseSettings,
  pub db_max_connections: u32,
  pub log_format: LogFormat,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from any variable source; `from_env` passes the process environment.
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get_env = |var_name: &str| {
      lookup(var_name).ok_or_else(|| AppError::Config(format!("Missing environment variable '{}'", var_name)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let server_port = get_env("PORT")
      .unwrap_or_else(|_| "3000".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid PORT: {}", e)))?;

    let database = match lookup("DATABASE_URL") {
      Some(url) => DatabaseSettings::Url(url),
      None => DatabaseSettings::Parts {
        host: get_env("DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
        port: get_env("DB_PORT")
          .unwrap_or_else(|_| "5432".to_string())
          .parse::<u16>()
          .map_err(|e| AppError::Config(format!("Invalid DB_PORT: {}", e)))?,
        username: get_env("DB_USERNAME")?,
        password: lookup("DB_PASSWORD"),
        database: get_env("DB_DATABASE")?,
      },
    };

    let db_max_connections = get_env("DB_MAX_CONNECTIONS")
      .unwrap_or_else(|_| "10".to_string())
      .parse::<u32>()
      .map_err(|e| AppError::Config(format!("Invalid DB_MAX_CONNECTIONS: {}", e)))?;
    if db_max_connections == 0 {
      return Err(AppError::Config("DB_MAX_CONNECTIONS must be at least 1".to_string()));
    }

    let log_format = match lookup("LOG_FORMAT") {
      Some(value) => value.parse::<LogFormat>()?,
      None => LogFormat::default(),
    };

    Ok(Self {
      server_host,
      server_port,
      database,
      db_max_connections,
      log_format,
    })
  }

  pub fn server_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |name: &str| vars.get(name).cloned()
  }

  #[test]
  fn defaults_apply_when_only_credentials_are_given() {
    let config = AppConfig::from_lookup(lookup_from(&[("DB_USERNAME", "app"), ("DB_DATABASE", "orders")])).unwrap();
    assert_eq!(config.server_address(), "0.0.0.0:3000");
    assert_eq!(config.db_max_connections, 10);
    assert_eq!(config.log_format, LogFormat::Pretty);
    assert_eq!(
      config.database,
      DatabaseSettings::Parts {
        host: "localhost".into(),
        port: 5432,
        username: "app".into(),
        password: None,
        database: "orders".into(),
      }
    );
  }

  #[test]
  fn database_url_takes_precedence_over_parts() {
    let config = AppConfig::from_lookup(lookup_from(&[
      ("DATABASE_URL", "postgres://app:secret@db:5433/orders"),
      ("DB_HOST", "ignored"),
      ("PORT", "8080"),
      ("LOG_FORMAT", "JSON"),
    ]))
    .unwrap();
    assert_eq!(config.server_port, 8080);
    assert_eq!(config.log_format, LogFormat::Json);
    assert!(matches!(config.database, DatabaseSettings::Url(_)));
    assert!(config.database.connect_options().is_ok());
  }

  #[test]
  fn missing_credentials_are_config_errors() {
    let err = AppConfig::from_lookup(lookup_from(&[("DB_USERNAME", "app")])).unwrap_err();
    assert!(matches!(err, AppError::Config(ref m) if m.contains("DB_DATABASE")));
  }

  #[test]
  fn invalid_numbers_are_config_errors() {
    let base = [("DB_USERNAME", "app"), ("DB_DATABASE", "orders")];
    for (name, value) in [("PORT", "http"), ("DB_PORT", "-1"), ("DB_MAX_CONNECTIONS", "0"), ("LOG_FORMAT", "xml")] {
      let mut pairs = base.to_vec();
      pairs.push((name, value));
      let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
      assert!(matches!(err, AppError::Config(_)), "{name}={value}");
    }
  }

  #[test]
  fn debug_output_redacts_credentials() {
    let url = DatabaseSettings::Url("postgres://app:secret@db/orders".into());
    assert!(!format!("{:?}", url).contains("secret"));

    let parts = DatabaseSettings::Parts {
      host: "db".into(),
      port: 5432,
      username: "app".into(),
      password: Some("secret".into()),
      database: "orders".into(),
    };
    assert!(!format!("{:?}", parts).contains("secret"));
  }
}
