// src/config.rs

use std::{env, net::SocketAddr, str::FromStr};

use dotenvy::dotenv;

use crate::services::ForumSettings;

/// Output format of the log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. `None` runs the service on the in-memory store.
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub rust_log: String,
    pub log_format: LogFormat,
    pub log_to_stdout: bool,
    pub log_to_file: bool,
    pub log_dir: String,
    pub cors_origins: Vec<String>,
    pub atomic_reactions: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            max_connections: 5,
            host: "0.0.0.0".to_string(),
            port: 5000,
            rust_log: "info".to_string(),
            log_format: LogFormat::Text,
            log_to_stdout: true,
            log_to_file: true,
            log_dir: "logs".to_string(),
            cors_origins: vec!["http://localhost:3000".to_string()],
            atomic_reactions: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    /// Unparsable values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let (log_to_stdout, log_to_file) = match lookup("LOG_OUTPUT") {
            Some(outputs) => {
                let outputs = split_list(&outputs);
                (
                    outputs.iter().any(|o| o == "stdout"),
                    outputs.iter().any(|o| o == "file"),
                )
            }
            None => (defaults.log_to_stdout, defaults.log_to_file),
        };

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|origins| split_list(&origins))
            .unwrap_or(defaults.cors_origins);

        Self {
            database_url,
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", defaults.max_connections),
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port),
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            log_format: parse_or(&lookup, "LOG_FORMAT", defaults.log_format),
            log_to_stdout,
            log_to_file,
            log_dir: lookup("LOG_DIR").unwrap_or(defaults.log_dir),
            cors_origins,
            atomic_reactions: parse_or(&lookup, "FORUM_ATOMIC_REACTIONS", defaults.atomic_reactions),
        }
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    pub fn forum_settings(&self) -> ForumSettings {
        ForumSettings {
            atomic_reactions: self.atomic_reactions,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            // The subscriber is not installed yet, so this goes to stderr directly.
            eprintln!("ignoring invalid value '{}' for {}", raw, key);
            default
        }),
        None => default,
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
