use std::str::FromStr;
use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/shareit";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// 設定読み込みのエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a number, got {value:?}")]
    NotANumber { name: &'static str, value: String },

    #[error("SHAREIT_STORAGE must be `postgres` or `memory`, got {0:?}")]
    UnknownStorage(String),
}

/// 永続化の方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Postgres,
    Memory,
}

impl FromStr for StorageKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "postgres" => Ok(StorageKind::Postgres),
            "memory" => Ok(StorageKind::Memory),
            other => Err(ConfigError::UnknownStorage(other.to_string())),
        }
    }
}

/// 起動時に一度だけ環境変数から読み込む設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub max_connections: u32,
    pub storage: StorageKind,
}

impl Config {
    /// プロセスの環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 任意の参照関数から設定を読み込む
    ///
    /// 未設定の変数はデフォルト値になる。値が不正な場合はエラー。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let port = match lookup("PORT") {
            Some(value) => parse_number("PORT", value)?,
            None => DEFAULT_PORT,
        };

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(value) => parse_number("DATABASE_MAX_CONNECTIONS", value)?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let storage = match lookup("SHAREIT_STORAGE") {
            Some(value) => value.parse()?,
            None => StorageKind::Postgres,
        };

        Ok(Config {
            database_url,
            port,
            max_connections,
            storage,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn parse_number<T: FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::NotANumber { name, value })
}
