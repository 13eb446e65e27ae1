//! Configuration from environment variables.
//!
//! Load configuration using `Config::from_env()` after calling `dotenvy::dotenv()`.
//! Unparsable values fall back to their defaults with a warning.

use crate::core::ddl::DdlOptions;
use crate::core::dialect::Dialect;
use crate::core::history::HISTORY_LIMIT;

pub const DIALECT_VAR: &str = "SCHEMACRAFT_DIALECT";
pub const HISTORY_LIMIT_VAR: &str = "SCHEMACRAFT_HISTORY_LIMIT";
pub const IF_NOT_EXISTS_VAR: &str = "SCHEMACRAFT_IF_NOT_EXISTS";
pub const INCLUDE_COMMENTS_VAR: &str = "SCHEMACRAFT_INCLUDE_COMMENTS";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: unknown dialect '{value}'")]
    UnknownDialect { var: &'static str, value: String },

    #[error("{var}: expected a positive integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{var}: expected a boolean, got '{value}'")]
    InvalidBool { var: &'static str, value: String },
}

/// Settings loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Dialect for new diagrams and for snapshots that do not name one
    pub default_dialect: Dialect,

    /// Undo depth
    pub history_limit: usize,

    /// Emit `IF NOT EXISTS` where the dialect supports it
    pub if_not_exists: bool,

    /// Emit table and column comments
    pub include_comments: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_dialect: Dialect::default(),
            history_limit: HISTORY_LIMIT,
            if_not_exists: false,
            include_comments: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Call `dotenvy::dotenv()` before this to load from `.env` file.
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a config from any variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            default_dialect: read(&lookup, DIALECT_VAR, parse_dialect, defaults.default_dialect),
            history_limit: read(&lookup, HISTORY_LIMIT_VAR, parse_limit, defaults.history_limit),
            if_not_exists: read(&lookup, IF_NOT_EXISTS_VAR, parse_bool, defaults.if_not_exists),
            include_comments: read(
                &lookup,
                INCLUDE_COMMENTS_VAR,
                parse_bool,
                defaults.include_comments,
            ),
        }
    }

    pub fn ddl_options(&self) -> DdlOptions {
        DdlOptions {
            if_not_exists: self.if_not_exists,
            include_comments: self.include_comments,
        }
    }
}

fn read<F, T>(
    lookup: &F,
    var: &'static str,
    parse: fn(&'static str, &str) -> Result<T, ConfigError>,
    default: T,
) -> T
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return default;
    };
    match parse(var, raw.trim()) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("{}; using default", e);
            default
        }
    }
}

pub fn parse_dialect(var: &'static str, value: &str) -> Result<Dialect, ConfigError> {
    Dialect::from_id(value).ok_or_else(|| ConfigError::UnknownDialect {
        var,
        value: value.to_string(),
    })
}

pub fn parse_limit(var: &'static str, value: &str) -> Result<usize, ConfigError> {
    match value.parse::<usize>() {
        Ok(limit) if limit > 0 => Ok(limit),
        _ => Err(ConfigError::InvalidNumber {
            var,
            value: value.to_string(),
        }),
    }
}

pub fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var,
            value: value.to_string(),
        }),
    }
}
