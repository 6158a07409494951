//! Free-form configuration tokens shared by every strategy

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ArenaError, Result};

/// Tokens read from the configs file, passed verbatim to every strategy.
///
/// Tokens of the form `key=value` can be looked up; a
/// `Strategy.key=value` token takes precedence over `key=value` for that
/// strategy.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configs {
    tokens: Vec<String>,
}

impl Configs {
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    /// Split on whitespace
    pub fn parse(text: &str) -> Self {
        Self::new(text.split_whitespace().map(str::to_owned).collect())
    }

    /// Read a configs file. Bytes that are not UTF-8 become U+FFFD inside
    /// their token; the file is still accepted.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| {
            ArenaError::ConfigsFileNotOpened { path: path.to_path_buf(), source }
        })?;
        Ok(Self::parse(&String::from_utf8_lossy(&bytes)))
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Value of the last `key=value` token, if any
    pub fn value(&self, key: &str) -> Option<&str> {
        self.tokens.iter().rev().find_map(|token| {
            let (k, v) = token.split_once('=')?;
            (k == key).then_some(v)
        })
    }

    /// Value for `strategy`, preferring `strategy.key` over `key`
    pub fn value_for(&self, strategy: &str, key: &str) -> Option<&str> {
        self.value(&format!("{strategy}.{key}"))
            .or_else(|| self.value(key))
    }

    /// Parsed value for `strategy`, or `default` when absent or unparseable
    pub fn parsed_for<T: FromStr + Copy>(&self, strategy: &str, key: &str, default: T) -> T {
        match self.value_for(strategy, key) {
            None => default,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                log::warn!("{strategy}: ignoring unparseable config {key}={raw:?}");
                default
            }),
        }
    }
}
