//! Configuration loading and representation.

use thiserror::Error;

/// Largest explicit page size a gated query may request (unset = no limit).
pub const MAX_QUERY_LIMIT_VAR: &str = "ACCESSGATE_MAX_QUERY_LIMIT";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
}

/// Settings shared by every gated service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GateConfig {
    /// Largest `limit` a query may request. Queries without a limit are not bounded by it.
    pub max_query_limit: Option<u64>,
}

impl GateConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read settings through `lookup` (an environment stand-in).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_query_limit = match lookup(MAX_QUERY_LIMIT_VAR) {
            None => None,
            Some(raw) if raw.trim().is_empty() => None,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(limit) if limit > 0 => Some(limit),
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        var: MAX_QUERY_LIMIT_VAR,
                        value: raw,
                    });
                }
            },
        };

        Ok(Self { max_query_limit })
    }

    pub fn with_max_query_limit(mut self, limit: u64) -> Self {
        self.max_query_limit = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_to_unbounded() {
        let config = GateConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, GateConfig::default());
        assert_eq!(config.max_query_limit, None);
    }

    #[test]
    fn reads_the_query_cap() {
        let config = GateConfig::from_lookup(lookup(&[(MAX_QUERY_LIMIT_VAR, " 250 ")])).unwrap();
        assert_eq!(config.max_query_limit, Some(250));
    }

    #[test]
    fn blank_value_means_unset() {
        let config = GateConfig::from_lookup(lookup(&[(MAX_QUERY_LIMIT_VAR, "")])).unwrap();
        assert_eq!(config.max_query_limit, None);
    }

    #[test]
    fn rejects_zero_and_garbage() {
        for bad in ["0", "-3", "lots"] {
            let err = GateConfig::from_lookup(lookup(&[(MAX_QUERY_LIMIT_VAR, bad)])).unwrap_err();
            assert_eq!(
                err,
                ConfigError::InvalidNumber {
                    var: MAX_QUERY_LIMIT_VAR,
                    value: bad.to_string(),
                }
            );
        }
    }
}
