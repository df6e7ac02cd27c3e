//! Runtime configuration.
//!
//! A [`BufferConfig`] is consumed by [`StorageArena::new`](crate::memory::StorageArena::new).
//! The process-wide arena reads its configuration from the environment on
//! first use, see [`BufferConfig::from_env`].

use crate::error::{Error, Result};
use crate::memory::defaults;
use std::str::FromStr;

/// What to do with an encoding name that is not recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EncodingPolicy {
    /// Fall back to utf8, the behaviour observed in the host runtime.
    #[default]
    Lenient,
    /// Fail with [`Error::UnknownEncoding`].
    Strict,
}

impl FromStr for EncodingPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(EncodingPolicy::Lenient),
            "strict" => Ok(EncodingPolicy::Strict),
            _ => Err(Error::InvalidArgValue {
                name: "encoding_policy",
                received: format!("'{s}'"),
            }),
        }
    }
}

/// Configuration for a storage arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferConfig {
    /// Slab size for pooled allocations. Requests smaller than half of this
    /// are served from the pool.
    pub pool_size: usize,
    /// Requests of at least this many bytes are backed by `mmap`.
    pub mmap_threshold: usize,
    /// Handling of unknown encoding names.
    pub encoding_policy: EncodingPolicy,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            pool_size: defaults::POOL_SIZE,
            mmap_threshold: defaults::MMAP_THRESHOLD,
            encoding_policy: EncodingPolicy::Lenient,
        }
    }
}

impl BufferConfig {
    /// Set the pool slab size.
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    /// Set the mapping threshold.
    pub fn with_mmap_threshold(mut self, mmap_threshold: usize) -> Self {
        self.mmap_threshold = mmap_threshold;
        self
    }

    /// Set the encoding policy.
    pub fn with_encoding_policy(mut self, encoding_policy: EncodingPolicy) -> Self {
        self.encoding_policy = encoding_policy;
        self
    }

    /// Defaults overridden by `NODE_BUFFER_POOL_SIZE`,
    /// `NODE_BUFFER_MMAP_THRESHOLD` and `NODE_BUFFER_ENCODING_POLICY`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(defaults::ENV_POOL_SIZE) {
            config.pool_size = parse_size(defaults::ENV_POOL_SIZE, &raw)?;
        }
        if let Some(raw) = lookup(defaults::ENV_MMAP_THRESHOLD) {
            config.mmap_threshold = parse_size(defaults::ENV_MMAP_THRESHOLD, &raw)?;
        }
        if let Some(raw) = lookup(defaults::ENV_ENCODING_POLICY) {
            config.encoding_policy = raw.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the settings are usable.
    pub fn validate(&self) -> Result<()> {
        if self.mmap_threshold == 0 {
            return Err(Error::InvalidArgValue {
                name: "mmap_threshold",
                received: "0".into(),
            });
        }
        if self.pool_size > defaults::MAX_LENGTH {
            return Err(Error::out_of_range(
                "pool_size",
                format!(">= 0 && <= {}", defaults::MAX_LENGTH),
                self.pool_size,
            ));
        }
        Ok(())
    }
}

fn parse_size(name: &'static str, raw: &str) -> Result<usize> {
    raw.trim().parse::<usize>().map_err(|_| Error::InvalidArgValue {
        name,
        received: format!("'{raw}'"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = BufferConfig::default();
        assert_eq!(config.pool_size, 8192);
        assert_eq!(config.encoding_policy, EncodingPolicy::Lenient);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = BufferConfig::default()
            .with_pool_size(1024)
            .with_mmap_threshold(1 << 20)
            .with_encoding_policy(EncodingPolicy::Strict);
        assert_eq!(config.pool_size, 1024);
        assert_eq!(config.mmap_threshold, 1 << 20);
        assert_eq!(config.encoding_policy, EncodingPolicy::Strict);
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("NODE_BUFFER_POOL_SIZE", "16384"),
            ("NODE_BUFFER_ENCODING_POLICY", "Strict"),
        ]
        .into_iter()
        .collect();

        let config = BufferConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.pool_size, 16384);
        assert_eq!(config.mmap_threshold, defaults::MMAP_THRESHOLD);
        assert_eq!(config.encoding_policy, EncodingPolicy::Strict);
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let err = BufferConfig::from_lookup(|k| {
            (k == "NODE_BUFFER_POOL_SIZE").then(|| "lots".to_string())
        })
        .unwrap_err();
        assert_eq!(err.code(), "ERR_INVALID_ARG_VALUE");

        let err = BufferConfig::from_lookup(|k| {
            (k == "NODE_BUFFER_MMAP_THRESHOLD").then(|| "0".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, Error::InvalidArgValue { name: "mmap_threshold", .. }));
    }
}
