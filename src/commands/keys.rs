//! Keyspace commands that work on any kind of value: DEL, EXISTS, TYPE, KEYS,
//! EXPIRE/PEXPIRE, TTL/PTTL, PERSIST, RENAME, DBSIZE, FLUSHDB.

use std::time::Duration;

use globset::{Glob, GlobMatcher};
use tokio::time::Instant;

use crate::{
    command_utils::{expect_arity, parse_expiration},
    commands::{CommandError, StoreError},
    key_value_store::KeyValueStore,
    resp::RespValue,
};

#[derive(Debug, Clone, PartialEq)]
pub struct DelArguments {
    pub keys: Vec<String>,
}

impl DelArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("DEL", arguments, 1, None)?;

        Ok(Self {
            keys: arguments.to_vec(),
        })
    }

    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let removed = self
            .keys
            .iter()
            .filter(|key| store.remove(key).is_some())
            .count();

        Ok(RespValue::Integer(removed as i64))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExistsArguments {
    pub keys: Vec<String>,
}

impl ExistsArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("EXISTS", arguments, 1, None)?;

        Ok(Self {
            keys: arguments.to_vec(),
        })
    }

    /// A key named twice is counted twice.
    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let found = self
            .keys
            .iter()
            .filter(|key| store.contains_key(key))
            .count();

        Ok(RespValue::Integer(found as i64))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeArguments {
    pub key: String,
}

impl TypeArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("TYPE", arguments, 1, Some(1))?;

        Ok(Self {
            key: arguments[0].clone(),
        })
    }

    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let type_name = store
            .get(&self.key)
            .map_or("none", |value| value.data.type_name());

        Ok(RespValue::SimpleString(type_name.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct KeysArguments {
    pub pattern: String,
    matcher: GlobMatcher,
}

impl KeysArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("KEYS", arguments, 1, Some(1))?;

        let matcher = Glob::new(&arguments[0])
            .map_err(|e| CommandError::InvalidArgument(format!("invalid pattern: {}", e.kind())))?
            .compile_matcher();

        Ok(Self {
            pattern: arguments[0].clone(),
            matcher,
        })
    }

    /// Matching keys in lexicographic order.
    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let mut keys: Vec<String> = store
            .keys()
            .into_iter()
            .filter(|key| self.matcher.is_match(key))
            .collect();
        keys.sort();

        Ok(RespValue::bulk_array(keys))
    }
}

/// EXPIRE (seconds) and PEXPIRE (milliseconds).
#[derive(Debug, Clone, PartialEq)]
pub struct ExpireArguments {
    pub key: String,
    pub ttl: Duration,
}

impl ExpireArguments {
    pub fn parse(name: &str, arguments: &[String], unit_millis: u64) -> Result<Self, CommandError> {
        expect_arity(name, arguments, 2, Some(2))?;

        Ok(Self {
            key: arguments[0].clone(),
            ttl: parse_expiration(&arguments[1], unit_millis)?,
        })
    }

    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let Some(value) = store.get_mut(&self.key) else {
            return Ok(RespValue::Integer(0));
        };

        value.expiration = Some(Instant::now() + self.ttl);

        Ok(RespValue::Integer(1))
    }
}

/// TTL (seconds) and PTTL (milliseconds). Replies -2 for a missing key and
/// -1 for a key without an expiration.
#[derive(Debug, Clone, PartialEq)]
pub struct TtlArguments {
    pub key: String,
    pub millis: bool,
}

impl TtlArguments {
    pub fn parse(name: &str, arguments: &[String], millis: bool) -> Result<Self, CommandError> {
        expect_arity(name, arguments, 1, Some(1))?;

        Ok(Self {
            key: arguments[0].clone(),
            millis,
        })
    }

    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let Some(value) = store.get(&self.key) else {
            return Ok(RespValue::Integer(-2));
        };

        let Some(deadline) = value.expiration else {
            return Ok(RespValue::Integer(-1));
        };

        let remaining = deadline.saturating_duration_since(Instant::now()).as_millis() as i64;

        Ok(RespValue::Integer(if self.millis {
            remaining
        } else {
            (remaining + 500) / 1000
        }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersistArguments {
    pub key: String,
}

impl PersistArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("PERSIST", arguments, 1, Some(1))?;

        Ok(Self {
            key: arguments[0].clone(),
        })
    }

    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let cleared = store
            .get_mut(&self.key)
            .and_then(|value| value.expiration.take())
            .is_some();

        Ok(RespValue::Integer(cleared as i64))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenameArguments {
    pub source: String,
    pub destination: String,
}

impl RenameArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("RENAME", arguments, 2, Some(2))?;

        Ok(Self {
            source: arguments[0].clone(),
            destination: arguments[1].clone(),
        })
    }

    /// Moves the value, expiration included, replacing whatever the
    /// destination held.
    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let value = store.remove(&self.source).ok_or(StoreError::NoSuchKey)?;
        store.insert(self.destination.clone(), value);

        Ok(RespValue::ok())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DbSizeArguments;

impl DbSizeArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("DBSIZE", arguments, 0, Some(0))?;
        Ok(Self)
    }

    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        Ok(RespValue::Integer(store.len() as i64))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlushDbArguments;

impl FlushDbArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("FLUSHDB", arguments, 0, Some(0))?;
        Ok(Self)
    }

    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        store.clear();
        Ok(RespValue::ok())
    }
}
