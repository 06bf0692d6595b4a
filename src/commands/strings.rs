//! Scalar string commands: GET, SET, GETSET, MGET, MSET, INCR/DECR family,
//! APPEND, STRLEN.

use std::time::Duration;

use tokio::time::Instant;

use crate::{
    command_utils::{expect_arity, parse_expiration, parse_integer},
    commands::{CommandError, StoreError},
    key_value_store::{DataType, KeyValueStore, Value},
    resp::RespValue,
};

#[derive(Debug, Clone, PartialEq)]
pub struct GetArguments {
    pub key: String,
}

impl GetArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("GET", arguments, 1, Some(1))?;

        Ok(Self {
            key: arguments[0].clone(),
        })
    }

    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        Ok(match store.string(&self.key)? {
            Some(value) => RespValue::BulkString(value.clone()),
            None => RespValue::NullBulkString,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SetCondition {
    /// NX: only set when the key does not exist.
    IfAbsent,
    /// XX: only set when the key already exists.
    IfPresent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetArguments {
    pub key: String,
    pub value: String,
    pub expiration: Option<Duration>,
    pub condition: Option<SetCondition>,
}

impl SetArguments {
    /// Parses `key value [EX seconds | PX milliseconds] [NX | XX]`.
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("SET", arguments, 2, None)?;

        let mut expiration = None;
        let mut condition = None;
        let mut options = arguments[2..].iter();

        while let Some(option) = options.next() {
            match option.to_uppercase().as_str() {
                unit @ ("EX" | "PX") if expiration.is_none() => {
                    let Some(amount) = options.next() else {
                        return Err(CommandError::syntax());
                    };
                    let unit_millis = if unit == "EX" { 1000 } else { 1 };
                    expiration = Some(parse_expiration(amount, unit_millis)?);
                }
                "NX" if condition.is_none() => condition = Some(SetCondition::IfAbsent),
                "XX" if condition.is_none() => condition = Some(SetCondition::IfPresent),
                _ => return Err(CommandError::syntax()),
            }
        }

        Ok(Self {
            key: arguments[0].clone(),
            value: arguments[1].clone(),
            expiration,
            condition,
        })
    }

    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let exists = store.contains_key(&self.key);

        match (self.condition, exists) {
            (Some(SetCondition::IfAbsent), true) | (Some(SetCondition::IfPresent), false) => {
                return Ok(RespValue::NullBulkString);
            }
            _ => (),
        }

        store.insert(
            self.key.clone(),
            Value {
                data: DataType::String(self.value.clone()),
                expiration: self.expiration.map(|ttl| Instant::now() + ttl),
            },
        );

        Ok(RespValue::ok())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GetSetArguments {
    pub key: String,
    pub value: String,
}

impl GetSetArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("GETSET", arguments, 2, Some(2))?;

        Ok(Self {
            key: arguments[0].clone(),
            value: arguments[1].clone(),
        })
    }

    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let previous = store.string(&self.key)?.cloned();

        store.insert(
            self.key.clone(),
            Value::new(DataType::String(self.value.clone())),
        );

        Ok(previous.map_or(RespValue::NullBulkString, RespValue::BulkString))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MGetArguments {
    pub keys: Vec<String>,
}

impl MGetArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("MGET", arguments, 1, None)?;

        Ok(Self {
            keys: arguments.to_vec(),
        })
    }

    /// Keys that are absent or hold another kind read as nil.
    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let values = self
            .keys
            .iter()
            .map(|key| match store.string(key) {
                Ok(Some(value)) => RespValue::BulkString(value.clone()),
                _ => RespValue::NullBulkString,
            })
            .collect();

        Ok(RespValue::Array(values))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MSetArguments {
    pub pairs: Vec<(String, String)>,
}

impl MSetArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        if arguments.is_empty() || arguments.len() % 2 != 0 {
            return Err(CommandError::WrongArity("MSET".to_string()));
        }

        Ok(Self {
            pairs: arguments
                .chunks(2)
                .map(|pair| (pair[0].clone(), pair[1].clone()))
                .collect(),
        })
    }

    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        for (key, value) in &self.pairs {
            store.insert(key.clone(), Value::new(DataType::String(value.clone())));
        }

        Ok(RespValue::ok())
    }
}

/// Shared by INCR, DECR, INCRBY and DECRBY.
#[derive(Debug, Clone, PartialEq)]
pub struct IncrByArguments {
    pub key: String,
    pub delta: i64,
}

impl IncrByArguments {
    pub fn parse(name: &str, arguments: &[String]) -> Result<Self, CommandError> {
        let (delta, expected_arguments) = match name {
            "INCR" => (1, 1),
            "DECR" => (-1, 1),
            _ => (0, 2),
        };

        expect_arity(name, arguments, expected_arguments, Some(expected_arguments))?;

        let delta = match name {
            "INCRBY" => parse_integer(&arguments[1])?,
            "DECRBY" => parse_integer(&arguments[1])?
                .checked_neg()
                .ok_or_else(CommandError::not_an_integer)?,
            _ => delta,
        };

        Ok(Self {
            key: arguments[0].clone(),
            delta,
        })
    }

    /// Absent keys start from 0; the expiration of an existing key is kept.
    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let current = match store.string(&self.key)? {
            Some(value) => value
                .parse::<i64>()
                .map_err(|_| StoreError::not_an_integer())?,
            None => 0,
        };

        let updated = current
            .checked_add(self.delta)
            .ok_or_else(StoreError::overflow)?;

        if let Some(value) = store.string_mut(&self.key, true)? {
            *value = updated.to_string();
        }

        Ok(RespValue::Integer(updated))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppendArguments {
    pub key: String,
    pub value: String,
}

impl AppendArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("APPEND", arguments, 2, Some(2))?;

        Ok(Self {
            key: arguments[0].clone(),
            value: arguments[1].clone(),
        })
    }

    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let Some(stored) = store.string_mut(&self.key, true)? else {
            return Ok(RespValue::Integer(0));
        };

        stored.push_str(&self.value);

        Ok(RespValue::Integer(stored.len() as i64))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrlenArguments {
    pub key: String,
}

impl StrlenArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("STRLEN", arguments, 1, Some(1))?;

        Ok(Self {
            key: arguments[0].clone(),
        })
    }

    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let len = store.string(&self.key)?.map_or(0, |value| value.len());

        Ok(RespValue::Integer(len as i64))
    }
}
