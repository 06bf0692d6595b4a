//! Field map commands: HSET, HGET, HDEL, HGETALL, HEXISTS, HLEN, HINCRBY.

use crate::{
    command_utils::{expect_arity, parse_integer},
    commands::{CommandError, StoreError},
    key_value_store::KeyValueStore,
    resp::RespValue,
};

#[derive(Debug, Clone, PartialEq)]
pub struct HsetArguments {
    pub key: String,
    pub fields: Vec<(String, String)>,
}

impl HsetArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("HSET", arguments, 3, None)?;

        let pairs = &arguments[1..];
        if pairs.len() % 2 != 0 {
            return Err(CommandError::WrongArity("HSET".to_string()));
        }

        Ok(Self {
            key: arguments[0].clone(),
            fields: pairs
                .chunks(2)
                .map(|pair| (pair[0].clone(), pair[1].clone()))
                .collect(),
        })
    }

    /// Replies with the number of fields that were newly created.
    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let Some(hash) = store.hash_mut(&self.key, true)? else {
            return Ok(RespValue::Integer(0));
        };

        let created = self
            .fields
            .iter()
            .filter(|(field, value)| hash.insert(field.clone(), value.clone()).is_none())
            .count();

        Ok(RespValue::Integer(created as i64))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HgetArguments {
    pub key: String,
    pub field: String,
}

impl HgetArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("HGET", arguments, 2, Some(2))?;

        Ok(Self {
            key: arguments[0].clone(),
            field: arguments[1].clone(),
        })
    }

    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let value = store
            .hash(&self.key)?
            .and_then(|hash| hash.get(&self.field).cloned());

        Ok(value.map_or(RespValue::NullBulkString, RespValue::BulkString))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HdelArguments {
    pub key: String,
    pub fields: Vec<String>,
}

impl HdelArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("HDEL", arguments, 2, None)?;

        Ok(Self {
            key: arguments[0].clone(),
            fields: arguments[1..].to_vec(),
        })
    }

    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let Some(hash) = store.hash_mut(&self.key, false)? else {
            return Ok(RespValue::Integer(0));
        };

        let removed = self
            .fields
            .iter()
            .filter(|field| hash.remove(field.as_str()).is_some())
            .count();

        store.remove_if_empty(&self.key);

        Ok(RespValue::Integer(removed as i64))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HgetallArguments {
    pub key: String,
}

impl HgetallArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("HGETALL", arguments, 1, Some(1))?;

        Ok(Self {
            key: arguments[0].clone(),
        })
    }

    /// Field/value pairs flattened into one array, ordered by field name.
    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let mut fields: Vec<(String, String)> = store
            .hash(&self.key)?
            .map(|hash| {
                hash.iter()
                    .map(|(field, value)| (field.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default();
        fields.sort();

        Ok(RespValue::bulk_array(
            fields
                .into_iter()
                .flat_map(|(field, value)| [field, value]),
        ))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HexistsArguments {
    pub key: String,
    pub field: String,
}

impl HexistsArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("HEXISTS", arguments, 2, Some(2))?;

        Ok(Self {
            key: arguments[0].clone(),
            field: arguments[1].clone(),
        })
    }

    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let exists = store
            .hash(&self.key)?
            .is_some_and(|hash| hash.contains_key(&self.field));

        Ok(RespValue::Integer(exists as i64))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HlenArguments {
    pub key: String,
}

impl HlenArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("HLEN", arguments, 1, Some(1))?;

        Ok(Self {
            key: arguments[0].clone(),
        })
    }

    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let len = store.hash(&self.key)?.map_or(0, |hash| hash.len());

        Ok(RespValue::Integer(len as i64))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HincrbyArguments {
    pub key: String,
    pub field: String,
    pub delta: i64,
}

impl HincrbyArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("HINCRBY", arguments, 3, Some(3))?;

        Ok(Self {
            key: arguments[0].clone(),
            field: arguments[1].clone(),
            delta: parse_integer(&arguments[2])?,
        })
    }

    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let Some(hash) = store.hash_mut(&self.key, true)? else {
            return Ok(RespValue::Integer(0));
        };

        let current = match hash.get(&self.field) {
            Some(value) => value.parse::<i64>().map_err(|_| {
                StoreError::InvalidArgument("hash value is not an integer".to_string())
            })?,
            None => 0,
        };

        let updated = current
            .checked_add(self.delta)
            .ok_or_else(StoreError::overflow)?;
        hash.insert(self.field.clone(), updated.to_string());

        Ok(RespValue::Integer(updated))
    }
}
