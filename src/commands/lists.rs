//! Sequence commands: LPUSH, RPUSH, LPOP, RPOP, LRANGE, LLEN, LINDEX, LSET.

use crate::{
    command_utils::{expect_arity, parse_count, parse_integer, validate_range_indexes},
    commands::{CommandError, StoreError},
    key_value_store::KeyValueStore,
    resp::RespValue,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ListEnd {
    Head,
    Tail,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PushArguments {
    pub key: String,
    pub values: Vec<String>,
    pub end: ListEnd,
}

impl PushArguments {
    pub fn parse(name: &str, arguments: &[String], end: ListEnd) -> Result<Self, CommandError> {
        expect_arity(name, arguments, 2, None)?;

        Ok(Self {
            key: arguments[0].clone(),
            values: arguments[1..].to_vec(),
            end,
        })
    }

    /// Replies with the length of the list after the push.
    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let Some(list) = store.list_mut(&self.key, true)? else {
            return Ok(RespValue::Integer(0));
        };

        for value in &self.values {
            match self.end {
                ListEnd::Head => list.push_front(value.clone()),
                ListEnd::Tail => list.push_back(value.clone()),
            }
        }

        Ok(RespValue::Integer(list.len() as i64))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PopArguments {
    pub key: String,
    pub count: Option<usize>,
    pub end: ListEnd,
}

impl PopArguments {
    pub fn parse(name: &str, arguments: &[String], end: ListEnd) -> Result<Self, CommandError> {
        expect_arity(name, arguments, 1, Some(2))?;

        let count = match arguments.get(1) {
            Some(count) => Some(parse_count(count)?),
            None => None,
        };

        Ok(Self {
            key: arguments[0].clone(),
            count,
            end,
        })
    }

    /// Without a count, replies with one element (or nil). With a count,
    /// replies with an array of up to `count` elements (nil array when the
    /// key is absent).
    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let Some(list) = store.list_mut(&self.key, false)? else {
            return Ok(match self.count {
                Some(_) => RespValue::NullArray,
                None => RespValue::NullBulkString,
            });
        };

        let wanted = self.count.unwrap_or(1).min(list.len());
        let mut popped = Vec::with_capacity(wanted);

        for _ in 0..wanted {
            let element = match self.end {
                ListEnd::Head => list.pop_front(),
                ListEnd::Tail => list.pop_back(),
            };

            if let Some(element) = element {
                popped.push(element);
            }
        }

        store.remove_if_empty(&self.key);

        Ok(match self.count {
            Some(_) => RespValue::bulk_array(popped),
            None => popped
                .pop()
                .map_or(RespValue::NullBulkString, RespValue::BulkString),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LrangeArguments {
    pub key: String,
    pub start: i64,
    pub stop: i64,
}

impl LrangeArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("LRANGE", arguments, 3, Some(3))?;

        Ok(Self {
            key: arguments[0].clone(),
            start: parse_integer(&arguments[1])?,
            stop: parse_integer(&arguments[2])?,
        })
    }

    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let Some(list) = store.list(&self.key)? else {
            return Ok(RespValue::Array(Vec::new()));
        };

        let Some((start, end)) = validate_range_indexes(list.len(), self.start, self.stop) else {
            return Ok(RespValue::Array(Vec::new()));
        };

        Ok(RespValue::bulk_array(list.range(start..=end).cloned()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LlenArguments {
    pub key: String,
}

impl LlenArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("LLEN", arguments, 1, Some(1))?;

        Ok(Self {
            key: arguments[0].clone(),
        })
    }

    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let len = store.list(&self.key)?.map_or(0, |list| list.len());

        Ok(RespValue::Integer(len as i64))
    }
}

fn resolve_index(len: usize, index: i64) -> Option<usize> {
    let len = len as i64;
    let resolved = if index < 0 { len + index } else { index };

    (0..len).contains(&resolved).then_some(resolved as usize)
}

#[derive(Debug, Clone, PartialEq)]
pub struct LindexArguments {
    pub key: String,
    pub index: i64,
}

impl LindexArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("LINDEX", arguments, 2, Some(2))?;

        Ok(Self {
            key: arguments[0].clone(),
            index: parse_integer(&arguments[1])?,
        })
    }

    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let element = store.list(&self.key)?.and_then(|list| {
            resolve_index(list.len(), self.index).and_then(|index| list.get(index).cloned())
        });

        Ok(element.map_or(RespValue::NullBulkString, RespValue::BulkString))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LsetArguments {
    pub key: String,
    pub index: i64,
    pub value: String,
}

impl LsetArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("LSET", arguments, 3, Some(3))?;

        Ok(Self {
            key: arguments[0].clone(),
            index: parse_integer(&arguments[1])?,
            value: arguments[2].clone(),
        })
    }

    /// Requires an existing list; absent keys fail with `NoSuchKey`.
    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let Some(list) = store.list_mut(&self.key, false)? else {
            return Err(StoreError::NoSuchKey);
        };

        let Some(index) = resolve_index(list.len(), self.index) else {
            return Err(StoreError::InvalidArgument("index out of range".to_string()));
        };

        list[index] = self.value.clone();

        Ok(RespValue::ok())
    }
}
