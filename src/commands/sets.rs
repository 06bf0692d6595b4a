//! Unordered set commands: SADD, SREM, SMEMBERS, SISMEMBER, SCARD.

use crate::{
    command_utils::expect_arity,
    commands::{CommandError, StoreError},
    key_value_store::KeyValueStore,
    resp::RespValue,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SaddArguments {
    pub key: String,
    pub members: Vec<String>,
}

impl SaddArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("SADD", arguments, 2, None)?;

        Ok(Self {
            key: arguments[0].clone(),
            members: arguments[1..].to_vec(),
        })
    }

    /// Replies with the number of members that were not already present.
    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let Some(set) = store.set_mut(&self.key, true)? else {
            return Ok(RespValue::Integer(0));
        };

        let added = self
            .members
            .iter()
            .filter(|member| set.insert((*member).clone()))
            .count();

        Ok(RespValue::Integer(added as i64))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SremArguments {
    pub key: String,
    pub members: Vec<String>,
}

impl SremArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("SREM", arguments, 2, None)?;

        Ok(Self {
            key: arguments[0].clone(),
            members: arguments[1..].to_vec(),
        })
    }

    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let Some(set) = store.set_mut(&self.key, false)? else {
            return Ok(RespValue::Integer(0));
        };

        let removed = self
            .members
            .iter()
            .filter(|member| set.remove(member.as_str()))
            .count();

        store.remove_if_empty(&self.key);

        Ok(RespValue::Integer(removed as i64))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SmembersArguments {
    pub key: String,
}

impl SmembersArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("SMEMBERS", arguments, 1, Some(1))?;

        Ok(Self {
            key: arguments[0].clone(),
        })
    }

    /// Members are replied in lexicographic order so replies are stable.
    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let mut members: Vec<String> = store
            .set(&self.key)?
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        members.sort();

        Ok(RespValue::bulk_array(members))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SismemberArguments {
    pub key: String,
    pub member: String,
}

impl SismemberArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("SISMEMBER", arguments, 2, Some(2))?;

        Ok(Self {
            key: arguments[0].clone(),
            member: arguments[1].clone(),
        })
    }

    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let is_member = store
            .set(&self.key)?
            .is_some_and(|set| set.contains(&self.member));

        Ok(RespValue::Integer(is_member as i64))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScardArguments {
    pub key: String,
}

impl ScardArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("SCARD", arguments, 1, Some(1))?;

        Ok(Self {
            key: arguments[0].clone(),
        })
    }

    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let len = store.set(&self.key)?.map_or(0, |set| set.len());

        Ok(RespValue::Integer(len as i64))
    }
}
