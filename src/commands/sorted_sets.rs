//! Sorted set commands: ZADD, ZREM, ZSCORE, ZINCRBY, ZCARD, ZRANK,
//! ZRANGE and ZREVRANGE.

use crate::{
    command_utils::{expect_arity, format_score, parse_float, parse_integer, validate_range_indexes},
    commands::{CommandError, StoreError},
    key_value_store::KeyValueStore,
    resp::RespValue,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ZaddArguments {
    pub key: String,
    pub entries: Vec<(f64, String)>,
}

impl ZaddArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("ZADD", arguments, 3, None)?;

        let pairs = &arguments[1..];
        if pairs.len() % 2 != 0 {
            return Err(CommandError::syntax());
        }

        let entries = pairs
            .chunks(2)
            .map(|pair| Ok((parse_float(&pair[0])?, pair[1].clone())))
            .collect::<Result<Vec<_>, CommandError>>()?;

        Ok(Self {
            key: arguments[0].clone(),
            entries,
        })
    }

    /// Replies with the number of newly added members; existing members
    /// only have their score updated.
    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let Some(zset) = store.sorted_set_mut(&self.key, true)? else {
            return Ok(RespValue::Integer(0));
        };

        let added = self
            .entries
            .iter()
            .filter(|(score, member)| zset.insert(member, *score))
            .count();

        Ok(RespValue::Integer(added as i64))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZremArguments {
    pub key: String,
    pub members: Vec<String>,
}

impl ZremArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("ZREM", arguments, 2, None)?;

        Ok(Self {
            key: arguments[0].clone(),
            members: arguments[1..].to_vec(),
        })
    }

    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let Some(zset) = store.sorted_set_mut(&self.key, false)? else {
            return Ok(RespValue::Integer(0));
        };

        let removed = self
            .members
            .iter()
            .filter(|member| zset.remove(member))
            .count();

        store.remove_if_empty(&self.key);

        Ok(RespValue::Integer(removed as i64))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZscoreArguments {
    pub key: String,
    pub member: String,
}

impl ZscoreArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("ZSCORE", arguments, 2, Some(2))?;

        Ok(Self {
            key: arguments[0].clone(),
            member: arguments[1].clone(),
        })
    }

    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let score = store
            .sorted_set(&self.key)?
            .and_then(|zset| zset.score(&self.member));

        Ok(score.map_or(RespValue::NullBulkString, |score| {
            RespValue::BulkString(format_score(score))
        }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZincrbyArguments {
    pub key: String,
    pub increment: f64,
    pub member: String,
}

impl ZincrbyArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("ZINCRBY", arguments, 3, Some(3))?;

        Ok(Self {
            key: arguments[0].clone(),
            increment: parse_float(&arguments[1])?,
            member: arguments[2].clone(),
        })
    }

    /// Missing members start from a score of 0. Replies with the new score.
    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let Some(zset) = store.sorted_set_mut(&self.key, true)? else {
            return Ok(RespValue::NullBulkString);
        };

        let updated = zset.score(&self.member).unwrap_or(0.0) + self.increment;
        if updated.is_nan() {
            return Err(StoreError::InvalidArgument(
                "resulting score is not a number (NaN)".to_string(),
            ));
        }

        zset.insert(&self.member, updated);

        Ok(RespValue::BulkString(format_score(updated)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZcardArguments {
    pub key: String,
}

impl ZcardArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("ZCARD", arguments, 1, Some(1))?;

        Ok(Self {
            key: arguments[0].clone(),
        })
    }

    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let len = store.sorted_set(&self.key)?.map_or(0, |zset| zset.len());

        Ok(RespValue::Integer(len as i64))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZrankArguments {
    pub key: String,
    pub member: String,
}

impl ZrankArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("ZRANK", arguments, 2, Some(2))?;

        Ok(Self {
            key: arguments[0].clone(),
            member: arguments[1].clone(),
        })
    }

    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let rank = store
            .sorted_set(&self.key)?
            .and_then(|zset| zset.rank(&self.member));

        Ok(rank.map_or(RespValue::NullBulkString, |rank| {
            RespValue::Integer(rank as i64)
        }))
    }
}

/// ZRANGE and ZREVRANGE.
#[derive(Debug, Clone, PartialEq)]
pub struct ZrangeArguments {
    pub key: String,
    pub start: i64,
    pub stop: i64,
    pub reverse: bool,
    pub with_scores: bool,
}

impl ZrangeArguments {
    pub fn parse(name: &str, arguments: &[String], reverse: bool) -> Result<Self, CommandError> {
        expect_arity(name, arguments, 3, Some(4))?;

        let with_scores = match arguments.get(3) {
            Some(option) if option.eq_ignore_ascii_case("WITHSCORES") => true,
            Some(_) => return Err(CommandError::syntax()),
            None => false,
        };

        Ok(Self {
            key: arguments[0].clone(),
            start: parse_integer(&arguments[1])?,
            stop: parse_integer(&arguments[2])?,
            reverse,
            with_scores,
        })
    }

    pub fn apply(&self, store: &mut KeyValueStore) -> Result<RespValue, StoreError> {
        let Some(zset) = store.sorted_set(&self.key)? else {
            return Ok(RespValue::Array(Vec::new()));
        };

        let Some((start, end)) = validate_range_indexes(zset.len(), self.start, self.stop) else {
            return Ok(RespValue::Array(Vec::new()));
        };

        let ordered: Vec<(&str, f64)> = if self.reverse {
            zset.iter().rev().collect()
        } else {
            zset.iter().collect()
        };

        let mut reply = Vec::new();
        for (member, score) in &ordered[start..=end] {
            reply.push(RespValue::BulkString(member.to_string()));
            if self.with_scores {
                reply.push(RespValue::BulkString(format_score(*score)));
            }
        }

        Ok(RespValue::Array(reply))
    }
}
