//! Purpose-specific façades over a [`Client`]. Each one owns its own
//! connection to the shared engine and never touches the store directly.

use std::time::Duration;

use crate::{
    client::{Client, ClientError, array_reply, bulk_reply, integer_reply, ok_reply},
    command_utils::format_score,
    engine::Engine,
    resp::RespValue,
};

/// String values with an optional time to live.
pub struct CacheManager {
    client: Client,
}

impl CacheManager {
    pub async fn new(engine: &Engine) -> Self {
        Self {
            client: Client::connect(engine).await,
        }
    }

    pub async fn put(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), ClientError> {
        let mut arguments = vec![key.to_string(), value.to_string()];

        if let Some(ttl) = ttl {
            arguments.push("PX".to_string());
            arguments.push(ttl.as_millis().max(1).to_string());
        }

        ok_reply(self.client.command("SET", arguments).await)
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        bulk_reply(self.client.command("GET", [key]).await)
    }

    /// Returns whether an entry was removed.
    pub async fn invalidate(&self, key: &str) -> Result<bool, ClientError> {
        Ok(integer_reply(self.client.command("DEL", [key]).await)? > 0)
    }
}

/// FIFO work queues backed by lists.
pub struct QueueManager {
    client: Client,
}

impl QueueManager {
    pub async fn new(engine: &Engine) -> Self {
        Self {
            client: Client::connect(engine).await,
        }
    }

    /// Returns the queue length after the push.
    pub async fn enqueue(&self, queue: &str, item: &str) -> Result<usize, ClientError> {
        Ok(integer_reply(self.client.command("RPUSH", [queue, item]).await)? as usize)
    }

    pub async fn dequeue(&self, queue: &str) -> Result<Option<String>, ClientError> {
        bulk_reply(self.client.command("LPOP", [queue]).await)
    }

    pub async fn len(&self, queue: &str) -> Result<usize, ClientError> {
        Ok(integer_reply(self.client.command("LLEN", [queue]).await)? as usize)
    }
}

/// Scores per player, highest first.
pub struct Leaderboard {
    client: Client,
}

impl Leaderboard {
    pub async fn new(engine: &Engine) -> Self {
        Self {
            client: Client::connect(engine).await,
        }
    }

    /// Adds `points` to the player's score and returns the new score.
    pub async fn record(&self, board: &str, player: &str, points: f64) -> Result<f64, ClientError> {
        let reply = self
            .client
            .command("ZINCRBY", [board.to_string(), format_score(points), player.to_string()])
            .await;

        parse_score(bulk_reply(reply)?)
    }

    /// The `n` best players with their scores.
    pub async fn top(&self, board: &str, n: usize) -> Result<Vec<(String, f64)>, ClientError> {
        if n == 0 {
            return Ok(Vec::new());
        }

        let reply = self
            .client
            .command(
                "ZREVRANGE",
                [board.to_string(), "0".to_string(), (n - 1).to_string(), "WITHSCORES".to_string()],
            )
            .await;

        array_reply(reply)?
            .chunks(2)
            .map(|pair| match pair {
                [RespValue::BulkString(player), score] => {
                    Ok((player.clone(), parse_score(bulk_reply(score.clone())?)?))
                }
                _ => Err(ClientError::UnexpectedReply(RespValue::Array(pair.to_vec()))),
            })
            .collect()
    }

    /// Zero-based position counted from the best score.
    pub async fn rank(&self, board: &str, player: &str) -> Result<Option<usize>, ClientError> {
        let replies = self
            .client
            .transaction()
            .command("ZRANK", [board, player])
            .command("ZCARD", [board])
            .execute()
            .await?;

        match replies.as_slice() {
            [RespValue::Integer(rank), RespValue::Integer(len)] => {
                Ok(Some((len - 1 - rank) as usize))
            }
            [RespValue::NullBulkString, RespValue::Integer(_)] => Ok(None),
            _ => Err(ClientError::UnexpectedReply(RespValue::Array(replies.clone()))),
        }
    }
}

fn parse_score(reply: Option<String>) -> Result<f64, ClientError> {
    let text = reply.ok_or(ClientError::UnexpectedReply(RespValue::NullBulkString))?;

    match text.as_str() {
        "inf" => Ok(f64::INFINITY),
        "-inf" => Ok(f64::NEG_INFINITY),
        _ => text
            .parse::<f64>()
            .map_err(|_| ClientError::UnexpectedReply(RespValue::BulkString(text.clone()))),
    }
}
