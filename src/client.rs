//! In-process client over an [`Engine`].
//!
//! A `Client` is one connection: it has its own session mode, transaction
//! queue and delivery stream, exactly like a TCP client would.

use thiserror::Error;
use tokio::sync::mpsc::{self, error::TryRecvError};

use crate::{
    broker::PubSubMessage,
    commands::Command,
    engine::Engine,
    resp::RespValue,
    session::{ConnectionId, SessionMode},
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    #[error("{0}")]
    Reply(String),
    #[error("unexpected reply: {0:?}")]
    UnexpectedReply(RespValue),
}

impl ClientError {
    fn from_reply(reply: RespValue) -> Self {
        match reply {
            RespValue::Error(message) => ClientError::Reply(message),
            other => ClientError::UnexpectedReply(other),
        }
    }
}

pub fn integer_reply(reply: RespValue) -> Result<i64, ClientError> {
    match reply {
        RespValue::Integer(value) => Ok(value),
        other => Err(ClientError::from_reply(other)),
    }
}

pub fn bulk_reply(reply: RespValue) -> Result<Option<String>, ClientError> {
    match reply {
        RespValue::BulkString(value) => Ok(Some(value)),
        RespValue::NullBulkString => Ok(None),
        other => Err(ClientError::from_reply(other)),
    }
}

pub fn array_reply(reply: RespValue) -> Result<Vec<RespValue>, ClientError> {
    match reply {
        RespValue::Array(values) => Ok(values),
        RespValue::NullArray => Ok(Vec::new()),
        other => Err(ClientError::from_reply(other)),
    }
}

pub fn ok_reply(reply: RespValue) -> Result<(), ClientError> {
    match reply {
        RespValue::SimpleString(status) if status == "OK" => Ok(()),
        other => Err(ClientError::from_reply(other)),
    }
}

pub struct Client {
    engine: Engine,
    id: ConnectionId,
    deliveries: mpsc::Receiver<PubSubMessage>,
    closed: bool,
}

impl Client {
    pub async fn connect(engine: &Engine) -> Self {
        let (id, deliveries) = engine.connect().await;

        Self {
            engine: engine.clone(),
            id,
            deliveries,
            closed: false,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub async fn command<I, S>(&self, name: &str, arguments: I) -> RespValue
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.send(Command::new(name, arguments)).await
    }

    pub async fn send(&self, command: Command) -> RespValue {
        self.engine.submit(self.id, command).await
    }

    pub async fn mode(&self) -> Option<SessionMode> {
        self.engine.session_mode(self.id).await
    }

    /// Waits for the next message delivered to this connection.
    pub async fn next_message(&mut self) -> Option<PubSubMessage> {
        self.deliveries.recv().await
    }

    /// A message already delivered to this connection, if any.
    pub fn try_next_message(&mut self) -> Option<PubSubMessage> {
        match self.deliveries.try_recv() {
            Ok(message) => Some(message),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    pub fn pipeline(&self) -> Pipeline<'_> {
        Pipeline {
            client: self,
            commands: Vec::new(),
        }
    }

    pub fn transaction(&self) -> Transaction<'_> {
        Transaction {
            client: self,
            commands: Vec::new(),
        }
    }

    /// Ends the session: any open transaction is dropped and all
    /// subscriptions are released.
    pub async fn close(mut self) {
        self.closed = true;
        self.engine.disconnect(self.id).await;
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        if self.closed {
            return;
        }

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let engine = self.engine.clone();
            let id = self.id;
            handle.spawn(async move { engine.disconnect(id).await });
        }
    }
}

/// Commands sent back to back; every reply is collected in order and a
/// failing command does not stop the rest.
pub struct Pipeline<'a> {
    client: &'a Client,
    commands: Vec<Command>,
}

impl Pipeline<'_> {
    pub fn command<I, S>(mut self, name: &str, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.commands.push(Command::new(name, arguments));
        self
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub async fn execute(self) -> Vec<RespValue> {
        let mut replies = Vec::with_capacity(self.commands.len());

        for command in self.commands {
            replies.push(self.client.send(command).await);
        }

        replies
    }
}

/// MULTI, the queued commands, then EXEC.
pub struct Transaction<'a> {
    client: &'a Client,
    commands: Vec<Command>,
}

impl Transaction<'_> {
    pub fn command<I, S>(mut self, name: &str, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.commands.push(Command::new(name, arguments));
        self
    }

    /// Returns the EXEC reply array, or the error EXEC answered with
    /// (EXECABORT when a command was rejected at queue time).
    pub async fn execute(self) -> Result<Vec<RespValue>, ClientError> {
        ok_reply(self.client.send(Command::named("MULTI")).await)?;

        for command in self.commands {
            // Rejections invalidate the transaction; EXEC reports them.
            self.client.send(command).await;
        }

        array_reply(self.client.send(Command::named("EXEC")).await)
    }
}
