//! Per-connection state: the session mode, the pending transaction and the
//! set of subscribed channels.

use std::{collections::BTreeSet, fmt};

use tokio::sync::mpsc;

use crate::{broker::PubSubMessage, commands::Command};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Normal,
    Queueing,
    Subscribed,
}

/// Commands accepted after MULTI, waiting for EXEC.
///
/// A queue-time error marks the transaction invalid; EXEC then aborts without
/// running anything.
#[derive(Debug, Default)]
pub struct QueuedTransaction {
    pub commands: Vec<Command>,
    pub valid: bool,
}

impl QueuedTransaction {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            valid: true,
        }
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[derive(Debug)]
pub struct ConnectionSession {
    pub id: ConnectionId,
    transaction: Option<QueuedTransaction>,
    subscriptions: BTreeSet<String>,
    outbox: mpsc::Sender<PubSubMessage>,
}

impl ConnectionSession {
    pub fn new(id: ConnectionId, outbox: mpsc::Sender<PubSubMessage>) -> Self {
        Self {
            id,
            transaction: None,
            subscriptions: BTreeSet::new(),
            outbox,
        }
    }

    /// QUEUEING while a transaction is open, SUBSCRIBED while at least one
    /// channel is held, NORMAL otherwise.
    pub fn mode(&self) -> SessionMode {
        if self.transaction.is_some() {
            SessionMode::Queueing
        } else if !self.subscriptions.is_empty() {
            SessionMode::Subscribed
        } else {
            SessionMode::Normal
        }
    }

    pub fn outbox(&self) -> &mpsc::Sender<PubSubMessage> {
        &self.outbox
    }

    pub fn begin_transaction(&mut self) {
        self.transaction = Some(QueuedTransaction::new());
    }

    pub fn transaction_mut(&mut self) -> Option<&mut QueuedTransaction> {
        self.transaction.as_mut()
    }

    /// Closes the open transaction, returning it.
    pub fn take_transaction(&mut self) -> Option<QueuedTransaction> {
        self.transaction.take()
    }

    pub fn subscriptions(&self) -> impl Iterator<Item = &String> {
        self.subscriptions.iter()
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn add_subscription(&mut self, channel: &str) -> bool {
        self.subscriptions.insert(channel.to_string())
    }

    pub fn remove_subscription(&mut self, channel: &str) -> bool {
        self.subscriptions.remove(channel)
    }
}
