//! The serialized execution point.
//!
//! Every command from every connection is dispatched while holding one lock
//! over the store, the broker and the session table, so commands observe a
//! single total order and an EXEC batch is never interleaved with another
//! connection's command. Subscriber deliveries go through bounded outboxes
//! with `try_send`, so the lock is never held across I/O.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};

use crate::{
    broker::{Broker, PubSubMessage},
    commands::{Command, CommandDispatcher, CommandError, DispatchOutcome},
    key_value_store::KeyValueStore,
    resp::RespValue,
    session::{ConnectionId, ConnectionSession, SessionMode},
};

pub const DEFAULT_SUBSCRIBER_BUFFER: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Capacity of each connection's delivery outbox.
    pub subscriber_buffer: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            subscriber_buffer: DEFAULT_SUBSCRIBER_BUFFER,
        }
    }
}

#[derive(Debug, Default)]
struct EngineState {
    store: KeyValueStore,
    broker: Broker,
    sessions: HashMap<ConnectionId, ConnectionSession>,
}

#[derive(Debug, Clone)]
pub struct Engine {
    state: Arc<Mutex<EngineState>>,
    next_id: Arc<AtomicU64>,
    config: EngineConfig,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(EngineState::default())),
            next_id: Arc::new(AtomicU64::new(1)),
            config,
        }
    }

    /// Opens a session in NORMAL mode. The receiver yields every message the
    /// broker delivers to this connection.
    pub async fn connect(&self) -> (ConnectionId, mpsc::Receiver<PubSubMessage>) {
        let id = ConnectionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (outbox, deliveries) = mpsc::channel(self.config.subscriber_buffer.max(1));

        let mut state = self.state.lock().await;
        state.sessions.insert(id, ConnectionSession::new(id, outbox));
        debug!(connection = %id, sessions = state.sessions.len(), "session opened");

        (id, deliveries)
    }

    /// Destroys the session. Its open transaction is dropped unapplied and it
    /// leaves every channel.
    pub async fn disconnect(&self, id: ConnectionId) {
        let mut state = self.state.lock().await;

        if let Some(session) = state.sessions.remove(&id) {
            state.broker.drop_session(id);
            info!(
                connection = %id,
                mode = ?session.mode(),
                subscriptions = session.subscription_count(),
                "session closed"
            );
        }
    }

    pub async fn dispatch(&self, id: ConnectionId, command: Command) -> DispatchOutcome {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let Some(session) = state.sessions.get_mut(&id) else {
            return DispatchOutcome::from(Err(CommandError::ModeError(format!(
                "unknown connection {}",
                id
            ))));
        };

        CommandDispatcher::new(&mut state.store, &mut state.broker).dispatch(session, command)
    }

    /// Reports a frame that could not be turned into a command. An open
    /// transaction on `id` is invalidated.
    pub async fn reject(&self, id: ConnectionId, err: CommandError) -> DispatchOutcome {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        match state.sessions.get_mut(&id) {
            Some(session) => {
                CommandDispatcher::new(&mut state.store, &mut state.broker).reject(session, err)
            }
            None => DispatchOutcome::from(Err(err)),
        }
    }

    /// Dispatches `command` and returns its reply. Multi-frame replies
    /// (SUBSCRIBE with several channels) come back as one array.
    pub async fn submit(&self, id: ConnectionId, command: Command) -> RespValue {
        self.dispatch(id, command).await.into_reply()
    }

    pub async fn execute<I, S>(&self, id: ConnectionId, name: &str, arguments: I) -> RespValue
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.submit(id, Command::new(name, arguments)).await
    }

    pub async fn session_mode(&self, id: ConnectionId) -> Option<SessionMode> {
        let state = self.state.lock().await;
        state.sessions.get(&id).map(ConnectionSession::mode)
    }

    pub async fn subscriber_count(&self, channel: &str) -> usize {
        self.state.lock().await.broker.subscriber_count(channel)
    }

    pub async fn connection_count(&self) -> usize {
        self.state.lock().await.sessions.len()
    }
}
