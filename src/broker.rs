//! Channel registry for publish/subscribe.
//!
//! Delivery is fire-and-forget over each subscriber's bounded outbox. A full
//! or closed outbox drops that one message for that one subscriber and is
//! not counted as delivered; other subscribers are unaffected.

use std::collections::{BTreeSet, HashMap};

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::warn;

use crate::{resp::RespValue, session::ConnectionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PubSubMessage {
    pub channel: String,
    pub message: String,
}

impl PubSubMessage {
    pub fn new(channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            message: message.into(),
        }
    }

    /// The push frame written to a subscribed connection.
    pub fn to_resp(&self) -> RespValue {
        RespValue::bulk_array(["message", self.channel.as_str(), self.message.as_str()])
    }
}

#[derive(Debug, Default)]
pub struct Broker {
    channels: HashMap<String, HashMap<ConnectionId, mpsc::Sender<PubSubMessage>>>,
}

impl Broker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when `id` was already subscribed to `channel`.
    pub fn subscribe(
        &mut self,
        id: ConnectionId,
        channel: &str,
        outbox: mpsc::Sender<PubSubMessage>,
    ) -> bool {
        self.channels
            .entry(channel.to_string())
            .or_default()
            .insert(id, outbox)
            .is_none()
    }

    pub fn unsubscribe(&mut self, id: ConnectionId, channel: &str) -> bool {
        let Some(subscribers) = self.channels.get_mut(channel) else {
            return false;
        };

        let removed = subscribers.remove(&id).is_some();
        if subscribers.is_empty() {
            self.channels.remove(channel);
        }

        removed
    }

    /// Removes `id` from every channel it is subscribed to.
    pub fn drop_session(&mut self, id: ConnectionId) {
        self.channels.retain(|_, subscribers| {
            subscribers.remove(&id);
            !subscribers.is_empty()
        });
    }

    /// Delivers `message` to the current subscribers of `channel` and
    /// returns how many outboxes accepted it.
    pub fn publish(&self, channel: &str, message: &str) -> usize {
        let Some(subscribers) = self.channels.get(channel) else {
            return 0;
        };

        let mut delivered = 0;

        for (id, outbox) in subscribers {
            match outbox.try_send(PubSubMessage::new(channel, message)) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    warn!(connection = %id, channel, "subscriber outbox full, message dropped");
                }
                Err(TrySendError::Closed(_)) => {
                    warn!(connection = %id, channel, "subscriber outbox closed, message dropped");
                }
            }
        }

        delivered
    }

    /// Channels with at least one subscriber, sorted.
    pub fn channels(&self) -> Vec<String> {
        self.channels
            .keys()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.channels.get(channel).map_or(0, |subscribers| subscribers.len())
    }
}
