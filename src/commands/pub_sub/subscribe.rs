use crate::{
    broker::Broker,
    command_utils::expect_arity,
    commands::CommandError,
    resp::RespValue,
    session::ConnectionSession,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SubscribeArguments {
    pub channels: Vec<String>,
}

impl SubscribeArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("SUBSCRIBE", arguments, 1, None)?;

        Ok(Self {
            channels: arguments.to_vec(),
        })
    }
}

/// An empty channel list means "every channel the session holds".
#[derive(Debug, Clone, PartialEq)]
pub struct UnsubscribeArguments {
    pub channels: Vec<String>,
}

impl UnsubscribeArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        Ok(Self {
            channels: arguments.to_vec(),
        })
    }
}

fn confirmation(kind: &str, channel: Option<&str>, count: usize) -> RespValue {
    RespValue::Array(vec![
        RespValue::BulkString(kind.to_string()),
        channel.map_or(RespValue::NullBulkString, |channel| {
            RespValue::BulkString(channel.to_string())
        }),
        RespValue::Integer(count as i64),
    ])
}

/// Registers the session on each channel. One confirmation per channel,
/// carrying the session's running subscription count.
pub fn subscribe(
    session: &mut ConnectionSession,
    broker: &mut Broker,
    arguments: &SubscribeArguments,
) -> Vec<RespValue> {
    arguments
        .channels
        .iter()
        .map(|channel| {
            if session.add_subscription(channel) {
                broker.subscribe(session.id, channel, session.outbox().clone());
            }

            confirmation("subscribe", Some(channel), session.subscription_count())
        })
        .collect()
}

pub fn unsubscribe(
    session: &mut ConnectionSession,
    broker: &mut Broker,
    arguments: &UnsubscribeArguments,
) -> Vec<RespValue> {
    let channels: Vec<String> = if arguments.channels.is_empty() {
        session.subscriptions().cloned().collect()
    } else {
        arguments.channels.clone()
    };

    if channels.is_empty() {
        return vec![confirmation("unsubscribe", None, 0)];
    }

    channels
        .iter()
        .map(|channel| {
            if session.remove_subscription(channel) {
                broker.unsubscribe(session.id, channel);
            }

            confirmation("unsubscribe", Some(channel), session.subscription_count())
        })
        .collect()
}
