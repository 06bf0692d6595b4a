use globset::{Glob, GlobMatcher};

use crate::{
    broker::Broker, command_utils::expect_arity, commands::CommandError, resp::RespValue,
};

#[derive(Debug, Clone, PartialEq)]
pub struct PublishArguments {
    pub channel: String,
    pub message: String,
}

impl PublishArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("PUBLISH", arguments, 2, Some(2))?;

        Ok(Self {
            channel: arguments[0].clone(),
            message: arguments[1].clone(),
        })
    }
}

/// Replies with the number of subscribers the message was delivered to.
pub fn publish(broker: &Broker, arguments: &PublishArguments) -> RespValue {
    let delivered = broker.publish(&arguments.channel, &arguments.message);

    RespValue::Integer(delivered as i64)
}

/// PUBSUB CHANNELS [pattern] and PUBSUB NUMSUB [channel ...].
#[derive(Debug, Clone)]
pub enum PubSubArguments {
    Channels(Option<GlobMatcher>),
    NumSub(Vec<String>),
}

impl PubSubArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("PUBSUB", arguments, 1, None)?;

        match arguments[0].to_uppercase().as_str() {
            "CHANNELS" => {
                expect_arity("PUBSUB|CHANNELS", &arguments[1..], 0, Some(1))?;

                let matcher = match arguments.get(1) {
                    Some(pattern) => Some(
                        Glob::new(pattern)
                            .map_err(|e| {
                                let message = format!("invalid pattern: {}", e.kind());
                                CommandError::InvalidArgument(message)
                            })?
                            .compile_matcher(),
                    ),
                    None => None,
                };

                Ok(PubSubArguments::Channels(matcher))
            }
            "NUMSUB" => Ok(PubSubArguments::NumSub(arguments[1..].to_vec())),
            other => Err(CommandError::InvalidArgument(format!(
                "unknown subcommand '{}'",
                other.to_lowercase()
            ))),
        }
    }

    pub fn reply(&self, broker: &Broker) -> RespValue {
        match self {
            PubSubArguments::Channels(matcher) => RespValue::bulk_array(
                broker
                    .channels()
                    .into_iter()
                    .filter(|channel| matcher.as_ref().map_or(true, |m| m.is_match(channel))),
            ),
            PubSubArguments::NumSub(channels) => RespValue::Array(
                channels
                    .iter()
                    .flat_map(|channel| {
                        [
                            RespValue::BulkString(channel.clone()),
                            RespValue::Integer(broker.subscriber_count(channel) as i64),
                        ]
                    })
                    .collect(),
            ),
        }
    }
}
