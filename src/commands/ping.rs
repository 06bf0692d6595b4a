use crate::{
    command_utils::expect_arity, commands::CommandError, resp::RespValue, session::SessionMode,
};

#[derive(Debug, Clone, PartialEq)]
pub struct PingArguments {
    pub message: Option<String>,
}

impl PingArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("PING", arguments, 0, Some(1))?;

        Ok(Self {
            message: arguments.first().cloned(),
        })
    }

    /// Subscribed connections get the `pong` push shape instead of a status.
    pub fn reply(&self, mode: SessionMode) -> RespValue {
        match (mode, &self.message) {
            (SessionMode::Subscribed, message) => RespValue::bulk_array([
                "pong".to_string(),
                message.clone().unwrap_or_default(),
            ]),
            (_, Some(message)) => RespValue::BulkString(message.clone()),
            (_, None) => RespValue::SimpleString("PONG".to_string()),
        }
    }
}
