use crate::{command_utils::expect_arity, commands::CommandError, resp::RespValue};

/// ECHO replies with its single argument as a bulk string.
#[derive(Debug, Clone, PartialEq)]
pub struct EchoArguments {
    pub message: String,
}

impl EchoArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("ECHO", arguments, 1, Some(1))?;

        Ok(Self {
            message: arguments[0].clone(),
        })
    }

    pub fn reply(&self) -> RespValue {
        RespValue::BulkString(self.message.clone())
    }
}
