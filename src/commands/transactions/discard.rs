use tracing::debug;

use crate::{
    command_utils::expect_arity,
    commands::CommandError,
    resp::RespValue,
    session::ConnectionSession,
};

#[derive(Debug, Clone, PartialEq)]
pub struct DiscardArguments;

impl DiscardArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("DISCARD", arguments, 0, Some(0))?;
        Ok(Self)
    }
}

pub fn discard(session: &mut ConnectionSession) -> Result<RespValue, CommandError> {
    let Some(transaction) = session.take_transaction() else {
        return Err(CommandError::ModeError("DISCARD without MULTI".to_string()));
    };

    debug!(connection = %session.id, queued = transaction.len(), "transaction discarded");

    Ok(RespValue::ok())
}
