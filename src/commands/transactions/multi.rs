use tracing::debug;

use crate::{
    command_utils::expect_arity,
    commands::CommandError,
    resp::RespValue,
    session::{ConnectionSession, SessionMode},
};

#[derive(Debug, Clone, PartialEq)]
pub struct MultiArguments;

impl MultiArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("MULTI", arguments, 0, Some(0))?;
        Ok(Self)
    }
}

/// Opens a transaction. Nesting is rejected and leaves the open queue as it
/// was.
pub fn multi(session: &mut ConnectionSession) -> Result<RespValue, CommandError> {
    if session.mode() == SessionMode::Queueing {
        return Err(CommandError::ModeError(
            "MULTI calls can not be nested".to_string(),
        ));
    }

    session.begin_transaction();
    debug!(connection = %session.id, "transaction started");

    Ok(RespValue::ok())
}
