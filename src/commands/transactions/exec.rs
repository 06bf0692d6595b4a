use tracing::debug;

use crate::{
    command_utils::expect_arity,
    commands::{Command, CommandError},
    session::ConnectionSession,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ExecArguments;

impl ExecArguments {
    pub fn parse(arguments: &[String]) -> Result<Self, CommandError> {
        expect_arity("EXEC", arguments, 0, Some(0))?;
        Ok(Self)
    }
}

/// Closes the open transaction and hands back its commands, in queue order,
/// for the caller to run as one batch.
///
/// A transaction that saw a queue-time error is dropped and reported as
/// `ExecAbort`.
pub fn exec(session: &mut ConnectionSession) -> Result<Vec<Command>, CommandError> {
    let Some(transaction) = session.take_transaction() else {
        return Err(CommandError::ModeError("EXEC without MULTI".to_string()));
    };

    if !transaction.valid {
        debug!(connection = %session.id, queued = transaction.len(), "transaction aborted");
        return Err(CommandError::ExecAbort);
    }

    debug!(connection = %session.id, queued = transaction.len(), "executing transaction");

    Ok(transaction.commands)
}
