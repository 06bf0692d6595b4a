use thiserror::Error;

use crate::resp::RespValue;

/// Errors raised by the keyed store while applying a single command.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("operation against a key holding the wrong kind of value")]
    TypeMismatch,
    #[error("no such key")]
    NoSuchKey,
    #[error("{0}")]
    InvalidArgument(String),
}

impl StoreError {
    pub fn not_an_integer() -> Self {
        StoreError::InvalidArgument("value is not an integer or out of range".to_string())
    }

    pub fn not_a_float() -> Self {
        StoreError::InvalidArgument("value is not a valid float".to_string())
    }

    pub fn overflow() -> Self {
        StoreError::InvalidArgument("increment or decrement would overflow".to_string())
    }
}

/// Broad error classes reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    TypeMismatch,
    NoSuchKey,
    InvalidArgument,
    ModeError,
    ExecAbort,
    UnknownCommand,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    TypeMismatch,
    #[error("ERR no such key")]
    NoSuchKey,
    #[error("ERR {0}")]
    InvalidArgument(String),
    #[error("ERR wrong number of arguments for '{0}' command")]
    WrongArity(String),
    #[error("ERR {0}")]
    ModeError(String),
    #[error("EXECABORT Transaction discarded because of previous errors.")]
    ExecAbort,
    #[error("ERR unknown command '{0}'")]
    UnknownCommand(String),
}

impl CommandError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CommandError::TypeMismatch => ErrorKind::TypeMismatch,
            CommandError::NoSuchKey => ErrorKind::NoSuchKey,
            CommandError::InvalidArgument(_) | CommandError::WrongArity(_) => {
                ErrorKind::InvalidArgument
            }
            CommandError::ModeError(_) => ErrorKind::ModeError,
            CommandError::ExecAbort => ErrorKind::ExecAbort,
            CommandError::UnknownCommand(_) => ErrorKind::UnknownCommand,
        }
    }

    pub fn syntax() -> Self {
        CommandError::InvalidArgument("syntax error".to_string())
    }

    pub fn not_an_integer() -> Self {
        StoreError::not_an_integer().into()
    }

    pub fn not_a_float() -> Self {
        StoreError::not_a_float().into()
    }

    pub fn not_allowed_while_subscribed(command_name: &str) -> Self {
        CommandError::ModeError(format!(
            concat!(
                "Can't execute '{}': ",
                "only SUBSCRIBE / UNSUBSCRIBE / PING / QUIT are allowed in this context"
            ),
            command_name.to_lowercase()
        ))
    }

    pub fn to_resp(&self) -> RespValue {
        RespValue::Error(self.to_string())
    }
}

impl From<StoreError> for CommandError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::TypeMismatch => CommandError::TypeMismatch,
            StoreError::NoSuchKey => CommandError::NoSuchKey,
            StoreError::InvalidArgument(message) => CommandError::InvalidArgument(message),
        }
    }
}
