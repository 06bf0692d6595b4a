mod command;
mod command_dispatcher;
mod command_error;
mod echo;
mod ping;
mod store_command;

pub mod hashes;
pub mod keys;
pub mod lists;
pub mod pub_sub;
pub mod sets;
pub mod sorted_sets;
pub mod strings;
pub mod transactions;

pub use command::Command;
pub use command_dispatcher::{CommandDispatcher, DispatchOutcome, ParsedCommand};
pub use command_error::{CommandError, ErrorKind, StoreError};
pub use echo::EchoArguments;
pub use ping::PingArguments;
pub use store_command::StoreCommand;
