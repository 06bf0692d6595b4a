//! Mode-aware routing of one command for one session.
//!
//! NORMAL runs everything. QUEUEING parses each command and queues it until
//! EXEC; MULTI, EXEC, DISCARD and QUIT act immediately. SUBSCRIBED only
//! accepts SUBSCRIBE, UNSUBSCRIBE, PING and QUIT.

use tracing::debug;

use crate::{
    broker::Broker,
    command_utils::expect_arity,
    commands::{
        pub_sub::{
            PubSubArguments, PublishArguments, SubscribeArguments, UnsubscribeArguments, publish,
            subscribe, unsubscribe,
        },
        transactions::{DiscardArguments, ExecArguments, MultiArguments, discard, exec, multi},
        Command, CommandError, EchoArguments, PingArguments, StoreCommand,
    },
    key_value_store::KeyValueStore,
    resp::RespValue,
    session::{ConnectionSession, SessionMode},
};

#[derive(Debug, Clone)]
pub enum ParsedCommand {
    Store(StoreCommand),
    Ping(PingArguments),
    Echo(EchoArguments),
    Quit,
    Multi(MultiArguments),
    Exec(ExecArguments),
    Discard(DiscardArguments),
    Subscribe(SubscribeArguments),
    Unsubscribe(UnsubscribeArguments),
    Publish(PublishArguments),
    PubSub(PubSubArguments),
}

impl ParsedCommand {
    pub fn parse(command: &Command) -> Result<Self, CommandError> {
        if let Some(store_command) = StoreCommand::parse(command)? {
            return Ok(ParsedCommand::Store(store_command));
        }

        let arguments = command.arguments.as_slice();

        let parsed = match command.name.as_str() {
            "PING" => ParsedCommand::Ping(PingArguments::parse(arguments)?),
            "ECHO" => ParsedCommand::Echo(EchoArguments::parse(arguments)?),
            "QUIT" => {
                expect_arity("QUIT", arguments, 0, Some(0))?;
                ParsedCommand::Quit
            }
            "MULTI" => ParsedCommand::Multi(MultiArguments::parse(arguments)?),
            "EXEC" => ParsedCommand::Exec(ExecArguments::parse(arguments)?),
            "DISCARD" => ParsedCommand::Discard(DiscardArguments::parse(arguments)?),
            "SUBSCRIBE" => ParsedCommand::Subscribe(SubscribeArguments::parse(arguments)?),
            "UNSUBSCRIBE" => ParsedCommand::Unsubscribe(UnsubscribeArguments::parse(arguments)?),
            "PUBLISH" => ParsedCommand::Publish(PublishArguments::parse(arguments)?),
            "PUBSUB" => ParsedCommand::PubSub(PubSubArguments::parse(arguments)?),
            _ => return Err(CommandError::UnknownCommand(command.name.clone())),
        };

        Ok(parsed)
    }
}

/// Checked on the name alone, before arguments are parsed, so a malformed
/// command outside this list still gets the subscribed-context error.
fn allowed_while_subscribed(name: &str) -> bool {
    matches!(name, "SUBSCRIBE" | "UNSUBSCRIBE" | "PING" | "QUIT")
}

fn invalidate_transaction(session: &mut ConnectionSession) {
    if let Some(transaction) = session.transaction_mut() {
        transaction.invalidate();
    }
}

/// What the transport should do with the result of a dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// A single reply.
    Reply(RespValue),
    /// Several frames written back to back (one per SUBSCRIBE/UNSUBSCRIBE
    /// channel).
    Frames(Vec<RespValue>),
    /// Write the reply, then close the connection.
    Close(RespValue),
}

impl DispatchOutcome {
    /// Collapses the outcome into one value: multi-frame outcomes become an
    /// array of their frames.
    pub fn into_reply(self) -> RespValue {
        match self {
            DispatchOutcome::Reply(reply) | DispatchOutcome::Close(reply) => reply,
            DispatchOutcome::Frames(mut frames) if frames.len() == 1 => frames.remove(0),
            DispatchOutcome::Frames(frames) => RespValue::Array(frames),
        }
    }

    pub fn frames(self) -> Vec<RespValue> {
        match self {
            DispatchOutcome::Reply(reply) | DispatchOutcome::Close(reply) => vec![reply],
            DispatchOutcome::Frames(frames) => frames,
        }
    }
}

impl From<Result<RespValue, CommandError>> for DispatchOutcome {
    fn from(result: Result<RespValue, CommandError>) -> Self {
        DispatchOutcome::Reply(result.unwrap_or_else(|err| err.to_resp()))
    }
}

/// Routes commands against the shared store and broker. Constructed for the
/// duration of one dispatch while the caller holds the execution lock.
pub struct CommandDispatcher<'a> {
    store: &'a mut KeyValueStore,
    broker: &'a mut Broker,
}

impl<'a> CommandDispatcher<'a> {
    pub fn new(store: &'a mut KeyValueStore, broker: &'a mut Broker) -> Self {
        Self { store, broker }
    }

    pub fn dispatch(
        &mut self,
        session: &mut ConnectionSession,
        command: Command,
    ) -> DispatchOutcome {
        debug!(
            connection = %session.id,
            command = %command.name,
            mode = ?session.mode(),
            "dispatch"
        );

        match session.mode() {
            SessionMode::Queueing => self.dispatch_queueing(session, command),
            SessionMode::Subscribed if !allowed_while_subscribed(&command.name) => {
                let err = CommandError::not_allowed_while_subscribed(&command.name);
                DispatchOutcome::from(Err(err))
            }
            SessionMode::Subscribed | SessionMode::Normal => {
                match ParsedCommand::parse(&command) {
                    Ok(parsed) => self.run(session, parsed),
                    Err(err) => DispatchOutcome::from(Err(err)),
                }
            }
        }
    }

    /// Answers a frame that never became a command. Inside MULTI this counts
    /// as a queue-time error and the pending EXEC will abort.
    pub fn reject(
        &mut self,
        session: &mut ConnectionSession,
        err: CommandError,
    ) -> DispatchOutcome {
        debug!(connection = %session.id, error = %err, mode = ?session.mode(), "rejected frame");

        if session.mode() == SessionMode::Queueing {
            invalidate_transaction(session);
        }

        DispatchOutcome::from(Err(err))
    }

    fn dispatch_queueing(
        &mut self,
        session: &mut ConnectionSession,
        command: Command,
    ) -> DispatchOutcome {
        let parsed = match ParsedCommand::parse(&command) {
            Ok(parsed) => parsed,
            Err(err) => {
                invalidate_transaction(session);
                return DispatchOutcome::from(Err(err));
            }
        };

        match parsed {
            ParsedCommand::Multi(_)
            | ParsedCommand::Exec(_)
            | ParsedCommand::Discard(_)
            | ParsedCommand::Quit => self.run(session, parsed),
            ParsedCommand::Subscribe(_) | ParsedCommand::Unsubscribe(_) => {
                invalidate_transaction(session);
                DispatchOutcome::from(Err(CommandError::ModeError(format!(
                    "Command '{}' not allowed inside a transaction",
                    command.name.to_lowercase()
                ))))
            }
            _ => {
                if let Some(transaction) = session.transaction_mut() {
                    transaction.push(command);
                }
                DispatchOutcome::Reply(RespValue::SimpleString("QUEUED".to_string()))
            }
        }
    }

    fn run(&mut self, session: &mut ConnectionSession, parsed: ParsedCommand) -> DispatchOutcome {
        match parsed {
            ParsedCommand::Store(store_command) => DispatchOutcome::from(
                store_command.apply(self.store).map_err(CommandError::from),
            ),
            ParsedCommand::Ping(arguments) => {
                DispatchOutcome::Reply(arguments.reply(session.mode()))
            }
            ParsedCommand::Echo(arguments) => DispatchOutcome::Reply(arguments.reply()),
            ParsedCommand::Quit => DispatchOutcome::Close(RespValue::ok()),
            ParsedCommand::Multi(_) => DispatchOutcome::from(multi(session)),
            ParsedCommand::Exec(_) => match exec(session) {
                Ok(commands) => DispatchOutcome::Reply(self.run_batch(session, commands)),
                Err(err) => DispatchOutcome::from(Err(err)),
            },
            ParsedCommand::Discard(_) => DispatchOutcome::from(discard(session)),
            ParsedCommand::Subscribe(arguments) => {
                DispatchOutcome::Frames(subscribe(session, self.broker, &arguments))
            }
            ParsedCommand::Unsubscribe(arguments) => {
                DispatchOutcome::Frames(unsubscribe(session, self.broker, &arguments))
            }
            ParsedCommand::Publish(arguments) => {
                DispatchOutcome::Reply(publish(self.broker, &arguments))
            }
            ParsedCommand::PubSub(arguments) => {
                DispatchOutcome::Reply(arguments.reply(self.broker))
            }
        }
    }

    /// Runs queued commands in order. Each slot holds that command's reply or
    /// error; a failing command does not stop the ones after it.
    fn run_batch(&mut self, session: &mut ConnectionSession, commands: Vec<Command>) -> RespValue {
        let replies = commands
            .iter()
            .map(|command| match ParsedCommand::parse(command) {
                Ok(parsed) => self.run(session, parsed).into_reply(),
                Err(err) => err.to_resp(),
            })
            .collect();

        RespValue::Array(replies)
    }
}
