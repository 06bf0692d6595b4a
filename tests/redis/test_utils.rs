use std::time::Duration;

use redis_engine::{
    client::Client,
    commands::Command,
    engine::{Engine, EngineConfig},
    resp::RespValue,
};
use tokio::time::timeout;

pub struct TestUtils;

impl TestUtils {
    /// Create a command from its name and string arguments
    pub fn command(name: &str, args: &[&str]) -> Command {
        Command::new(name, args.iter().copied())
    }

    /// Create a SET command
    pub fn set_command(key: &str, value: &str) -> Command {
        Self::command("SET", &[key, value])
    }

    /// Create a GET command
    pub fn get_command(key: &str) -> Command {
        Self::command("GET", &[key])
    }

    /// Create an INCRBY command
    pub fn incrby_command(key: &str, delta: i64) -> Command {
        Command::new("INCRBY", [key.to_string(), delta.to_string()])
    }

    /// Create a MULTI command
    pub fn multi_command() -> Command {
        Command::named("MULTI")
    }

    /// Create an EXEC command
    pub fn exec_command() -> Command {
        Command::named("EXEC")
    }

    /// Create a DISCARD command
    pub fn discard_command() -> Command {
        Command::named("DISCARD")
    }

    /// Create a SUBSCRIBE command
    pub fn subscribe_command(channels: &[&str]) -> Command {
        Self::command("SUBSCRIBE", channels)
    }

    /// Create an UNSUBSCRIBE command
    pub fn unsubscribe_command(channels: &[&str]) -> Command {
        Self::command("UNSUBSCRIBE", channels)
    }

    /// Create a PUBLISH command
    pub fn publish_command(channel: &str, message: &str) -> Command {
        Self::command("PUBLISH", &[channel, message])
    }

    /// Create expected simple string response
    pub fn expected_simple_string(value: &str) -> RespValue {
        RespValue::SimpleString(value.to_string())
    }

    /// Create expected bulk string response
    pub fn expected_bulk_string(value: &str) -> RespValue {
        RespValue::BulkString(value.to_string())
    }

    /// Create expected integer response
    pub fn expected_integer(value: i64) -> RespValue {
        RespValue::Integer(value)
    }

    /// Create expected null response
    pub fn expected_null() -> RespValue {
        RespValue::NullBulkString
    }

    /// Create expected bulk string array response
    pub fn expected_bulk_string_array(items: &[&str]) -> RespValue {
        RespValue::bulk_array(items.iter().copied())
    }

    /// Create expected subscribe / unsubscribe confirmation
    pub fn expected_confirmation(kind: &str, channel: &str, count: i64) -> RespValue {
        RespValue::Array(vec![
            RespValue::BulkString(kind.to_string()),
            RespValue::BulkString(channel.to_string()),
            RespValue::Integer(count),
        ])
    }

    /// Create expected pushed message frame
    pub fn expected_message(channel: &str, message: &str) -> RespValue {
        Self::expected_bulk_string_array(&["message", channel, message])
    }

    /// Create expected error reply
    pub fn expected_error(message: &str) -> RespValue {
        RespValue::Error(message.to_string())
    }

    pub fn subscribed_context_error(command_name: &str) -> String {
        format!(
            "ERR Can't execute '{}': {}",
            command_name.to_lowercase(),
            "only SUBSCRIBE / UNSUBSCRIBE / PING / QUIT are allowed in this context"
        )
    }
}

pub struct TestEnv {
    pub engine: Engine,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            engine: Engine::default(),
        }
    }

    pub fn with_subscriber_buffer(subscriber_buffer: usize) -> Self {
        Self {
            engine: Engine::new(EngineConfig { subscriber_buffer }),
        }
    }

    pub async fn connect(&self) -> Client {
        Client::connect(&self.engine).await
    }

    /// Send a command and check the reply
    pub async fn exec_command_ok(&self, client: &Client, command: Command, expected: &RespValue) {
        let name = command.name.clone();
        let reply = client.send(command).await;
        assert_eq!(&reply, expected, "reply to {}", name);
    }

    /// Send a command and check that it was rejected with the given error
    pub async fn exec_command_err(&self, client: &Client, command: Command, expected: &str) {
        let name = command.name.clone();
        let reply = client.send(command).await;
        assert_eq!(
            reply,
            TestUtils::expected_error(expected),
            "error reply to {}",
            name
        );
    }

    /// Send every command in order and check each reply
    pub async fn exec_commands(&self, client: &Client, test_cases: Vec<(Command, RespValue)>) {
        for (command, expected) in test_cases {
            self.exec_command_ok(client, command, &expected).await;
        }
    }

    /// Wait for the next delivered message, failing after one second
    pub async fn expect_message(client: &mut Client) -> RespValue {
        timeout(Duration::from_secs(1), client.next_message())
            .await
            .expect("message should arrive within timeout")
            .expect("delivery stream should stay open")
            .to_resp()
    }
}
