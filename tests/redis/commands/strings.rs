use std::time::Duration;

use redis_engine::resp::RespValue;

use crate::test_utils::{TestEnv, TestUtils};

#[tokio::test]
async fn test_handle_set_and_get_commands() {
    let env = TestEnv::new();
    let client = env.connect().await;

    env.exec_commands(
        &client,
        vec![
            (
                TestUtils::get_command("grape"),
                TestUtils::expected_null(),
            ),
            (
                TestUtils::set_command("grape", "mango"),
                TestUtils::expected_simple_string("OK"),
            ),
            (
                TestUtils::get_command("grape"),
                TestUtils::expected_bulk_string("mango"),
            ),
            (
                TestUtils::command("SET", &["grape", "kiwi", "NX"]),
                TestUtils::expected_null(),
            ),
            (
                TestUtils::command("SET", &["grape", "kiwi", "XX"]),
                TestUtils::expected_simple_string("OK"),
            ),
            (
                TestUtils::command("GETSET", &["grape", "pear"]),
                TestUtils::expected_bulk_string("kiwi"),
            ),
            (
                TestUtils::get_command("grape"),
                TestUtils::expected_bulk_string("pear"),
            ),
        ],
    )
    .await;
}

#[tokio::test]
async fn test_handle_set_command_with_expiration() {
    tokio::time::pause();

    let env = TestEnv::new();
    let client = env.connect().await;

    env.exec_command_ok(
        &client,
        TestUtils::command("SET", &["grape", "mango", "PX", "100"]),
        &TestUtils::expected_simple_string("OK"),
    )
    .await;

    env.exec_command_ok(
        &client,
        TestUtils::get_command("grape"),
        &TestUtils::expected_bulk_string("mango"),
    )
    .await;

    tokio::time::advance(Duration::from_millis(200)).await;

    env.exec_command_ok(&client, TestUtils::get_command("grape"), &TestUtils::expected_null())
        .await;
}

#[tokio::test]
async fn test_handle_mset_and_mget_commands() {
    let env = TestEnv::new();
    let client = env.connect().await;

    env.exec_commands(
        &client,
        vec![
            (
                TestUtils::command("MSET", &["a", "1", "b", "2"]),
                TestUtils::expected_simple_string("OK"),
            ),
            (
                TestUtils::command("RPUSH", &["list", "x"]),
                TestUtils::expected_integer(1),
            ),
            (
                TestUtils::command("MGET", &["a", "missing", "list", "b"]),
                RespValue::Array(vec![
                    TestUtils::expected_bulk_string("1"),
                    TestUtils::expected_null(),
                    TestUtils::expected_null(),
                    TestUtils::expected_bulk_string("2"),
                ]),
            ),
        ],
    )
    .await;

    env.exec_command_err(
        &client,
        TestUtils::command("MSET", &["a", "1", "b"]),
        "ERR wrong number of arguments for 'MSET' command",
    )
    .await;
}

#[tokio::test]
async fn test_handle_counter_commands() {
    let env = TestEnv::new();
    let client = env.connect().await;

    env.exec_commands(
        &client,
        vec![
            (
                TestUtils::command("INCR", &["counter"]),
                TestUtils::expected_integer(1),
            ),
            (
                TestUtils::incrby_command("counter", 41),
                TestUtils::expected_integer(42),
            ),
            (
                TestUtils::command("DECR", &["counter"]),
                TestUtils::expected_integer(41),
            ),
            (
                TestUtils::command("DECRBY", &["counter", "40"]),
                TestUtils::expected_integer(1),
            ),
            (
                TestUtils::get_command("counter"),
                TestUtils::expected_bulk_string("1"),
            ),
        ],
    )
    .await;
}

#[tokio::test]
async fn test_handle_counter_command_errors() {
    let env = TestEnv::new();
    let client = env.connect().await;

    let test_cases = vec![
        (
            TestUtils::set_command("name", "ada"),
            TestUtils::command("INCR", &["name"]),
            "ERR value is not an integer or out of range",
        ),
        (
            TestUtils::set_command("max", &i64::MAX.to_string()),
            TestUtils::command("INCR", &["max"]),
            "ERR increment or decrement would overflow",
        ),
        (
            TestUtils::command("SADD", &["set", "x"]),
            TestUtils::command("INCR", &["set"]),
            "WRONGTYPE Operation against a key holding the wrong kind of value",
        ),
        (
            TestUtils::set_command("counter", "1"),
            TestUtils::command("INCRBY", &["counter", "one"]),
            "ERR value is not an integer or out of range",
        ),
    ];

    for (setup, command, expected_error) in test_cases {
        let setup_reply = client.send(setup).await;
        assert!(!setup_reply.is_error(), "setup failed: {:?}", setup_reply);

        env.exec_command_err(&client, command, expected_error).await;
    }
}

#[tokio::test]
async fn test_handle_append_and_strlen_commands() {
    let env = TestEnv::new();
    let client = env.connect().await;

    env.exec_commands(
        &client,
        vec![
            (
                TestUtils::command("STRLEN", &["greeting"]),
                TestUtils::expected_integer(0),
            ),
            (
                TestUtils::command("APPEND", &["greeting", "hello"]),
                TestUtils::expected_integer(5),
            ),
            (
                TestUtils::command("APPEND", &["greeting", " world"]),
                TestUtils::expected_integer(11),
            ),
            (
                TestUtils::command("STRLEN", &["greeting"]),
                TestUtils::expected_integer(11),
            ),
        ],
    )
    .await;
}

#[tokio::test]
async fn test_handle_string_command_arity_errors() {
    let env = TestEnv::new();
    let client = env.connect().await;

    let test_cases = vec![
        (
            TestUtils::command("GET", &[]),
            "ERR wrong number of arguments for 'GET' command",
        ),
        (
            TestUtils::command("GET", &["a", "b"]),
            "ERR wrong number of arguments for 'GET' command",
        ),
        (
            TestUtils::command("SET", &["a"]),
            "ERR wrong number of arguments for 'SET' command",
        ),
        (TestUtils::command("SET", &["a", "b", "NOPE"]), "ERR syntax error"),
    ];

    for (command, expected_error) in test_cases {
        env.exec_command_err(&client, command, expected_error).await;
    }
}
