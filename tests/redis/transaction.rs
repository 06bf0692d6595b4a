use redis_engine::{commands::CommandError, resp::RespValue, session::SessionMode};

use crate::test_utils::{TestEnv, TestUtils};

fn queued() -> RespValue {
    TestUtils::expected_simple_string("QUEUED")
}

#[tokio::test]
async fn test_handle_exec_runs_queued_commands_in_order() {
    let env = TestEnv::new();
    let client = env.connect().await;

    env.exec_commands(
        &client,
        vec![
            (TestUtils::set_command("balance", "1000"), RespValue::ok()),
            (TestUtils::multi_command(), RespValue::ok()),
            (TestUtils::incrby_command("balance", -100), queued()),
            (TestUtils::incrby_command("balance", -300), queued()),
            (TestUtils::get_command("balance"), queued()),
            (TestUtils::command("ECHO", &["done"]), queued()),
            (
                TestUtils::exec_command(),
                RespValue::Array(vec![
                    TestUtils::expected_integer(900),
                    TestUtils::expected_integer(600),
                    TestUtils::expected_bulk_string("600"),
                    TestUtils::expected_bulk_string("done"),
                ]),
            ),
        ],
    )
    .await;

    assert_eq!(client.mode().await, Some(SessionMode::Normal));
}

#[tokio::test]
async fn test_handle_queued_commands_are_invisible_before_exec() {
    let env = TestEnv::new();
    let writer = env.connect().await;
    let reader = env.connect().await;

    env.exec_commands(
        &writer,
        vec![
            (TestUtils::set_command("A", "1000"), RespValue::ok()),
            (TestUtils::set_command("B", "500"), RespValue::ok()),
            (TestUtils::multi_command(), RespValue::ok()),
            (TestUtils::command("DECRBY", &["A", "100"]), queued()),
            (TestUtils::incrby_command("B", 100), queued()),
            (TestUtils::get_command("A"), queued()),
            (TestUtils::get_command("B"), queued()),
        ],
    )
    .await;

    assert_eq!(writer.mode().await, Some(SessionMode::Queueing));

    env.exec_command_ok(
        &reader,
        TestUtils::get_command("A"),
        &TestUtils::expected_bulk_string("1000"),
    )
    .await;

    env.exec_command_ok(
        &writer,
        TestUtils::exec_command(),
        &RespValue::Array(vec![
            TestUtils::expected_integer(900),
            TestUtils::expected_integer(600),
            TestUtils::expected_bulk_string("900"),
            TestUtils::expected_bulk_string("600"),
        ]),
    )
    .await;

    env.exec_command_ok(
        &reader,
        TestUtils::command("MGET", &["A", "B"]),
        &TestUtils::expected_bulk_string_array(&["900", "600"]),
    )
    .await;
}

#[tokio::test]
async fn test_handle_exec_embeds_runtime_errors() {
    let env = TestEnv::new();
    let client = env.connect().await;

    env.exec_commands(
        &client,
        vec![
            (TestUtils::set_command("name", "ada"), RespValue::ok()),
            (TestUtils::multi_command(), RespValue::ok()),
            (TestUtils::set_command("counter", "1"), queued()),
            (TestUtils::command("INCR", &["name"]), queued()),
            (TestUtils::command("LPUSH", &["name", "x"]), queued()),
            (TestUtils::command("INCR", &["counter"]), queued()),
            (
                TestUtils::exec_command(),
                RespValue::Array(vec![
                    RespValue::ok(),
                    TestUtils::expected_error("ERR value is not an integer or out of range"),
                    TestUtils::expected_error(
                        "WRONGTYPE Operation against a key holding the wrong kind of value",
                    ),
                    TestUtils::expected_integer(2),
                ]),
            ),
        ],
    )
    .await;
}

#[tokio::test]
async fn test_handle_exec_aborts_after_queue_time_errors() {
    let env = TestEnv::new();
    let client = env.connect().await;

    let queue_time_errors = vec![
        (
            TestUtils::command("FROBNICATE", &["x"]),
            "ERR unknown command 'FROBNICATE'",
        ),
        (
            TestUtils::command("GET", &[]),
            "ERR wrong number of arguments for 'GET' command",
        ),
        (
            TestUtils::command("INCRBY", &["counter", "lots"]),
            "ERR value is not an integer or out of range",
        ),
    ];

    for (bad_command, expected_error) in queue_time_errors {
        env.exec_commands(
            &client,
            vec![
                (TestUtils::multi_command(), RespValue::ok()),
                (TestUtils::set_command("counter", "1"), queued()),
            ],
        )
        .await;

        env.exec_command_err(&client, bad_command, expected_error).await;

        env.exec_command_ok(&client, TestUtils::command("INCR", &["other"]), &queued())
            .await;

        env.exec_command_err(
            &client,
            TestUtils::exec_command(),
            "EXECABORT Transaction discarded because of previous errors.",
        )
        .await;

        assert_eq!(client.mode().await, Some(SessionMode::Normal));
        env.exec_command_ok(
            &client,
            TestUtils::command("EXISTS", &["counter", "other"]),
            &TestUtils::expected_integer(0),
        )
        .await;
    }
}

#[tokio::test]
async fn test_handle_malformed_frame_aborts_transaction() {
    let env = TestEnv::new();
    let client = env.connect().await;

    env.exec_commands(
        &client,
        vec![
            (TestUtils::multi_command(), RespValue::ok()),
            (TestUtils::set_command("counter", "1"), queued()),
        ],
    )
    .await;

    let malformed = CommandError::InvalidArgument("command name must be a bulk string".into());
    assert_eq!(
        env.engine.reject(client.id(), malformed).await.into_reply(),
        TestUtils::expected_error("ERR command name must be a bulk string")
    );
    assert_eq!(client.mode().await, Some(SessionMode::Queueing));

    env.exec_command_err(
        &client,
        TestUtils::exec_command(),
        "EXECABORT Transaction discarded because of previous errors.",
    )
    .await;
    env.exec_command_ok(&client, TestUtils::get_command("counter"), &TestUtils::expected_null())
        .await;
}

#[tokio::test]
async fn test_handle_empty_transaction() {
    let env = TestEnv::new();
    let client = env.connect().await;

    env.exec_commands(
        &client,
        vec![
            (TestUtils::multi_command(), RespValue::ok()),
            (TestUtils::exec_command(), RespValue::Array(vec![])),
        ],
    )
    .await;
}

#[tokio::test]
async fn test_handle_discard_drops_queue() {
    let env = TestEnv::new();
    let client = env.connect().await;

    env.exec_commands(
        &client,
        vec![
            (TestUtils::multi_command(), RespValue::ok()),
            (TestUtils::set_command("fruit", "mango"), queued()),
            (TestUtils::discard_command(), RespValue::ok()),
            (TestUtils::get_command("fruit"), TestUtils::expected_null()),
        ],
    )
    .await;

    env.exec_command_err(&client, TestUtils::exec_command(), "ERR EXEC without MULTI")
        .await;
    env.exec_command_err(&client, TestUtils::discard_command(), "ERR DISCARD without MULTI")
        .await;
}

#[tokio::test]
async fn test_handle_nested_multi_keeps_queue() {
    let env = TestEnv::new();
    let client = env.connect().await;

    env.exec_commands(
        &client,
        vec![
            (TestUtils::multi_command(), RespValue::ok()),
            (TestUtils::set_command("fruit", "mango"), queued()),
        ],
    )
    .await;

    env.exec_command_err(&client, TestUtils::multi_command(), "ERR MULTI calls can not be nested")
        .await;

    env.exec_command_ok(
        &client,
        TestUtils::exec_command(),
        &RespValue::Array(vec![RespValue::ok()]),
    )
    .await;
}

#[tokio::test]
async fn test_handle_subscribe_inside_transaction_is_rejected() {
    let env = TestEnv::new();
    let client = env.connect().await;

    env.exec_command_ok(&client, TestUtils::multi_command(), &RespValue::ok())
        .await;

    env.exec_command_err(
        &client,
        TestUtils::subscribe_command(&["news"]),
        "ERR Command 'subscribe' not allowed inside a transaction",
    )
    .await;

    env.exec_command_err(
        &client,
        TestUtils::exec_command(),
        "EXECABORT Transaction discarded because of previous errors.",
    )
    .await;

    assert_eq!(env.engine.subscriber_count("news").await, 0);
    assert_eq!(client.mode().await, Some(SessionMode::Normal));
}

#[tokio::test]
async fn test_handle_disconnect_drops_open_transaction() {
    let env = TestEnv::new();
    let client = env.connect().await;
    let observer = env.connect().await;

    env.exec_commands(
        &client,
        vec![
            (TestUtils::multi_command(), RespValue::ok()),
            (TestUtils::set_command("fruit", "mango"), queued()),
        ],
    )
    .await;

    client.close().await;

    env.exec_command_ok(&observer, TestUtils::get_command("fruit"), &TestUtils::expected_null())
        .await;
    assert_eq!(env.engine.connection_count().await, 1);
}
