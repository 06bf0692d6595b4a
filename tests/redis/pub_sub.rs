use redis_engine::{resp::RespValue, session::SessionMode};

use crate::test_utils::{TestEnv, TestUtils};

#[tokio::test]
async fn test_handle_publish_reaches_every_subscriber() {
    let env = TestEnv::new();
    let mut first = env.connect().await;
    let mut second = env.connect().await;
    let publisher = env.connect().await;

    for subscriber in [&first, &second] {
        env.exec_command_ok(
            subscriber,
            TestUtils::subscribe_command(&["alerts"]),
            &TestUtils::expected_confirmation("subscribe", "alerts", 1),
        )
        .await;
    }

    env.exec_command_ok(
        &publisher,
        TestUtils::publish_command("alerts", "fire"),
        &TestUtils::expected_integer(2),
    )
    .await;

    for subscriber in [&mut first, &mut second] {
        assert_eq!(
            TestEnv::expect_message(subscriber).await,
            TestUtils::expected_message("alerts", "fire")
        );
    }
}

#[tokio::test]
async fn test_handle_publish_without_subscribers() {
    let env = TestEnv::new();
    let publisher = env.connect().await;

    env.exec_command_ok(
        &publisher,
        TestUtils::publish_command("nobody-listens", "hello"),
        &TestUtils::expected_integer(0),
    )
    .await;
}

#[tokio::test]
async fn test_handle_late_subscriber_misses_earlier_messages() {
    let env = TestEnv::new();
    let publisher = env.connect().await;
    let mut late = env.connect().await;

    env.exec_command_ok(
        &publisher,
        TestUtils::publish_command("news", "first"),
        &TestUtils::expected_integer(0),
    )
    .await;

    env.exec_command_ok(
        &late,
        TestUtils::subscribe_command(&["news"]),
        &TestUtils::expected_confirmation("subscribe", "news", 1),
    )
    .await;

    env.exec_command_ok(
        &publisher,
        TestUtils::publish_command("news", "second"),
        &TestUtils::expected_integer(1),
    )
    .await;

    assert_eq!(
        TestEnv::expect_message(&mut late).await,
        TestUtils::expected_message("news", "second")
    );
    assert!(late.try_next_message().is_none());
}

#[tokio::test]
async fn test_handle_messages_arrive_in_publish_order() {
    let env = TestEnv::new();
    let publisher = env.connect().await;
    let mut subscriber = env.connect().await;

    env.exec_command_ok(
        &subscriber,
        TestUtils::subscribe_command(&["ticks", "tocks"]),
        &RespValue::Array(vec![
            TestUtils::expected_confirmation("subscribe", "ticks", 1),
            TestUtils::expected_confirmation("subscribe", "tocks", 2),
        ]),
    )
    .await;

    let published = [("ticks", "1"), ("tocks", "2"), ("ticks", "3")];
    for (channel, message) in published {
        publisher.send(TestUtils::publish_command(channel, message)).await;
    }

    for (channel, message) in published {
        assert_eq!(
            TestEnv::expect_message(&mut subscriber).await,
            TestUtils::expected_message(channel, message)
        );
    }
}

#[tokio::test]
async fn test_handle_subscribed_mode_restrictions() {
    let env = TestEnv::new();
    let client = env.connect().await;

    env.exec_command_ok(
        &client,
        TestUtils::subscribe_command(&["news"]),
        &TestUtils::expected_confirmation("subscribe", "news", 1),
    )
    .await;
    assert_eq!(client.mode().await, Some(SessionMode::Subscribed));

    let rejected = vec![
        TestUtils::get_command("fruit"),
        TestUtils::multi_command(),
        TestUtils::publish_command("news", "hi"),
        TestUtils::command("ECHO", &["hi"]),
        TestUtils::command("GET", &[]),
        TestUtils::command("SET", &["fruit"]),
        TestUtils::command("FROBNICATE", &[]),
    ];

    for command in rejected {
        let expected = TestUtils::subscribed_context_error(&command.name);
        env.exec_command_err(&client, command, &expected).await;
    }

    env.exec_commands(
        &client,
        vec![
            (
                TestUtils::command("PING", &[]),
                TestUtils::expected_bulk_string_array(&["pong", ""]),
            ),
            (
                TestUtils::command("PING", &["still here"]),
                TestUtils::expected_bulk_string_array(&["pong", "still here"]),
            ),
            (
                TestUtils::unsubscribe_command(&[]),
                TestUtils::expected_confirmation("unsubscribe", "news", 0),
            ),
            (
                TestUtils::command("PING", &[]),
                TestUtils::expected_simple_string("PONG"),
            ),
        ],
    )
    .await;

    assert_eq!(client.mode().await, Some(SessionMode::Normal));
}

#[tokio::test]
async fn test_handle_unsubscribe_counts() {
    let env = TestEnv::new();
    let client = env.connect().await;

    env.exec_commands(
        &client,
        vec![
            (
                TestUtils::subscribe_command(&["a", "b", "c"]),
                RespValue::Array(vec![
                    TestUtils::expected_confirmation("subscribe", "a", 1),
                    TestUtils::expected_confirmation("subscribe", "b", 2),
                    TestUtils::expected_confirmation("subscribe", "c", 3),
                ]),
            ),
            (
                TestUtils::unsubscribe_command(&["b", "zzz"]),
                RespValue::Array(vec![
                    TestUtils::expected_confirmation("unsubscribe", "b", 2),
                    TestUtils::expected_confirmation("unsubscribe", "zzz", 2),
                ]),
            ),
            (
                TestUtils::unsubscribe_command(&[]),
                RespValue::Array(vec![
                    TestUtils::expected_confirmation("unsubscribe", "a", 1),
                    TestUtils::expected_confirmation("unsubscribe", "c", 0),
                ]),
            ),
            (
                TestUtils::unsubscribe_command(&[]),
                RespValue::Array(vec![
                    TestUtils::expected_bulk_string("unsubscribe"),
                    TestUtils::expected_null(),
                    TestUtils::expected_integer(0),
                ]),
            ),
        ],
    )
    .await;
}

#[tokio::test]
async fn test_handle_disconnect_releases_subscriptions() {
    let env = TestEnv::new();
    let subscriber = env.connect().await;
    let publisher = env.connect().await;

    env.exec_command_ok(
        &subscriber,
        TestUtils::subscribe_command(&["news", "sports"]),
        &RespValue::Array(vec![
            TestUtils::expected_confirmation("subscribe", "news", 1),
            TestUtils::expected_confirmation("subscribe", "sports", 2),
        ]),
    )
    .await;

    assert_eq!(env.engine.subscriber_count("news").await, 1);
    assert_eq!(env.engine.subscriber_count("sports").await, 1);

    subscriber.close().await;

    assert_eq!(env.engine.subscriber_count("news").await, 0);
    assert_eq!(env.engine.subscriber_count("sports").await, 0);

    env.exec_commands(
        &publisher,
        vec![
            (
                TestUtils::publish_command("news", "anyone?"),
                TestUtils::expected_integer(0),
            ),
            (
                TestUtils::command("PUBSUB", &["CHANNELS"]),
                TestUtils::expected_bulk_string_array(&[]),
            ),
        ],
    )
    .await;
}

#[tokio::test]
async fn test_handle_pubsub_introspection() {
    let env = TestEnv::new();
    let first = env.connect().await;
    let second = env.connect().await;
    let observer = env.connect().await;

    first
        .send(TestUtils::subscribe_command(&["news", "news.tech"]))
        .await;
    second.send(TestUtils::subscribe_command(&["news"])).await;

    env.exec_commands(
        &observer,
        vec![
            (
                TestUtils::command("PUBSUB", &["CHANNELS"]),
                TestUtils::expected_bulk_string_array(&["news", "news.tech"]),
            ),
            (
                TestUtils::command("PUBSUB", &["CHANNELS", "*.tech"]),
                TestUtils::expected_bulk_string_array(&["news.tech"]),
            ),
            (
                TestUtils::command("PUBSUB", &["NUMSUB", "news", "news.tech", "weather"]),
                RespValue::Array(vec![
                    TestUtils::expected_bulk_string("news"),
                    TestUtils::expected_integer(2),
                    TestUtils::expected_bulk_string("news.tech"),
                    TestUtils::expected_integer(1),
                    TestUtils::expected_bulk_string("weather"),
                    TestUtils::expected_integer(0),
                ]),
            ),
        ],
    )
    .await;
}

#[tokio::test]
async fn test_handle_full_outbox_drops_delivery() {
    let env = TestEnv::with_subscriber_buffer(1);
    let mut subscriber = env.connect().await;
    let publisher = env.connect().await;

    subscriber.send(TestUtils::subscribe_command(&["burst"])).await;

    env.exec_commands(
        &publisher,
        vec![
            (
                TestUtils::publish_command("burst", "one"),
                TestUtils::expected_integer(1),
            ),
            (
                TestUtils::publish_command("burst", "two"),
                TestUtils::expected_integer(0),
            ),
        ],
    )
    .await;

    assert_eq!(
        TestEnv::expect_message(&mut subscriber).await,
        TestUtils::expected_message("burst", "one")
    );
    assert!(subscriber.try_next_message().is_none());
}
