use crate::test_utils::{TestEnv, TestUtils};

#[tokio::test]
async fn test_handle_set_commands() {
    let env = TestEnv::new();
    let client = env.connect().await;

    env.exec_commands(
        &client,
        vec![
            (
                TestUtils::command("SADD", &["tags", "tokio", "serde", "tokio"]),
                TestUtils::expected_integer(2),
            ),
            (
                TestUtils::command("SADD", &["tags", "bytes"]),
                TestUtils::expected_integer(1),
            ),
            (
                TestUtils::command("SMEMBERS", &["tags"]),
                TestUtils::expected_bulk_string_array(&["bytes", "serde", "tokio"]),
            ),
            (
                TestUtils::command("SISMEMBER", &["tags", "serde"]),
                TestUtils::expected_integer(1),
            ),
            (
                TestUtils::command("SISMEMBER", &["tags", "anyhow"]),
                TestUtils::expected_integer(0),
            ),
            (
                TestUtils::command("SCARD", &["tags"]),
                TestUtils::expected_integer(3),
            ),
            (
                TestUtils::command("SREM", &["tags", "tokio", "serde", "bytes", "nope"]),
                TestUtils::expected_integer(3),
            ),
            (
                TestUtils::command("TYPE", &["tags"]),
                TestUtils::expected_simple_string("none"),
            ),
            (
                TestUtils::command("SMEMBERS", &["tags"]),
                TestUtils::expected_bulk_string_array(&[]),
            ),
        ],
    )
    .await;
}

#[tokio::test]
async fn test_handle_sorted_set_commands() {
    let env = TestEnv::new();
    let client = env.connect().await;

    env.exec_commands(
        &client,
        vec![
            (
                TestUtils::command("ZADD", &["board", "10", "ada", "30", "grace", "20", "linus"]),
                TestUtils::expected_integer(3),
            ),
            (
                TestUtils::command("ZADD", &["board", "5", "ada"]),
                TestUtils::expected_integer(0),
            ),
            (
                TestUtils::command("ZRANGE", &["board", "0", "-1"]),
                TestUtils::expected_bulk_string_array(&["ada", "linus", "grace"]),
            ),
            (
                TestUtils::command("ZREVRANGE", &["board", "0", "1", "WITHSCORES"]),
                TestUtils::expected_bulk_string_array(&["grace", "30", "linus", "20"]),
            ),
            (
                TestUtils::command("ZSCORE", &["board", "ada"]),
                TestUtils::expected_bulk_string("5"),
            ),
            (
                TestUtils::command("ZINCRBY", &["board", "2.5", "ada"]),
                TestUtils::expected_bulk_string("7.5"),
            ),
            (
                TestUtils::command("ZRANK", &["board", "grace"]),
                TestUtils::expected_integer(2),
            ),
            (
                TestUtils::command("ZRANK", &["board", "nobody"]),
                TestUtils::expected_null(),
            ),
            (
                TestUtils::command("ZCARD", &["board"]),
                TestUtils::expected_integer(3),
            ),
            (
                TestUtils::command("ZREM", &["board", "ada", "nobody"]),
                TestUtils::expected_integer(1),
            ),
            (
                TestUtils::command("ZRANGE", &["board", "0", "-1", "WITHSCORES"]),
                TestUtils::expected_bulk_string_array(&["linus", "20", "grace", "30"]),
            ),
        ],
    )
    .await;
}

#[tokio::test]
async fn test_handle_sorted_set_command_errors() {
    let env = TestEnv::new();
    let client = env.connect().await;

    let test_cases = vec![
        (
            TestUtils::command("ZADD", &["board", "10", "ada", "20"]),
            "ERR syntax error",
        ),
        (
            TestUtils::command("ZADD", &["board", "ten", "ada"]),
            "ERR value is not a valid float",
        ),
        (
            TestUtils::command("ZINCRBY", &["board", "nan", "ada"]),
            "ERR value is not a valid float",
        ),
        (
            TestUtils::command("ZRANGE", &["board", "0", "-1", "WITHCOLORS"]),
            "ERR syntax error",
        ),
    ];

    for (command, expected_error) in test_cases {
        env.exec_command_err(&client, command, expected_error).await;
    }

    env.exec_command_ok(
        &client,
        TestUtils::command("EXISTS", &["board"]),
        &TestUtils::expected_integer(0),
    )
    .await;
}

#[tokio::test]
async fn test_handle_hash_commands() {
    let env = TestEnv::new();
    let client = env.connect().await;

    env.exec_commands(
        &client,
        vec![
            (
                TestUtils::command("HSET", &["user:1", "name", "ada", "lang", "rust"]),
                TestUtils::expected_integer(2),
            ),
            (
                TestUtils::command("HSET", &["user:1", "name", "grace"]),
                TestUtils::expected_integer(0),
            ),
            (
                TestUtils::command("HGET", &["user:1", "name"]),
                TestUtils::expected_bulk_string("grace"),
            ),
            (
                TestUtils::command("HGET", &["user:1", "email"]),
                TestUtils::expected_null(),
            ),
            (
                TestUtils::command("HGETALL", &["user:1"]),
                TestUtils::expected_bulk_string_array(&["lang", "rust", "name", "grace"]),
            ),
            (
                TestUtils::command("HEXISTS", &["user:1", "lang"]),
                TestUtils::expected_integer(1),
            ),
            (
                TestUtils::command("HINCRBY", &["user:1", "visits", "3"]),
                TestUtils::expected_integer(3),
            ),
            (
                TestUtils::command("HLEN", &["user:1"]),
                TestUtils::expected_integer(3),
            ),
            (
                TestUtils::command("HDEL", &["user:1", "lang", "name", "visits"]),
                TestUtils::expected_integer(3),
            ),
            (
                TestUtils::command("EXISTS", &["user:1"]),
                TestUtils::expected_integer(0),
            ),
        ],
    )
    .await;
}

#[tokio::test]
async fn test_handle_hash_command_errors() {
    let env = TestEnv::new();
    let client = env.connect().await;

    env.exec_command_ok(
        &client,
        TestUtils::command("HSET", &["user:1", "name", "ada"]),
        &TestUtils::expected_integer(1),
    )
    .await;

    let test_cases = vec![
        (
            TestUtils::command("HSET", &["user:1", "name"]),
            "ERR wrong number of arguments for 'HSET' command",
        ),
        (
            TestUtils::command("HINCRBY", &["user:1", "name", "1"]),
            "ERR hash value is not an integer",
        ),
        (
            TestUtils::command("SADD", &["user:1", "x"]),
            "WRONGTYPE Operation against a key holding the wrong kind of value",
        ),
    ];

    for (command, expected_error) in test_cases {
        env.exec_command_err(&client, command, expected_error).await;
    }
}
