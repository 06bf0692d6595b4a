use anyhow::Result;
use redis_engine::{logging::init_tracing, server::RedisServer};

#[tokio::main]
async fn main() -> Result<()> {
    let server = match RedisServer::new(std::env::args_os()) {
        Ok(server) => server,
        Err(err) => err.exit(),
    };

    init_tracing(&server.config().log_level);

    server.run().await
}
