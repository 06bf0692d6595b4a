use std::{ffi::OsString, future::Future, net::IpAddr};

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::{
    connection::handle_client_connection,
    engine::{DEFAULT_SUBSCRIBER_BUFFER, Engine, EngineConfig},
};

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "redis-engine", version, about = "In-memory data store speaking RESP")]
pub struct ServerConfig {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1")]
    pub bind: IpAddr,

    /// Port to listen on. Use 0 for an ephemeral port.
    #[arg(long, default_value_t = 6379)]
    pub port: u16,

    /// Messages buffered per subscribed connection before deliveries to it
    /// are dropped.
    #[arg(long, default_value_t = DEFAULT_SUBSCRIBER_BUFFER)]
    pub subscriber_buffer: usize,

    /// Default tracing filter when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl ServerConfig {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            subscriber_buffer: self.subscriber_buffer,
        }
    }
}

#[derive(Debug)]
pub struct RedisServer {
    config: ServerConfig,
    engine: Engine,
}

impl RedisServer {
    /// Builds a server from command line arguments (program name first).
    pub fn new<I, T>(command_line_args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let config = ServerConfig::try_parse_from(command_line_args)?;
        Ok(Self::from_config(config))
    }

    pub fn from_config(config: ServerConfig) -> Self {
        let engine = Engine::new(config.engine_config());
        Self { config, engine }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Handle to the engine behind this server, for in-process clients.
    pub fn engine(&self) -> Engine {
        self.engine.clone()
    }

    pub async fn bind(&self) -> Result<TcpListener> {
        let address = (self.config.bind, self.config.port);

        TcpListener::bind(address)
            .await
            .with_context(|| format!("failed to bind {}:{}", self.config.bind, self.config.port))
    }

    /// Binds the configured address and serves until ctrl-c.
    pub async fn run(self) -> Result<()> {
        let listener = self.bind().await?;

        self.run_until(listener, async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!(error = ?err, "failed to install ctrl-c handler");
            }
        })
        .await
    }

    /// Accepts connections on `listener` until `shutdown` resolves. Each
    /// connection gets its own task; command execution is serialized by the
    /// engine.
    pub async fn run_until<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send,
    {
        info!(address = %listener.local_addr()?, "listening");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("server shutting down");
                    break;
                }
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let engine = self.engine.clone();
                        tokio::spawn(handle_client_connection(stream, peer.to_string(), engine));
                    }
                    Err(err) => warn!(error = ?err, "failed to accept connection"),
                },
            }
        }

        Ok(())
    }
}
