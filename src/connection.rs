use bytes::BytesMut;
use tokio::{
    io::{AsyncWrite, AsyncWriteExt},
    net::TcpStream,
};
use tracing::{debug, error, info, warn};

use crate::{
    commands::{Command, DispatchOutcome},
    engine::Engine,
    input::{CommandReadError, read_and_parse_resp},
    resp::RespValue,
};

/// Serves one client until it disconnects, sends QUIT, or corrupts the
/// framing.
///
/// Replies to pipelined commands are written in submission order. Messages
/// delivered by the broker are forwarded between replies as `message` push
/// frames.
pub async fn handle_client_connection(stream: TcpStream, client_address: String, engine: Engine) {
    let (id, mut deliveries) = engine.connect().await;
    info!(connection = %id, client = %client_address, "client connected");

    let (mut reader, mut writer) = stream.into_split();
    let mut buffer = BytesMut::with_capacity(4096);

    loop {
        tokio::select! {
            read = read_and_parse_resp(&mut reader, &mut buffer) => {
                let frames = match read {
                    Ok(frames) => frames,
                    Err(CommandReadError::ConnectionClosed) => break,
                    Err(e @ CommandReadError::RespParseError(_)) => {
                        warn!(
                            connection = %id,
                            error = %e,
                            "closing connection after protocol error"
                        );
                        let _ = write_frames(&mut writer, vec![e.to_resp()]).await;
                        break;
                    }
                    Err(e) => {
                        error!(connection = %id, error = %e, "error reading from client");
                        break;
                    }
                };

                let mut replies = Vec::with_capacity(frames.len());
                let mut close = false;

                for frame in frames {
                    let outcome = match Command::from_resp(frame) {
                        Ok(command) => engine.dispatch(id, command).await,
                        Err(e) => engine.reject(id, e).await,
                    };

                    close = matches!(outcome, DispatchOutcome::Close(_));
                    replies.extend(outcome.frames());

                    if close {
                        break;
                    }
                }

                if let Err(e) = write_frames(&mut writer, replies).await {
                    error!(connection = %id, error = %e, "error writing to client");
                    break;
                }

                if close {
                    debug!(connection = %id, "client sent QUIT");
                    break;
                }
            }
            Some(message) = deliveries.recv() => {
                if let Err(e) = write_frames(&mut writer, vec![message.to_resp()]).await {
                    error!(connection = %id, error = %e, "error delivering message");
                    break;
                }
            }
        }
    }

    engine.disconnect(id).await;
    info!(connection = %id, client = %client_address, "client disconnected");
}

async fn write_frames<W>(writer: &mut W, frames: Vec<RespValue>) -> tokio::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    if frames.is_empty() {
        return Ok(());
    }

    let encoded: String = frames.iter().map(RespValue::encode).collect();
    writer.write_all(encoded.as_bytes()).await?;
    writer.flush().await?;

    Ok(())
}
