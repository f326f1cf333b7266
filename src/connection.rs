use super::{Command, Limits, RedisResult, Resp};
use std::net::SocketAddr;
use tokio::io::{AsyncWriteExt, BufReader, BufWriter};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tracing::{debug, warn};

#[derive(Debug)]
pub(crate) struct Connection {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
    peer: SocketAddr,
    limits: Limits,
}

impl Connection {
    pub(crate) fn new(stream: TcpStream, peer: SocketAddr, limits: Limits) -> Self {
        let (reader, writer) = stream.into_split();
        Self {
            reader: BufReader::new(reader),
            writer: BufWriter::new(writer),
            peer,
            limits,
        }
    }

    /// Serves requests until the peer disconnects or sends something undecodable.
    pub(crate) async fn start_streaming(mut self) -> RedisResult<()> {
        loop {
            let request = match Resp::decode_async_with(&mut self.reader, &self.limits).await {
                Ok(request) => request,
                Err(err) if err.is_eof() => {
                    debug!(peer = %self.peer, "client disconnected");
                    return Ok(());
                }
                Err(err) if err.is_protocol() => {
                    // No way to resynchronize with the peer, so report and hang up.
                    warn!(peer = %self.peer, error = %err, "closing connection");
                    return self.send(Resp::from(err)).await;
                }
                Err(err) => return Err(err),
            };

            debug!(peer = %self.peer, %request, "received request");

            let reply = Command::new(request)
                .map(Command::run)
                .unwrap_or_else(Resp::from);
            self.send(reply).await?;
        }
    }

    async fn send(&mut self, resp: Resp) -> RedisResult<()> {
        let bytes = resp.encode()?;
        self.writer.write_all(&bytes).await?;
        self.writer.flush().await?;
        Ok(())
    }
}
