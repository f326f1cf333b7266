use super::{connection::Connection, Config, Limits, RedisResult};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

const INITIAL_ACCEPT_DELAY: Duration = Duration::from_millis(10);
const MAX_ACCEPT_DELAY: Duration = Duration::from_secs(1);

/// Delay before the next `accept` after a failure, doubling up to a cap.
fn next_delay(delay: Duration) -> Duration {
    (delay * 2).min(MAX_ACCEPT_DELAY)
}

#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    limits: Limits,
}

impl Server {
    pub async fn bind(config: &Config) -> RedisResult<Self> {
        let listener = TcpListener::bind(config.addr()?).await?;
        Ok(Self {
            listener,
            limits: config.limits,
        })
    }

    pub fn local_addr(&self) -> RedisResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections forever, serving each one on its own task.
    pub async fn run(self) -> RedisResult<()> {
        info!(addr = %self.local_addr()?, "listening");

        let mut delay = INITIAL_ACCEPT_DELAY;
        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(accepted) => {
                    delay = INITIAL_ACCEPT_DELAY;
                    accepted
                }
                Err(err) => {
                    // Errors like EMFILE persist, so back off instead of spinning.
                    warn!(error = %err, retry_in = ?delay, "failed to accept connection");
                    tokio::time::sleep(delay).await;
                    delay = next_delay(delay);
                    continue;
                }
            };
            info!(%peer, "client connected");

            let conn = Connection::new(stream, peer, self.limits);
            tokio::spawn(async move {
                if let Err(err) = conn.start_streaming().await {
                    error!(%peer, error = %err, "connection failed");
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Resp;
    use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpStream;

    async fn start(config: Config) -> SocketAddr {
        let server = Server::bind(&config).await.unwrap();
        let addr = server.local_addr().unwrap();
        tokio::spawn(server.run());
        addr
    }

    fn config() -> Config {
        Config {
            port: 0,
            ..Config::default()
        }
    }

    #[test]
    fn it_backs_off_exponentially() {
        let mut delay = INITIAL_ACCEPT_DELAY;
        let mut delays = vec![];
        for _ in 0..9 {
            delays.push(delay.as_millis());
            delay = next_delay(delay);
        }
        assert_eq!(delays, [10, 20, 40, 80, 160, 320, 640, 1000, 1000]);
    }

    #[tokio::test]
    async fn it_answers_ping_and_echo() {
        let addr = start(config()).await;
        let stream = TcpStream::connect(addr).await.unwrap();
        let (reader, mut writer) = stream.into_split();
        let mut reader = BufReader::new(reader);

        let requests = [
            (Resp::from(vec!["PING".to_string()]), Resp::simple("PONG")),
            (
                Resp::from(vec!["echo".to_string(), "hello world".to_string()]),
                Resp::bulk("hello world"),
            ),
            (
                Resp::from(vec!["ECHO".to_string()]),
                Resp::error("ERR wrong number of arguments for 'echo' command: need 1, got 0"),
            ),
            (
                Resp::from(vec!["GET".to_string(), "foo".to_string()]),
                Resp::error("ERR unknown command 'get'"),
            ),
        ];

        for (request, expected) in requests {
            writer.write_all(&request.encode().unwrap()).await.unwrap();
            let reply = Resp::decode_async(&mut reader).await.unwrap();
            assert_eq!(reply, expected);
        }
    }

    #[tokio::test]
    async fn it_handles_back_to_back_requests() {
        let addr = start(config()).await;
        let mut stream = TcpStream::connect(addr).await.unwrap();

        stream
            .write_all(b"*1\r\n$4\r\nPING\r\n*2\r\n$4\r\nECHO\r\n$2\r\nhi\r\n")
            .await
            .unwrap();

        let mut reader = BufReader::new(stream);
        assert_eq!(
            Resp::decode_async(&mut reader).await.unwrap(),
            Resp::simple("PONG")
        );
        assert_eq!(
            Resp::decode_async(&mut reader).await.unwrap(),
            Resp::bulk("hi")
        );
    }

    #[tokio::test]
    async fn it_closes_on_protocol_error() {
        let addr = start(config()).await;
        let mut stream = TcpStream::connect(addr).await.unwrap();

        stream.write_all(b"X\r\n").await.unwrap();

        let mut buf = vec![];
        stream.read_to_end(&mut buf).await.unwrap();
        assert_eq!(buf, b"-ERR Protocol error: unknown type tag 'X'\r\n");
    }
}
