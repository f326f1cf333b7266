//! A RESP (REdis Serialization Protocol) codec, plus a small PING/ECHO server
//! built on top of it.

mod cmd;
mod config;
mod connection;
mod error;
mod resp;
mod server;
mod utils;

pub use cmd::Command;
pub use config::Config;
pub use error::RedisError;
pub use resp::{Limits, Resp, Tag};
pub use server::Server;
pub type RedisResult<T> = Result<T, RedisError>;

/// Encodes `resp` into its canonical RESP bytes.
pub fn encode(resp: &Resp) -> RedisResult<Vec<u8>> {
    resp.encode()
}

/// Reads one complete message from `reader`.
pub fn decode<R: std::io::BufRead>(reader: &mut R) -> RedisResult<Resp> {
    Resp::decode(reader)
}
