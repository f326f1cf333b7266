use super::{RedisError, RedisResult, Resp};
use bytes::Bytes;

#[derive(Debug, PartialEq)]
pub enum Command {
    Ping(Option<Bytes>),
    Echo(Bytes),
}

impl Command {
    /// Requests arrive as an array of bulk strings, the first naming the command.
    pub fn new(resp: Resp) -> RedisResult<Self> {
        let args = command_args(resp)?;
        Self::from_args(args)
    }

    pub fn run(self) -> Resp {
        match self {
            Self::Ping(None) => Resp::simple("PONG"),
            Self::Ping(Some(val)) => Resp::bulk(val),
            Self::Echo(val) => Resp::bulk(val),
        }
    }

    fn from_args(args: Vec<Bytes>) -> RedisResult<Self> {
        let mut args = args.into_iter();
        let name = args.next().ok_or(RedisError::NotACommand)?;
        let rest: Vec<Bytes> = args.collect();

        let cmd = match String::from_utf8_lossy(&name).to_uppercase().as_str() {
            "PING" if rest.is_empty() => Self::Ping(None),
            "PING" => Self::Ping(Some(exactly_one("ping", rest)?)),
            "ECHO" => Self::Echo(exactly_one("echo", rest)?),
            other => return Err(RedisError::UnknownCommand(other.to_lowercase())),
        };

        Ok(cmd)
    }
}

fn exactly_one(cmd: &'static str, args: Vec<Bytes>) -> RedisResult<Bytes> {
    let got = args.len();
    let [arg]: [Bytes; 1] = args
        .try_into()
        .map_err(|_| RedisError::LackOfArgs { cmd, need: 1, got })?;
    Ok(arg)
}

fn command_args(message: Resp) -> RedisResult<Vec<Bytes>> {
    match message {
        Resp::A(Some(args)) => args
            .into_iter()
            .map(|el| match el {
                Resp::BS(Some(arg)) => Ok(arg),
                _ => Err(RedisError::NotACommand),
            })
            .collect(),
        _ => Err(RedisError::NotACommand),
    }
}
