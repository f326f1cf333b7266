use super::Resp;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RedisError {
    #[error("unknown type tag '{}'", tag_char(.0))]
    UnknownType(u8),

    #[error("invalid integer: {0:?}")]
    MalformedInteger(String),

    #[error("invalid length: {0:?}")]
    MalformedLength(String),

    #[error("line is not terminated by CRLF")]
    UnterminatedLine,

    #[error("expected CRLF after bulk string")]
    MalformedTerminator,

    #[error("unexpected end of stream")]
    UnexpectedEof,

    #[error("simple string contains a line terminator")]
    InvalidPayload,

    #[error("nesting deeper than {0} levels")]
    TooDeep(usize),

    #[error("bulk length {len} exceeds limit of {max} bytes")]
    TooLarge { len: usize, max: usize },

    #[error("line longer than {0} bytes")]
    LineTooLong(usize),

    #[error("Failed to parse into string: {0}")]
    ParseString(#[from] std::str::Utf8Error),

    #[error("wrong number of arguments for '{cmd}' command: need {need}, got {got}")]
    LackOfArgs {
        cmd: &'static str,
        need: usize,
        got: usize,
    },

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("expected array of bulk strings")]
    NotACommand,

    #[error("invalid argument {0}")]
    InvalidArg(String),

    #[error("IO error: {0}")]
    Io(std::io::Error),
}

fn tag_char(byte: &u8) -> std::ascii::EscapeDefault {
    std::ascii::escape_default(*byte)
}

impl RedisError {
    /// True when the peer went away rather than sending something invalid.
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::UnexpectedEof)
    }

    /// True for errors caused by bytes that violate the wire format.
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            Self::UnknownType(_)
                | Self::MalformedInteger(_)
                | Self::MalformedLength(_)
                | Self::UnterminatedLine
                | Self::MalformedTerminator
                | Self::TooDeep(_)
                | Self::TooLarge { .. }
                | Self::LineTooLong(_)
                | Self::ParseString(_)
        )
    }
}

impl From<std::io::Error> for RedisError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::UnexpectedEof => Self::UnexpectedEof,
            _ => Self::Io(err),
        }
    }
}

impl From<RedisError> for Resp {
    fn from(error: RedisError) -> Self {
        let msg = if error.is_protocol() {
            format!("ERR Protocol error: {error}")
        } else {
            format!("ERR {error}")
        };
        // Error text may echo peer bytes, which must not break the frame.
        Self::SE(msg.replace(['\r', '\n'], " "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_maps_io_eof_to_unexpected_eof() {
        let err = std::io::Error::from(std::io::ErrorKind::UnexpectedEof);
        let err = RedisError::from(err);
        assert!(err.is_eof());
        assert!(!err.is_protocol());

        let err = std::io::Error::from(std::io::ErrorKind::ConnectionReset);
        let err = RedisError::from(err);
        assert!(matches!(err, RedisError::Io(_)));
    }

    #[test]
    fn it_converts_into_simple_error() {
        let resp = Resp::from(RedisError::UnknownType(b'X'));
        assert_eq!(resp, Resp::SE("ERR Protocol error: unknown type tag 'X'".into()));

        let resp = Resp::from(RedisError::UnknownCommand("foo".into()));
        assert_eq!(resp, Resp::SE("ERR unknown command 'foo'".into()));

        let resp = Resp::from(RedisError::UnknownCommand("a\r\nb".into()));
        assert_eq!(resp, Resp::SE("ERR unknown command 'a  b'".into()));
    }
}
