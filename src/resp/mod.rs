mod decode;
mod encode;

use super::{RedisError, RedisResult};
use bytes::Bytes;
use std::fmt;

pub use decode::Limits;

const TERM: &[u8] = b"\r\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resp {
    /// SimpleString
    SS(String),
    /// SimpleError
    SE(String),
    /// Integer
    Int(i64),
    /// BulkString, `None` is the null bulk string
    BS(Option<Bytes>),
    /// Array, `None` is the null array
    A(Option<Vec<Resp>>),
}

/// The leading byte of every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Tag {
    SimpleString = b'+',
    Error = b'-',
    Integer = b':',
    BulkString = b'$',
    Array = b'*',
}

impl TryFrom<u8> for Tag {
    type Error = RedisError;

    fn try_from(byte: u8) -> RedisResult<Self> {
        match byte {
            b'+' => Ok(Tag::SimpleString),
            b'-' => Ok(Tag::Error),
            b':' => Ok(Tag::Integer),
            b'$' => Ok(Tag::BulkString),
            b'*' => Ok(Tag::Array),
            _ => Err(RedisError::UnknownType(byte)),
        }
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> Self {
        tag as u8
    }
}

impl Resp {
    pub fn simple(val: impl Into<String>) -> Self {
        Self::SS(val.into())
    }

    pub fn error(val: impl Into<String>) -> Self {
        Self::SE(val.into())
    }

    pub fn int(val: i64) -> Self {
        Self::Int(val)
    }

    pub fn bulk(val: impl Into<Bytes>) -> Self {
        Self::BS(Some(val.into()))
    }

    pub fn null_bulk() -> Self {
        Self::BS(None)
    }

    pub fn array(els: Vec<Resp>) -> Self {
        Self::A(Some(els))
    }

    pub fn null_array() -> Self {
        Self::A(None)
    }

    pub fn tag(&self) -> Tag {
        match self {
            Self::SS(_) => Tag::SimpleString,
            Self::SE(_) => Tag::Error,
            Self::Int(_) => Tag::Integer,
            Self::BS(_) => Tag::BulkString,
            Self::A(_) => Tag::Array,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::BS(None) | Self::A(None))
    }
}

impl fmt::Display for Resp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SS(val) => write!(f, "{val}"),
            Self::SE(val) => write!(f, "(error) {val}"),
            Self::Int(val) => write!(f, "{val}"),
            Self::BS(Some(val)) => write!(f, "{}", String::from_utf8_lossy(val)),
            Self::BS(None) | Self::A(None) => write!(f, "(nil)"),
            Self::A(Some(els)) => {
                let els = els
                    .iter()
                    .map(|el| format!("{el}"))
                    .collect::<Vec<String>>()
                    .join(", ");
                write!(f, "[{els}]")
            }
        }
    }
}

impl From<Vec<String>> for Resp {
    fn from(args: Vec<String>) -> Self {
        Self::array(args.into_iter().map(Self::bulk).collect())
    }
}
