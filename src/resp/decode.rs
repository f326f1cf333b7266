use super::{Resp, Tag, TERM};
use crate::{utils, RedisError, RedisResult};
use bytes::Bytes;
use std::future::Future;
use std::io::BufRead;
use std::pin::Pin;
use tokio::io::AsyncBufRead;

// Upper bound on elements reserved up front for an array, whatever its declared count.
const MAX_PREALLOC: usize = 1024;

/// Bounds applied while decoding input from an untrusted peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of nested array levels.
    pub max_depth: usize,
    /// Maximum declared length of a bulk string.
    pub max_bulk_len: usize,
    /// Maximum length of a header or simple string line, excluding the tag and CRLF.
    pub max_line_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: 512,
            max_bulk_len: 512 * 1024 * 1024,
            max_line_len: 64 * 1024,
        }
    }
}

/// What the tag and first line of a frame say about the rest of it.
#[derive(Debug, PartialEq)]
enum Header {
    Done(Resp),
    Bulk(usize),
    Array(usize),
}

impl Header {
    fn new(tag: Tag, line: &[u8], limits: &Limits) -> RedisResult<Self> {
        if matches!(tag, Tag::SimpleString | Tag::Error) && line.contains(&b'\r') {
            return Err(RedisError::UnterminatedLine);
        }

        let header = match tag {
            Tag::SimpleString => Self::Done(Resp::SS(utils::stringify(line)?.into())),
            Tag::Error => Self::Done(Resp::SE(utils::stringify(line)?.into())),
            Tag::Integer => Self::Done(Resp::Int(utils::parse_int(line)?)),
            Tag::BulkString => match utils::parse_len(line)? {
                None => Self::Done(Resp::BS(None)),
                Some(len) if len > limits.max_bulk_len => {
                    return Err(RedisError::TooLarge {
                        len,
                        max: limits.max_bulk_len,
                    });
                }
                Some(len) => Self::Bulk(len),
            },
            Tag::Array => match utils::parse_len(line)? {
                None => Self::Done(Resp::A(None)),
                Some(count) => Self::Array(count),
            },
        };
        Ok(header)
    }
}

/// Checks a line read up to and including `\n` and strips its CRLF.
fn strip_term<'a>(line: &'a [u8], limits: &Limits) -> RedisResult<&'a [u8]> {
    match line.strip_suffix(b"\n") {
        Some(rest) => rest
            .strip_suffix(b"\r")
            .ok_or(RedisError::UnterminatedLine),
        None if line.len() > limits.max_line_len.saturating_add(1) => {
            Err(RedisError::LineTooLong(limits.max_line_len))
        }
        None => Err(RedisError::UnexpectedEof),
    }
}

fn line_limit(limits: &Limits) -> u64 {
    u64::try_from(limits.max_line_len.saturating_add(TERM.len())).unwrap_or(u64::MAX)
}

fn check_depth(depth: usize, limits: &Limits) -> RedisResult<()> {
    if depth >= limits.max_depth {
        return Err(RedisError::TooDeep(limits.max_depth));
    }
    Ok(())
}

fn check_body(body: Vec<u8>, len: usize, term: [u8; 2]) -> RedisResult<Resp> {
    if body.len() < len {
        return Err(RedisError::UnexpectedEof);
    }
    if term != TERM {
        return Err(RedisError::MalformedTerminator);
    }
    Ok(Resp::BS(Some(Bytes::from(body))))
}

impl Resp {
    /// Reads exactly one frame from `reader`, blocking until it is complete.
    ///
    /// The reader is left positioned right after the frame, so calling this
    /// repeatedly yields back-to-back messages.
    pub fn decode<R: BufRead>(reader: &mut R) -> RedisResult<Self> {
        Self::decode_with(reader, &Limits::default())
    }

    pub fn decode_with<R: BufRead>(reader: &mut R, limits: &Limits) -> RedisResult<Self> {
        read_frame(reader, limits, 0)
    }

    /// Same as [`Resp::decode`], suspending instead of blocking.
    pub async fn decode_async<R>(reader: &mut R) -> RedisResult<Self>
    where
        R: AsyncBufRead + Unpin + Send,
    {
        Self::decode_async_with(reader, &Limits::default()).await
    }

    pub async fn decode_async_with<R>(reader: &mut R, limits: &Limits) -> RedisResult<Self>
    where
        R: AsyncBufRead + Unpin + Send,
    {
        read_frame_async(reader, *limits, 0).await
    }
}

fn read_frame<R: BufRead>(reader: &mut R, limits: &Limits, depth: usize) -> RedisResult<Resp> {
    use std::io::Read;

    let mut tag = [0; 1];
    reader.read_exact(&mut tag)?;
    let tag = Tag::try_from(tag[0])?;

    let mut line = vec![];
    reader
        .by_ref()
        .take(line_limit(limits))
        .read_until(b'\n', &mut line)?;

    match Header::new(tag, strip_term(&line, limits)?, limits)? {
        Header::Done(resp) => Ok(resp),
        Header::Bulk(len) => {
            let mut body = Vec::new();
            reader.by_ref().take(len as u64).read_to_end(&mut body)?;
            let mut term = [0; 2];
            if body.len() == len {
                reader.read_exact(&mut term)?;
            }
            check_body(body, len, term)
        }
        Header::Array(count) => {
            check_depth(depth, limits)?;
            let mut elements = Vec::with_capacity(count.min(MAX_PREALLOC));
            for _ in 0..count {
                elements.push(read_frame(reader, limits, depth + 1)?);
            }
            Ok(Resp::A(Some(elements)))
        }
    }
}

type FrameFuture<'a> = Pin<Box<dyn Future<Output = RedisResult<Resp>> + Send + 'a>>;

fn read_frame_async<R>(reader: &mut R, limits: Limits, depth: usize) -> FrameFuture<'_>
where
    R: AsyncBufRead + Unpin + Send,
{
    use tokio::io::{AsyncBufReadExt, AsyncReadExt};

    Box::pin(async move {
        let tag = Tag::try_from(reader.read_u8().await?)?;

        let mut line = vec![];
        (&mut *reader)
            .take(line_limit(&limits))
            .read_until(b'\n', &mut line)
            .await?;

        match Header::new(tag, strip_term(&line, &limits)?, &limits)? {
            Header::Done(resp) => Ok(resp),
            Header::Bulk(len) => {
                let mut body = Vec::new();
                (&mut *reader)
                    .take(len as u64)
                    .read_to_end(&mut body)
                    .await?;
                let mut term = [0; 2];
                if body.len() == len {
                    reader.read_exact(&mut term).await?;
                }
                check_body(body, len, term)
            }
            Header::Array(count) => {
                check_depth(depth, &limits)?;
                let mut elements = Vec::with_capacity(count.min(MAX_PREALLOC));
                for _ in 0..count {
                    elements.push(read_frame_async(reader, limits, depth + 1).await?);
                }
                Ok(Resp::A(Some(elements)))
            }
        }
    })
}
