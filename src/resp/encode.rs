use super::{Resp, TERM};
use crate::{RedisError, RedisResult};
use bytes::{BufMut, BytesMut};

impl Resp {
    pub fn encode(&self) -> RedisResult<Vec<u8>> {
        let mut buf = BytesMut::new();
        self.encode_into(&mut buf)?;
        Ok(buf.to_vec())
    }

    /// Appends the encoded frame to `buf`. On error `buf` is left as it was.
    pub fn encode_into(&self, buf: &mut BytesMut) -> RedisResult<()> {
        self.validate()?;
        self.write(buf);
        Ok(())
    }

    fn validate(&self) -> RedisResult<()> {
        match self {
            Self::SS(val) | Self::SE(val) => {
                if val.bytes().any(|b| b == b'\r' || b == b'\n') {
                    return Err(RedisError::InvalidPayload);
                }
                Ok(())
            }
            Self::A(Some(els)) => els.iter().try_for_each(Self::validate),
            _ => Ok(()),
        }
    }

    fn write(&self, buf: &mut BytesMut) {
        buf.put_u8(self.tag().into());

        match self {
            Self::SS(val) | Self::SE(val) => {
                buf.put_slice(val.as_bytes());
                buf.put_slice(TERM);
            }
            Self::Int(val) => write_line(buf, *val),
            Self::BS(None) | Self::A(None) => write_line(buf, -1),
            Self::BS(Some(val)) => {
                write_line(buf, val.len());
                buf.put_slice(val);
                buf.put_slice(TERM);
            }
            Self::A(Some(els)) => {
                write_line(buf, els.len());
                for el in els {
                    el.write(buf);
                }
            }
        }
    }
}

fn write_line(buf: &mut BytesMut, val: impl std::fmt::Display) {
    buf.put_slice(format!("{val}").as_bytes());
    buf.put_slice(TERM);
}
