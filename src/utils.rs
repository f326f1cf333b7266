use super::{RedisError, RedisResult};

pub(crate) fn stringify(buf: &[u8]) -> RedisResult<&str> {
    std::str::from_utf8(buf).map_err(RedisError::from)
}

/// Strict signed decimal: an optional `-` followed by one or more ASCII digits.
pub(crate) fn parse_decimal(buf: &[u8]) -> Option<i64> {
    let digits = buf.strip_prefix(b"-").unwrap_or(buf);
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(buf).ok()?.parse().ok()
}

pub(crate) fn parse_int(buf: &[u8]) -> RedisResult<i64> {
    parse_decimal(buf).ok_or_else(|| RedisError::MalformedInteger(lossy(buf)))
}

/// Length of a bulk string or array; `None` for the `-1` sentinel.
pub(crate) fn parse_len(buf: &[u8]) -> RedisResult<Option<usize>> {
    match parse_decimal(buf) {
        Some(-1) => Ok(None),
        Some(n) => usize::try_from(n)
            .map(Some)
            .map_err(|_| RedisError::MalformedLength(lossy(buf))),
        None => Err(RedisError::MalformedLength(lossy(buf))),
    }
}

fn lossy(buf: &[u8]) -> String {
    String::from_utf8_lossy(buf).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_parses_decimal() {
        assert_eq!(parse_decimal(b"0"), Some(0));
        assert_eq!(parse_decimal(b"123"), Some(123));
        assert_eq!(parse_decimal(b"-123"), Some(-123));
        assert_eq!(parse_decimal(b"-9223372036854775808"), Some(i64::MIN));
        assert_eq!(parse_decimal(b""), None);
        assert_eq!(parse_decimal(b"-"), None);
        assert_eq!(parse_decimal(b"+1"), None);
        assert_eq!(parse_decimal(b" 1"), None);
        assert_eq!(parse_decimal(b"1a"), None);
        assert_eq!(parse_decimal(b"99999999999999999999"), None);
    }

    #[test]
    fn it_parses_len() {
        assert_eq!(parse_len(b"-1").unwrap(), None);
        assert_eq!(parse_len(b"0").unwrap(), Some(0));
        assert_eq!(parse_len(b"11").unwrap(), Some(11));
        assert!(matches!(
            parse_len(b"-2"),
            Err(RedisError::MalformedLength(v)) if v == "-2"
        ));
        assert!(matches!(
            parse_len(b"abc"),
            Err(RedisError::MalformedLength(v)) if v == "abc"
        ));
    }

    #[test]
    fn it_parses_int() {
        assert_eq!(parse_int(b"-123").unwrap(), -123);
        assert!(matches!(parse_int(b"12x"), Err(RedisError::MalformedInteger(_))));
    }
}
