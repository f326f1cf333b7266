use super::{Limits, RedisError, RedisResult};
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind: String,
    pub port: u16,
    pub limits: Limits,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: 6379,
            limits: Limits::default(),
            log_level: "info".into(),
        }
    }
}

impl Config {
    pub fn new(args: Vec<String>) -> RedisResult<Self> {
        let default = Self::default();
        let limits = Limits {
            max_depth: parse_arg(&args, "--max-depth")?.unwrap_or(default.limits.max_depth),
            max_bulk_len: parse_arg(&args, "--max-bulk-len")?
                .unwrap_or(default.limits.max_bulk_len),
            max_line_len: parse_arg(&args, "--max-line-len")?
                .unwrap_or(default.limits.max_line_len),
        };

        Ok(Self {
            bind: get_arg(&args, "--bind").unwrap_or(default.bind),
            port: parse_arg(&args, "--port")?.unwrap_or(default.port),
            limits,
            log_level: get_arg(&args, "--log-level").unwrap_or(default.log_level),
        })
    }

    pub fn addr(&self) -> RedisResult<SocketAddr> {
        format!("{}:{}", self.bind, self.port)
            .parse()
            .map_err(|e| invalid_arg("--bind", &self.bind, e))
    }
}

fn get_arg(args: &[String], opt: &str) -> Option<String> {
    args.iter()
        .position(|v| v.as_str() == opt)
        .and_then(|pos| args.get(pos + 1).cloned())
}

fn parse_arg<T>(args: &[String], opt: &str) -> RedisResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_arg(args, opt)
        .map(|v| v.parse().map_err(|e| invalid_arg(opt, &v, e)))
        .transpose()
}

fn invalid_arg(opt: &str, val: &str, err: impl std::fmt::Display) -> RedisError {
    RedisError::InvalidArg(format!("{val:?} for {opt}: {err}"))
}
