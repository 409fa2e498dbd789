//! 日志初始化与敏感信息脱敏
//!
//! Access tokens and client secrets must only reach log output through
//! [`Redacted`].

use crate::config::LoggingConfig;
use std::fmt;
use tracing_subscriber::{fmt as subscriber_fmt, prelude::*, EnvFilter};

/// Initialize tracing/logging
///
/// `RUST_LOG` takes precedence over `logging.level`. Output goes to stderr so
/// tables printed on stdout stay clean. Can only be called once.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(filter);

    if config.format == "json" {
        registry
            .with(subscriber_fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                subscriber_fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// 脱敏后的凭据表示
///
/// 只显示前 6 个字符，其余替换为 `***`
#[derive(Clone, Copy, Debug)]
pub struct Redacted<'a> {
    inner: &'a str,
}

impl<'a> Redacted<'a> {
    pub fn new(secret: &'a str) -> Self {
        Self { inner: secret }
    }
}

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const VISIBLE: usize = 6;
        // 太短的值全部脱敏
        if self.inner.len() <= VISIBLE * 2 || !self.inner.is_char_boundary(VISIBLE) {
            write!(f, "***")
        } else {
            write!(f, "{}***", &self.inner[..VISIBLE])
        }
    }
}

/// Owned masked copy, for values that are serialized rather than logged
pub fn mask_secret(secret: &str) -> String {
    Redacted::new(secret).to_string()
}
