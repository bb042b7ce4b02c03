// src/error.rs

use thiserror::Error;

use crate::validation::Violation;

/// crate 统一的错误类型
#[derive(Debug, Error)]
pub enum Error {
    /// 构造或解码时缺少必填字段（`id` / `tmax`）
    #[error("missing required field `{field}`")]
    MissingRequiredField { field: &'static str },

    /// 输入 JSON 语法错误或字段类型不匹配，不返回部分解析的对象
    #[error("malformed wire input: {reason}")]
    MalformedWireInput {
        reason: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("failed to encode bid request: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("invalid wire configuration: {reason}")]
    Config {
        reason: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("failed to install tracing subscriber: {0}")]
    Logging(String),

    /// 严格校验模式下，软约束被当作错误返回
    #[error("{} soft constraint violation(s): {}", .0.len(), join_violations(.0))]
    SoftConstraintViolation(Vec<Violation>),
}

pub type Result<T> = std::result::Result<T, Error>;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

impl Error {
    /// 解析失败，保留底层错误作为 source
    pub fn malformed(reason: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Error::MalformedWireInput {
            reason: reason.into(),
            source: Some(source.into()),
        }
    }

    /// 结构性错误，没有底层错误
    pub fn malformed_shape(reason: impl Into<String>) -> Self {
        Error::MalformedWireInput {
            reason: reason.into(),
            source: None,
        }
    }

    pub fn config(reason: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Error::Config {
            reason: reason.into(),
            source: Some(source.into()),
        }
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn malformed_keeps_underlying_error() {
        let cause = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let text = cause.to_string();
        let err = Error::malformed(text.clone(), cause);
        assert_eq!(err.to_string(), format!("malformed wire input: {}", text));
        let source = err.source().unwrap();
        assert!(source.downcast_ref::<serde_json::Error>().is_some());
    }

    #[test]
    fn shape_errors_have_no_source() {
        let err = Error::malformed_shape("bid request must be a JSON object");
        assert!(err.source().is_none());
    }

    #[test]
    fn config_keeps_io_error() {
        let cause = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Error::config("wire.json: gone", cause);
        assert_eq!(err.to_string(), "invalid wire configuration: wire.json: gone");
        let source = err.source().unwrap();
        assert_eq!(
            source.downcast_ref::<std::io::Error>().map(std::io::Error::kind),
            Some(std::io::ErrorKind::NotFound)
        );
    }
}
