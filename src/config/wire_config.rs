// src/config/wire_config.rs

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// 有默认值的字段（`test`、`at`、`cur`、`source.fd`）是否写到线上
///
/// 部分交易所要求显式写出默认值，部分交易所自行推断。
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DefaultsPolicy {
    #[default]
    Emit,
    Omit,
}

/// 编码配置
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct WireConfig {
    pub defaults: DefaultsPolicy,
    /// 是否输出带缩进的 JSON
    pub pretty: bool,
}

impl WireConfig {
    pub fn new(defaults: DefaultsPolicy, pretty: bool) -> Self {
        Self { defaults, pretty }
    }

    pub fn omit_defaults() -> Self {
        Self::new(DefaultsPolicy::Omit, false)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::config(e.to_string(), e))
    }

    /// 从 JSON 文件读取配置，缺失的字段使用默认值
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e), e))?;
        Self::from_json(&content)
    }
}
