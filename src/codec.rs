// src/codec.rs

use serde_json::{Map, Value};
use tracing::debug;

use crate::config::{DefaultsPolicy, WireConfig};
use crate::error::{Error, Result};
use crate::openrtb::request::{BidRequest, DEFAULT_AT, DEFAULT_CUR, DEFAULT_TEST};

const REQUIRED_FIELDS: [&str; 2] = ["id", "tmax"];

/// 按 [`WireConfig`] 把 BidRequest 编码为 JSON
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    config: WireConfig,
}

impl Encoder {
    pub fn new(config: WireConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WireConfig {
        &self.config
    }

    pub fn to_value(&self, request: &BidRequest) -> Result<Value> {
        let mut value = serde_json::to_value(request).map_err(Error::Encode)?;
        if self.config.defaults == DefaultsPolicy::Omit {
            if let Some(map) = value.as_object_mut() {
                strip_defaults(map);
            }
        }
        Ok(value)
    }

    pub fn to_string(&self, request: &BidRequest) -> Result<String> {
        let value = self.to_value(request)?;
        let text = if self.config.pretty {
            serde_json::to_string_pretty(&value)
        } else {
            serde_json::to_string(&value)
        }
        .map_err(Error::Encode)?;
        debug!(request_id = %request.id(), bytes = text.len(), "encoded bid request");
        Ok(text)
    }

    pub fn to_vec(&self, request: &BidRequest) -> Result<Vec<u8>> {
        self.to_string(request).map(String::into_bytes)
    }
}

/// 删除等于 OpenRTB 默认值的字段，解码时会被还原
fn strip_defaults(map: &mut Map<String, Value>) {
    remove_if(map, "test", |v| v.as_i64() == Some(i64::from(DEFAULT_TEST)));
    remove_if(map, "at", |v| v.as_i64() == Some(i64::from(DEFAULT_AT)));
    remove_if(map, "cur", |v| {
        matches!(v.as_array().map(Vec::as_slice), Some([only]) if only.as_str() == Some(DEFAULT_CUR))
    });
    if let Some(source) = map.get_mut("source").and_then(Value::as_object_mut) {
        remove_if(source, "fd", |v| v.as_i64() == Some(0));
    }
}

fn remove_if(map: &mut Map<String, Value>, key: &str, is_default: impl Fn(&Value) -> bool) {
    if map.get(key).is_some_and(is_default) {
        map.remove(key);
    }
}

pub fn encode(request: &BidRequest, config: &WireConfig) -> Result<String> {
    Encoder::new(config.clone()).to_string(request)
}

pub fn decode_str(input: &str) -> Result<BidRequest> {
    let value: Value =
        serde_json::from_str(input).map_err(|e| Error::malformed(e.to_string(), e))?;
    from_value(value)
}

pub fn decode_slice(input: &[u8]) -> Result<BidRequest> {
    let value: Value =
        serde_json::from_slice(input).map_err(|e| Error::malformed(e.to_string(), e))?;
    from_value(value)
}

/// simd-json 解析路径，会就地改写 `input`
pub fn decode_simd(input: &mut [u8]) -> Result<BidRequest> {
    let value: Value =
        simd_json::serde::from_slice(input).map_err(|e| Error::malformed(e.to_string(), e))?;
    from_value(value)
}

/// 先检查必填字段，再做强类型转换；失败时不返回部分对象
pub fn from_value(value: Value) -> Result<BidRequest> {
    let map = value
        .as_object()
        .ok_or_else(|| Error::malformed_shape("bid request must be a JSON object"))?;
    for field in REQUIRED_FIELDS {
        if map.get(field).map_or(true, Value::is_null) {
            return Err(Error::MissingRequiredField { field });
        }
    }

    let request: BidRequest =
        serde_json::from_value(value).map_err(|e| Error::malformed(e.to_string(), e))?;
    if request.id().is_empty() {
        return Err(Error::MissingRequiredField { field: "id" });
    }
    debug!(request_id = %request.id(), tmax = request.tmax(), "decoded bid request");
    Ok(request)
}

impl BidRequest {
    pub fn from_json(input: &str) -> Result<Self> {
        decode_str(input)
    }

    /// 默认配置编码（写出默认值）
    pub fn to_json(&self) -> Result<String> {
        Encoder::default().to_string(self)
    }
}
