use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// 交易所自定义扩展字段（`ext`），原样透传，不做任何解释
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct Ext(Value);

impl Default for Ext {
    fn default() -> Self {
        Ext(Value::Object(Map::new()))
    }
}

impl Ext {
    pub fn new(value: Value) -> Self {
        Ext(value)
    }

    /// 把一个强类型结构编码成 ext
    pub fn from_typed<T: Serialize>(value: &T) -> Result<Self> {
        serde_json::to_value(value).map(Ext).map_err(Error::Encode)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// 写入一个键值；当前值不是 JSON 对象时先替换为空对象
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }
        self.0
            .as_object_mut()
            .and_then(|map| map.insert(key.into(), value.into()))
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.as_object_mut().and_then(|map| map.remove(key))
    }

    /// 按调用方给定的结构解析 ext，结构不匹配时返回 `MalformedWireInput`
    pub fn typed<T: DeserializeOwned>(&self) -> Result<T> {
        T::deserialize(&self.0).map_err(|e| Error::malformed(format!("ext: {}", e), e))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for Ext {
    fn from(value: Value) -> Self {
        Ext(value)
    }
}

/// `ext` 字段的解码：键存在即为 `Some`，包括 `"ext": null`；
/// 键缺失由字段上的 `#[serde(default)]` 得到 `None`
pub(crate) fn deserialize_present<'de, D>(deserializer: D) -> std::result::Result<Option<Ext>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|value| Some(Ext(value)))
}
