use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ext::Ext;

/// 请求上游来源（header bidding wrapper、其它交易所、mediation 平台等）
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Source {
    /// 最终售卖决策方：0 = 交易所，1 = 上游来源
    #[serde(default)]
    pub fd: i32,
    /// 所有参与方共享的交易 ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tid: Option<String>,
    /// TAG Payment ID 协议编码的支付链，不做解析
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pchain: Option<String>,
    #[serde(default, deserialize_with = "crate::openrtb::ext::deserialize_present", skip_serializing_if = "Option::is_none")]
    pub ext: Option<Ext>,
}

impl Source {
    pub fn new(tid: impl Into<String>) -> Self {
        Self {
            tid: Some(tid.into()),
            ..Default::default()
        }
    }

    /// 生成一个新的 UUID v4 作为交易 ID
    pub fn with_generated_tid() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }

    pub fn upstream_decides(&self) -> bool {
        self.fd == 1
    }
}

/// 法规相关标记（COPPA 等）
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Regs {
    /// 1 = 请求受 COPPA 约束，0 = 不受约束，缺省表示未知
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coppa: Option<i32>,
    #[serde(default, deserialize_with = "crate::openrtb::ext::deserialize_present", skip_serializing_if = "Option::is_none")]
    pub ext: Option<Ext>,
}

impl Regs {
    pub fn coppa(applies: bool) -> Self {
        Self {
            coppa: Some(i32::from(applies)),
            ext: None,
        }
    }

    pub fn is_coppa(&self) -> bool {
        self.coppa == Some(1)
    }
}
