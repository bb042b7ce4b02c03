//! OpenRTB BidRequest 数据模型
//!
//! - [`openrtb`]：BidRequest 及其子对象，字段名与 OpenRTB 2.5 一致
//! - [`codec`]：JSON 编解码，默认值是否写出由 [`config::WireConfig`] 控制
//! - [`validation`]：site/app、wseat/bseat 等软约束检查
//! - [`logging`]：tracing 日志初始化

pub mod codec;
pub mod config;
pub mod error;
pub mod logging;
pub mod openrtb;
pub mod validation;

pub use codec::{decode_simd, decode_slice, decode_str, encode, Encoder};
pub use config::{DefaultsPolicy, WireConfig};
pub use error::{Error, Result};
pub use openrtb::*;
pub use validation::Violation;
