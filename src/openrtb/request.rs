use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use uuid::Uuid;

use super::device::Device;
use super::expiry;
use super::ext::Ext;
use super::imp::Imp;
use super::site::{App, Site};
use super::source::{Regs, Source};
use super::user::User;
use crate::error::{Error, Result};

pub const DEFAULT_TEST: i32 = 0;
pub const DEFAULT_AT: i32 = 2;
pub const DEFAULT_CUR: &str = "usd";

fn default_at() -> i32 {
    DEFAULT_AT
}

/// 每个实例各自分配一份默认币种列表
fn default_cur() -> Vec<String> {
    vec![DEFAULT_CUR.to_string()]
}

/// 竞价类型（`at`）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuctionType {
    FirstPrice,
    SecondPricePlus,
    /// 大于 500 的交易所自定义类型
    ExchangeSpecific(i32),
    Other(i32),
}

impl From<i32> for AuctionType {
    fn from(value: i32) -> Self {
        match value {
            1 => AuctionType::FirstPrice,
            2 => AuctionType::SecondPricePlus,
            v if v > 500 => AuctionType::ExchangeSpecific(v),
            v => AuctionType::Other(v),
        }
    }
}

impl From<AuctionType> for i32 {
    fn from(at: AuctionType) -> Self {
        match at {
            AuctionType::FirstPrice => 1,
            AuctionType::SecondPricePlus => 2,
            AuctionType::ExchangeSpecific(v) | AuctionType::Other(v) => v,
        }
    }
}

/// OpenRTB BidRequest
///
/// 只承载一个 Imp（OpenRTB 允许 1..N 个）。线上仍然是 JSON 数组：
/// 编码为单元素数组，解码时超过一个元素视为格式错误。
/// site/app、wseat/bseat 的互斥关系不在模型里强制，见 [`crate::validation`]。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BidRequest {
    id: String,
    #[serde(default, with = "single_imp", skip_serializing_if = "Option::is_none")]
    imp: Option<Imp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    site: Option<Site>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    app: Option<App>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    device: Option<Device>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<User>,
    /// 0 = 正式，1 = 测试（不计费）
    #[serde(default)]
    test: i32,
    #[serde(default = "default_at")]
    at: i32,
    /// 响应截止时间（毫秒）
    tmax: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    wseat: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    bseat: Vec<String>,
    /// ISO-4217，顺序即优先级
    #[serde(default = "default_cur", skip_serializing_if = "Vec::is_empty")]
    cur: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    wlang: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    bcat: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    badv: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    bapp: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<Source>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    regs: Option<Regs>,
    #[serde(default, deserialize_with = "crate::openrtb::ext::deserialize_present", skip_serializing_if = "Option::is_none")]
    ext: Option<Ext>,
}

impl BidRequest {
    /// 创建请求，`at` 与 `test` 取默认值
    pub fn new(id: impl Into<String>, tmax: u64) -> Result<Self> {
        Self::with_auction(id, tmax, DEFAULT_AT, DEFAULT_TEST)
    }

    pub fn with_auction(id: impl Into<String>, tmax: u64, at: i32, test: i32) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(Error::MissingRequiredField { field: "id" });
        }
        Ok(Self {
            id,
            test,
            at,
            ..Self::empty(tmax)
        })
    }

    /// 以 UUID v4 作为请求 ID
    pub fn with_generated_id(tmax: u64) -> Self {
        Self::with_generated_auction(tmax, DEFAULT_AT, DEFAULT_TEST)
    }

    pub fn with_generated_auction(tmax: u64, at: i32, test: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            test,
            at,
            ..Self::empty(tmax)
        }
    }

    fn empty(tmax: u64) -> Self {
        Self {
            id: String::new(),
            imp: None,
            site: None,
            app: None,
            device: None,
            user: None,
            test: DEFAULT_TEST,
            at: DEFAULT_AT,
            tmax,
            wseat: Vec::new(),
            bseat: Vec::new(),
            cur: default_cur(),
            wlang: Vec::new(),
            bcat: Vec::new(),
            badv: Vec::new(),
            bapp: Vec::new(),
            source: None,
            regs: None,
            ext: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) -> Result<()> {
        let id = id.into();
        if id.is_empty() {
            return Err(Error::MissingRequiredField { field: "id" });
        }
        self.id = id;
        Ok(())
    }

    pub fn imp(&self) -> Option<&Imp> {
        self.imp.as_ref()
    }

    pub fn imp_mut(&mut self) -> Option<&mut Imp> {
        self.imp.as_mut()
    }

    pub fn set_imp(&mut self, imp: impl Into<Option<Imp>>) {
        self.imp = imp.into();
    }

    pub fn site(&self) -> Option<&Site> {
        self.site.as_ref()
    }

    pub fn site_mut(&mut self) -> Option<&mut Site> {
        self.site.as_mut()
    }

    pub fn set_site(&mut self, site: impl Into<Option<Site>>) {
        self.site = site.into();
    }

    pub fn app(&self) -> Option<&App> {
        self.app.as_ref()
    }

    pub fn app_mut(&mut self) -> Option<&mut App> {
        self.app.as_mut()
    }

    pub fn set_app(&mut self, app: impl Into<Option<App>>) {
        self.app = app.into();
    }

    pub fn device(&self) -> Option<&Device> {
        self.device.as_ref()
    }

    pub fn device_mut(&mut self) -> Option<&mut Device> {
        self.device.as_mut()
    }

    pub fn set_device(&mut self, device: impl Into<Option<Device>>) {
        self.device = device.into();
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn user_mut(&mut self) -> Option<&mut User> {
        self.user.as_mut()
    }

    pub fn set_user(&mut self, user: impl Into<Option<User>>) {
        self.user = user.into();
    }

    pub fn test(&self) -> i32 {
        self.test
    }

    pub fn set_test(&mut self, test: i32) {
        self.test = test;
    }

    pub fn is_test(&self) -> bool {
        self.test == 1
    }

    pub fn at(&self) -> i32 {
        self.at
    }

    pub fn set_at(&mut self, at: i32) {
        self.at = at;
    }

    pub fn auction_type(&self) -> AuctionType {
        AuctionType::from(self.at)
    }

    pub fn tmax(&self) -> u64 {
        self.tmax
    }

    pub fn set_tmax(&mut self, tmax: u64) {
        self.tmax = tmax;
    }

    pub fn wseat(&self) -> &[String] {
        &self.wseat
    }

    pub fn set_wseat<I, S>(&mut self, seats: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.wseat = collect_strings(seats);
    }

    pub fn bseat(&self) -> &[String] {
        &self.bseat
    }

    pub fn set_bseat<I, S>(&mut self, seats: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bseat = collect_strings(seats);
    }

    pub fn cur(&self) -> &[String] {
        &self.cur
    }

    pub fn set_cur<I, S>(&mut self, currencies: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cur = collect_strings(currencies);
    }

    pub fn wlang(&self) -> &[String] {
        &self.wlang
    }

    pub fn set_wlang<I, S>(&mut self, languages: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.wlang = collect_strings(languages);
    }

    pub fn bcat(&self) -> &[String] {
        &self.bcat
    }

    pub fn set_bcat<I, S>(&mut self, categories: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bcat = collect_strings(categories);
    }

    pub fn badv(&self) -> &[String] {
        &self.badv
    }

    pub fn set_badv<I, S>(&mut self, domains: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.badv = collect_strings(domains);
    }

    pub fn bapp(&self) -> &[String] {
        &self.bapp
    }

    pub fn set_bapp<I, S>(&mut self, apps: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bapp = collect_strings(apps);
    }

    pub fn source(&self) -> Option<&Source> {
        self.source.as_ref()
    }

    pub fn source_mut(&mut self) -> Option<&mut Source> {
        self.source.as_mut()
    }

    pub fn set_source(&mut self, source: impl Into<Option<Source>>) {
        self.source = source.into();
    }

    pub fn regs(&self) -> Option<&Regs> {
        self.regs.as_ref()
    }

    pub fn regs_mut(&mut self) -> Option<&mut Regs> {
        self.regs.as_mut()
    }

    pub fn set_regs(&mut self, regs: impl Into<Option<Regs>>) {
        self.regs = regs.into();
    }

    pub fn ext(&self) -> Option<&Ext> {
        self.ext.as_ref()
    }

    pub fn ext_mut(&mut self) -> Option<&mut Ext> {
        self.ext.as_mut()
    }

    pub fn set_ext(&mut self, ext: impl Into<Option<Ext>>) {
        self.ext = ext.into();
    }

    /// 从 `reference`（请求到达时刻）起是否已超过 `tmax`
    pub fn is_expired(&self, reference: DateTime<Utc>) -> bool {
        self.is_expired_at(reference, Utc::now())
    }

    pub fn is_expired_at(&self, reference: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        expiry::exceeds(expiry::elapsed_millis(reference, now), self.tmax)
    }

    /// 单调时钟版本，不受系统时间回拨影响
    pub fn is_expired_since(&self, started: Instant) -> bool {
        expiry::exceeds(expiry::duration_millis(started.elapsed()), self.tmax)
    }

    pub fn deadline(&self, reference: DateTime<Utc>) -> Option<DateTime<Utc>> {
        expiry::deadline(reference, self.tmax)
    }

    pub fn remaining(&self, reference: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
        expiry::remaining(reference, now, self.tmax)
    }
}

fn collect_strings<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

/// `imp` 在线上是数组，模型里只保留一个
mod single_imp {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::openrtb::imp::Imp;

    pub fn serialize<S: Serializer>(imp: &Option<Imp>, serializer: S) -> Result<S::Ok, S::Error> {
        match imp {
            Some(imp) => std::slice::from_ref(imp).serialize(serializer),
            None => <[Imp]>::serialize(&[], serializer),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Imp>, D::Error> {
        let mut imps = Option::<Vec<Imp>>::deserialize(deserializer)?.unwrap_or_default();
        match imps.len() {
            0 => Ok(None),
            1 => Ok(imps.pop()),
            n => Err(D::Error::invalid_length(n, &"exactly one impression")),
        }
    }
}
