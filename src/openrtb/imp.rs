use serde::{Deserialize, Serialize};

use super::ext::Ext;

pub const DEFAULT_BID_FLOOR_CUR: &str = "USD";

/// 广告展示机会（Imp）
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Imp {
    pub id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metric: Vec<Metric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<Banner>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<Video>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<Audio>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native: Option<Native>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pmp: Option<Pmp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub displaymanager: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub displaymanagerver: Option<String>,
    /// 1 = 插屏/全屏
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instl: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bidfloor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bidfloorcur: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clickbrowser: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub iframebuster: Vec<String>,
    /// 从竞价到实际展示的预估秒数
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i32>,
    #[serde(default, deserialize_with = "crate::openrtb::ext::deserialize_present", skip_serializing_if = "Option::is_none")]
    pub ext: Option<Ext>,
}

/// Imp 所声明的素材类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Banner,
    Video,
    Audio,
    Native,
}

impl Imp {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// 底价，缺省为 0
    pub fn bid_floor(&self) -> f64 {
        self.bidfloor.unwrap_or(0.0)
    }

    pub fn bid_floor_cur(&self) -> &str {
        self.bidfloorcur.as_deref().unwrap_or(DEFAULT_BID_FLOOR_CUR)
    }

    pub fn is_interstitial(&self) -> bool {
        self.instl == Some(1)
    }

    pub fn media_kinds(&self) -> Vec<MediaKind> {
        let mut kinds = Vec::new();
        if self.banner.is_some() {
            kinds.push(MediaKind::Banner);
        }
        if self.video.is_some() {
            kinds.push(MediaKind::Video);
        }
        if self.audio.is_some() {
            kinds.push(MediaKind::Audio);
        }
        if self.native.is_some() {
            kinds.push(MediaKind::Native);
        }
        kinds
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Metric {
    #[serde(rename = "type")]
    pub metric_type: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, deserialize_with = "crate::openrtb::ext::deserialize_present", skip_serializing_if = "Option::is_none")]
    pub ext: Option<Ext>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Banner {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub format: Vec<Format>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub btype: Vec<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub battr: Vec<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mimes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topframe: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expdir: Vec<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub api: Vec<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// 作为视频伴随广告时：0 = 与视频同时展示，1 = 结束卡片
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vcm: Option<i32>,
    #[serde(default, deserialize_with = "crate::openrtb::ext::deserialize_present", skip_serializing_if = "Option::is_none")]
    pub ext: Option<Ext>,
}

impl Banner {
    pub fn with_size(w: i32, h: i32) -> Self {
        Self {
            w: Some(w),
            h: Some(h),
            ..Default::default()
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Format {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wratio: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hratio: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wmin: Option<i32>,
    #[serde(default, deserialize_with = "crate::openrtb::ext::deserialize_present", skip_serializing_if = "Option::is_none")]
    pub ext: Option<Ext>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Video {
    #[serde(default)]
    pub mimes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minduration: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxduration: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub protocols: Vec<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub startdelay: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linearity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipmin: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipafter: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub battr: Vec<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxextended: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minbitrate: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxbitrate: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boxingallowed: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub playbackmethod: Vec<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playbackend: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub delivery: Vec<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub companionad: Vec<Banner>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub api: Vec<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub companiontype: Vec<i32>,
    #[serde(default, deserialize_with = "crate::openrtb::ext::deserialize_present", skip_serializing_if = "Option::is_none")]
    pub ext: Option<Ext>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Audio {
    #[serde(default)]
    pub mimes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minduration: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxduration: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub protocols: Vec<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub startdelay: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub battr: Vec<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxextended: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minbitrate: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxbitrate: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub delivery: Vec<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub companionad: Vec<Banner>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub api: Vec<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub companiontype: Vec<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxseq: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stitched: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nvol: Option<i32>,
    #[serde(default, deserialize_with = "crate::openrtb::ext::deserialize_present", skip_serializing_if = "Option::is_none")]
    pub ext: Option<Ext>,
}

/// 原生广告，`request` 是 Native Ads 规范的请求负载（字符串形式）
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Native {
    #[serde(default)]
    pub request: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ver: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub api: Vec<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub battr: Vec<i32>,
    #[serde(default, deserialize_with = "crate::openrtb::ext::deserialize_present", skip_serializing_if = "Option::is_none")]
    pub ext: Option<Ext>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Pmp {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_auction: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deals: Vec<Deal>,
    #[serde(default, deserialize_with = "crate::openrtb::ext::deserialize_present", skip_serializing_if = "Option::is_none")]
    pub ext: Option<Ext>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Deal {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bidfloor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bidfloorcur: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub at: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub wseat: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub wadomain: Vec<String>,
    #[serde(default, deserialize_with = "crate::openrtb::ext::deserialize_present", skip_serializing_if = "Option::is_none")]
    pub ext: Option<Ext>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn floor_defaults() {
        let imp = Imp::new("1");
        assert_eq!(imp.bid_floor(), 0.0);
        assert_eq!(imp.bid_floor_cur(), "USD");
        assert!(!imp.is_interstitial());
        assert!(imp.media_kinds().is_empty());
    }

    #[test]
    fn decodes_banner_imp_from_exchange_payload() {
        let imp: Imp = serde_json::from_value(json!({
            "id": "1",
            "banner": { "w": 300, "h": 250, "pos": 1, "battr": [13], "format": [{ "w": 300, "h": 250 }] },
            "bidfloor": 0.75,
            "bidfloorcur": "EUR",
            "tagid": "slot-top",
            "instl": 1
        }))
        .unwrap();

        assert_eq!(imp.bid_floor(), 0.75);
        assert_eq!(imp.bid_floor_cur(), "EUR");
        assert!(imp.is_interstitial());
        assert_eq!(imp.media_kinds(), vec![MediaKind::Banner]);
        let banner = imp.banner.unwrap();
        assert_eq!((banner.w, banner.h), (Some(300), Some(250)));
        assert_eq!(banner.format.len(), 1);
        assert_eq!(banner.battr, vec![13]);
    }

    #[test]
    fn unset_fields_are_omitted() {
        let imp = Imp {
            banner: Some(Banner::with_size(728, 90)),
            ..Imp::new("7")
        };
        assert_eq!(
            serde_json::to_value(&imp).unwrap(),
            json!({ "id": "7", "banner": { "w": 728, "h": 90 } })
        );
    }

    #[test]
    fn metric_type_uses_wire_name() {
        let metric = Metric {
            metric_type: "viewability".into(),
            value: 0.5,
            vendor: Some("EXCHANGE".into()),
            ext: None,
        };
        assert_eq!(
            serde_json::to_value(&metric).unwrap(),
            json!({ "type": "viewability", "value": 0.5, "vendor": "EXCHANGE" })
        );
    }

    #[test]
    fn video_and_pmp_round_trip() {
        let imp = Imp {
            video: Some(Video {
                mimes: vec!["video/mp4".into(), "video/webm".into()],
                minduration: Some(5),
                maxduration: Some(30),
                protocols: vec![2, 3, 5, 6],
                companionad: vec![Banner::with_size(300, 250)],
                ..Default::default()
            }),
            pmp: Some(Pmp {
                private_auction: Some(1),
                deals: vec![Deal {
                    id: "deal-1".into(),
                    bidfloor: Some(2.5),
                    wseat: vec!["seat-b".into(), "seat-a".into()],
                    ..Default::default()
                }],
                ext: None,
            }),
            ..Imp::new("v1")
        };
        let text = serde_json::to_string(&imp).unwrap();
        let back: Imp = serde_json::from_str(&text).unwrap();
        assert_eq!(back, imp);
        assert_eq!(back.media_kinds(), vec![MediaKind::Video]);
    }

    #[test]
    fn native_request_is_kept_as_string() {
        let imp: Imp = serde_json::from_value(json!({
            "id": "n1",
            "native": { "request": "{\"native\":{\"ver\":\"1.2\"}}", "ver": "1.2" }
        }))
        .unwrap();
        assert_eq!(
            imp.native.as_ref().map(|n| n.request.as_str()),
            Some("{\"native\":{\"ver\":\"1.2\"}}")
        );
    }
}
