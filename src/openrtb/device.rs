use serde::{Deserialize, Serialize};

use super::ext::Ext;

/// 设备信息
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Device {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ua: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<Geo>,
    /// Do Not Track：1 = 用户不希望被追踪
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dnt: Option<i32>,
    /// Limit Ad Tracking
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lmt: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub devicetype: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub osv: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hwv: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ppi: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pxratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub js: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geofetch: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flashver: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mccmnc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connectiontype: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ifa: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub didsha1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub didmd5: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dpidsha1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dpidmd5: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macsha1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macmd5: Option<String>,
    #[serde(default, deserialize_with = "crate::openrtb::ext::deserialize_present", skip_serializing_if = "Option::is_none")]
    pub ext: Option<Ext>,
}

impl Device {
    pub fn do_not_track(&self) -> bool {
        self.dnt == Some(1) || self.lmt == Some(1)
    }
}

/// 地理位置
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Geo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    /// 1 = GPS，2 = IP，3 = 用户提供
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub geo_type: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastfix: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipservice: Option<i32>,
    /// ISO-3166-1 alpha-3
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regionfips104: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metro: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utcoffset: Option<i32>,
    #[serde(default, deserialize_with = "crate::openrtb::ext::deserialize_present", skip_serializing_if = "Option::is_none")]
    pub ext: Option<Ext>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_mobile_device() {
        let device: Device = serde_json::from_value(json!({
            "ua": "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)",
            "ip": "192.0.2.1",
            "devicetype": 4,
            "os": "iOS",
            "lmt": 1,
            "ifa": "00000000-0000-0000-0000-000000000000",
            "geo": { "country": "USA", "type": 2, "utcoffset": -300 }
        }))
        .unwrap();

        assert!(device.do_not_track());
        let geo = device.geo.unwrap();
        assert_eq!(geo.geo_type, Some(2));
        assert_eq!(geo.country.as_deref(), Some("USA"));
        assert_eq!(geo.utcoffset, Some(-300));
    }

    #[test]
    fn geo_type_uses_wire_name() {
        let geo = Geo {
            geo_type: Some(1),
            lat: Some(31.25),
            lon: Some(121.5),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&geo).unwrap(),
            json!({ "lat": 31.25, "lon": 121.5, "type": 1 })
        );
    }

    #[test]
    fn tracking_allowed_by_default() {
        assert!(!Device::default().do_not_track());
    }
}
