use serde::{Deserialize, Serialize};

use super::device::Geo;
use super::ext::Ext;

/// 用户信息
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyeruid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yob: Option<i32>,
    /// "M" / "F" / "O"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customdata: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<Geo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<Data>,
    #[serde(default, deserialize_with = "crate::openrtb::ext::deserialize_present", skip_serializing_if = "Option::is_none")]
    pub ext: Option<Ext>,
}

/// 第三方数据提供方
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Data {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub segment: Vec<Segment>,
    #[serde(default, deserialize_with = "crate::openrtb::ext::deserialize_present", skip_serializing_if = "Option::is_none")]
    pub ext: Option<Ext>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Segment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, deserialize_with = "crate::openrtb::ext::deserialize_present", skip_serializing_if = "Option::is_none")]
    pub ext: Option<Ext>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn segments_keep_order() {
        let user: User = serde_json::from_value(json!({
            "id": "u-1",
            "buyeruid": "b-77",
            "data": [{
                "id": "dp-1",
                "segment": [{ "id": "s3" }, { "id": "s1" }, { "id": "s2", "value": "high" }]
            }],
            "ext": { "consent": "CO-abc" }
        }))
        .unwrap();

        let ids: Vec<_> = user.data[0]
            .segment
            .iter()
            .filter_map(|s| s.id.as_deref())
            .collect();
        assert_eq!(ids, vec!["s3", "s1", "s2"]);
        assert_eq!(
            user.ext.as_ref().and_then(|e| e.get("consent")),
            Some(&json!("CO-abc"))
        );
    }
}
