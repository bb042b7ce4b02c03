use serde::{Deserialize, Serialize};

use super::ext::Ext;
use super::user::Data;

/// 网站信息
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Site {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cat: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sectioncat: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pagecat: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacypolicy: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<Publisher>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(default, deserialize_with = "crate::openrtb::ext::deserialize_present", skip_serializing_if = "Option::is_none")]
    pub ext: Option<Ext>,
}

/// 应用信息
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct App {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Android 包名或 iOS 数字 ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storeurl: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cat: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sectioncat: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pagecat: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ver: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacypolicy: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<Publisher>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(default, deserialize_with = "crate::openrtb::ext::deserialize_present", skip_serializing_if = "Option::is_none")]
    pub ext: Option<Ext>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Publisher {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cat: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, deserialize_with = "crate::openrtb::ext::deserialize_present", skip_serializing_if = "Option::is_none")]
    pub ext: Option<Ext>,
}

/// 内容制作方，字段与 Publisher 相同
pub type Producer = Publisher;

/// 广告所在的内容（视频、文章、音频等）
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isrc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer: Option<Producer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cat: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prodq: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contentrating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub userrating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qagmediarating: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub livestream: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sourcerelationship: Option<i32>,
    /// 内容时长（秒）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub len: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embeddable: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<Data>,
    #[serde(default, deserialize_with = "crate::openrtb::ext::deserialize_present", skip_serializing_if = "Option::is_none")]
    pub ext: Option<Ext>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn site_ref_uses_wire_name() {
        let site: Site = serde_json::from_value(json!({
            "id": "s1",
            "domain": "news.example.com",
            "page": "https://news.example.com/a",
            "ref": "https://search.example.com/?q=a",
            "cat": ["IAB12", "IAB12-1"],
            "publisher": { "id": "pub-9", "name": "Example News" }
        }))
        .unwrap();

        assert_eq!(site.referrer.as_deref(), Some("https://search.example.com/?q=a"));
        assert_eq!(site.cat, vec!["IAB12", "IAB12-1"]);
        assert_eq!(site.publisher.as_ref().and_then(|p| p.id.as_deref()), Some("pub-9"));

        let value = serde_json::to_value(&site).unwrap();
        assert_eq!(value["ref"], json!("https://search.example.com/?q=a"));
        assert!(value.get("referrer").is_none());
    }

    #[test]
    fn app_with_content_round_trips() {
        let app = App {
            id: Some("a1".into()),
            bundle: Some("com.foo.mygame".into()),
            storeurl: Some("https://play.google.com/store/apps/details?id=com.foo.mygame".into()),
            paid: Some(0),
            content: Some(Content {
                title: Some("Level 3".into()),
                livestream: Some(0),
                producer: Some(Producer {
                    name: Some("Foo Studios".into()),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        let text = serde_json::to_string(&app).unwrap();
        let back: App = serde_json::from_str(&text).unwrap();
        assert_eq!(back, app);
    }

    #[test]
    fn empty_site_encodes_as_empty_object() {
        assert_eq!(serde_json::to_value(Site::default()).unwrap(), json!({}));
    }
}
