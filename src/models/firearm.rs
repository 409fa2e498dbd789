use super::price::Price;
use serde::{Deserialize, Serialize};

/// Optional accessory for a firearm with its own price source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Display name, unique within its firearm
    pub name: String,
    /// Category label (Optic, Light, Laser, ...)
    #[serde(rename = "type")]
    pub category: String,
    /// Endpoint returning `{"price": <number>}`
    pub price_url: String,
    /// Image reference, passed through untouched
    #[serde(default)]
    pub image: String,
}

/// Catalog entry for a firearm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Firearm {
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub caliber: String,
    pub base_price: Price,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl Firearm {
    /// Look up one of this firearm's attachments by exact name
    pub fn attachment(&self, name: &str) -> Option<&Attachment> {
        self.attachments.iter().find(|a| a.name == name)
    }

    pub fn has_attachment(&self, name: &str) -> bool {
        self.attachment(name).is_some()
    }
}
