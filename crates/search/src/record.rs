//! Indexed item records
//!
//! A [`SearchRecord`] is one language version of one content item as the
//! index stores it. The engine only reads records; it never owns them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Content item identifier
///
/// Parses braced (`{110D559F-DEA5-42EA-9C1C-8A5DF7E70EF9}`), dashed, and
/// 32-digit short forms; `urn:uuid:` input is not an item id. Displays in
/// the braced upper-case form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

#[derive(Debug, Error)]
#[error("'{input}' is not an item id")]
pub struct ItemIdError {
    input: String,
}

impl ItemId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for ItemId {
    type Err = ItemIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let err = || ItemIdError { input: s.to_string() };

        if input.get(..9).is_some_and(|prefix| prefix.eq_ignore_ascii_case("urn:uuid:")) {
            return Err(err());
        }
        Uuid::parse_str(input).map(Self).map_err(|_| err())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.0.hyphenated().to_string().to_uppercase())
    }
}

/// One indexed item version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecord {
    /// Item this record belongs to
    pub item_id: ItemId,

    /// Item name
    pub name: String,

    /// Full content path, e.g. `/sitecore/content/home/news`
    pub path: String,

    /// Template the item is based on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_name: Option<String>,

    /// Language tag of this version
    pub language: String,

    /// Version number within the language
    #[serde(default = "default_version")]
    pub version: u32,

    /// Whether this is the newest version in its language
    #[serde(default = "default_latest")]
    pub is_latest_version: bool,

    /// Ancestors of the item (including the item itself, as the index stores it)
    #[serde(default)]
    pub ancestor_ids: Vec<ItemId>,

    /// Indexed field values by field name
    #[serde(default)]
    pub fields: BTreeMap<String, Vec<String>>,
}

fn default_version() -> u32 { 1 }
fn default_latest() -> bool { true }

impl SearchRecord {
    /// Values stored for `name`; an absent field yields an empty slice
    pub fn field_values(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_ancestor(&self, id: &ItemId) -> bool {
        self.ancestor_ids.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: &str = "110d559f-dea5-42ea-9c1c-8a5df7e70ef9";

    #[test]
    fn test_item_id_accepts_all_forms() {
        let dashed: ItemId = HOME.parse().unwrap();
        let braced: ItemId = "{110D559F-DEA5-42EA-9C1C-8A5DF7E70EF9}".parse().unwrap();
        let short: ItemId = "110D559FDEA542EA9C1C8A5DF7E70EF9".parse().unwrap();

        assert_eq!(dashed, braced);
        assert_eq!(dashed, short);
        assert_eq!(braced.to_string(), "{110D559F-DEA5-42EA-9C1C-8A5DF7E70EF9}");
    }

    #[test]
    fn test_item_id_rejects_paths() {
        assert!("/sitecore/content/home".parse::<ItemId>().is_err());
    }

    #[test]
    fn test_item_id_rejects_urn_form() {
        assert!("urn:uuid:110d559f-dea5-42ea-9c1c-8a5df7e70ef9".parse::<ItemId>().is_err());
        assert!("URN:UUID:110D559F-DEA5-42EA-9C1C-8A5DF7E70EF9".parse::<ItemId>().is_err());
    }

    #[test]
    fn test_absent_field_is_empty() {
        let record: SearchRecord = serde_json::from_value(serde_json::json!({
            "itemId": HOME,
            "name": "home",
            "path": "/sitecore/content/home",
            "language": "en",
            "fields": { "title": ["Welcome"] }
        }))
        .unwrap();

        assert_eq!(record.field_values("title"), ["Welcome".to_string()]);
        assert!(record.field_values("summary").is_empty());
        assert!(record.is_latest_version);
        assert_eq!(record.version, 1);
    }
}
