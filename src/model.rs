use serde::{Deserialize, Serialize};
use std::fmt;

/// A single NFT as served by the portfolio backend.
///
/// `attributes` and `creators` default to empty sequences when the backend
/// omits them, so consumers never null-check either field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NftRecord {
    /// Opaque identifier, stable across fetches. Render key and dedup key.
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub symbol: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub collection: Option<String>,
    pub uri: Option<String>,
    #[serde(default)]
    pub attributes: Vec<NftAttribute>,
    #[serde(default)]
    pub creators: Vec<NftCreator>,
    pub royalty: Option<Royalty>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NftAttribute {
    pub trait_type: String,
    pub value: AttributeValue,
}

/// Attribute values arrive as either strings or numbers on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AttributeValue {
    Text(String),
    Number(f64),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NftCreator {
    pub address: String,
    pub verified: bool,
    /// Royalty share in percent (0-100).
    pub share: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Royalty {
    pub basis_points: u32,
}

impl NftRecord {
    /// Display name, with a placeholder when the backend sent an empty one.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "Unnamed NFT"
        } else {
            &self.name
        }
    }

    /// First creator is treated as the primary one for display.
    pub fn primary_creator(&self) -> Option<&NftCreator> {
        self.creators.first()
    }

    /// Collection name used for sorting; absent collection sorts as empty.
    pub fn collection_key(&self) -> &str {
        self.collection.as_deref().unwrap_or("")
    }
}

impl Royalty {
    pub fn percent(&self) -> f64 {
        self.basis_points as f64 / 100.0
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Text(s) => write!(f, "{s}"),
            // Whole numbers print without a trailing ".0"
            AttributeValue::Number(n) if n.fract() == 0.0 => write!(f, "{}", *n as i64),
            AttributeValue::Number(n) => write!(f, "{n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_name_renders_placeholder() {
        let nft: NftRecord = serde_json::from_value(serde_json::json!({
            "id": "mint-1",
            "name": "",
        }))
        .unwrap();
        assert_eq!(nft.display_name(), "Unnamed NFT");
    }

    #[test]
    fn attributes_and_creators_default_to_empty() {
        let nft: NftRecord = serde_json::from_value(serde_json::json!({
            "id": "mint-2",
            "name": "Ape #1",
        }))
        .unwrap();
        assert!(nft.attributes.is_empty());
        assert!(nft.creators.is_empty());
        assert!(nft.primary_creator().is_none());
    }

    #[test]
    fn attribute_values_accept_strings_and_numbers() {
        let nft: NftRecord = serde_json::from_value(serde_json::json!({
            "id": "mint-3",
            "name": "Ape #3",
            "attributes": [
                {"trait_type": "Fur", "value": "Golden"},
                {"trait_type": "Generation", "value": 2},
            ],
        }))
        .unwrap();
        assert_eq!(nft.attributes[0].value.to_string(), "Golden");
        assert_eq!(nft.attributes[1].value.to_string(), "2");
    }

    #[test]
    fn royalty_basis_points_convert_to_percent() {
        let royalty = Royalty { basis_points: 550 };
        assert!((royalty.percent() - 5.5).abs() < f64::EPSILON);
    }
}
