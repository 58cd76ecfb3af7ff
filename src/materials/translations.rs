//! Display names for block keys.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Read-only block key to display name table.
///
/// Loaded once at startup and shared; cloning only bumps a reference count.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Translations(Arc<HashMap<String, String>>);

impl Translations {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self(Arc::new(entries))
    }

    /// Parse a flat JSON object of `"minecraft:stone": "Stone"` pairs.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let entries: HashMap<String, String> = serde_json::from_str(json)?;
        Ok(Self::new(entries))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Display name for a canonical key.
    ///
    /// Tries the full key, then the bare block name (properties stripped),
    /// then falls back to the key itself.
    pub fn display_name<'a>(&'a self, key: &'a str) -> &'a str {
        if let Some(name) = self.0.get(key) {
            return name;
        }
        let bare = key.split_once('[').map(|(name, _)| name).unwrap_or(key);
        self.0.get(bare).map(String::as_str).unwrap_or(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_fallbacks() {
        let t = Translations::from_json(
            r#"{ "minecraft:oak_stairs": "Oak Stairs", "minecraft:lever[face=floor]": "Floor Lever" }"#,
        )
        .unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.display_name("minecraft:oak_stairs[facing=north]"), "Oak Stairs");
        assert_eq!(t.display_name("minecraft:lever[face=floor]"), "Floor Lever");
        assert_eq!(t.display_name("minecraft:stone"), "minecraft:stone");
    }

    #[test]
    fn test_rejects_non_string_values() {
        assert!(Translations::from_json(r#"{ "minecraft:stone": 1 }"#).is_err());
    }
}
