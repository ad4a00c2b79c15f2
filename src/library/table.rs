//! Swap category table.
//!
//! Which canonical names get swapped, and how, is data: a JSON file that sits
//! next to the asset library, with a built-in table as fallback.

use crate::error::{Result, SwapError};
use crate::naming::canonical_name;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// How a canonical name is handled by the swap engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapCategory {
    /// Append a library object, duplicate it per cell, join the copies.
    ObjectSwap,
    /// Link a library group and place one instance per cell.
    GroupSwap,
    /// Known, but left untouched.
    Ignored,
    /// Delete the source geometry without a replacement.
    EraseOnly,
}

impl std::fmt::Display for SwapCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwapCategory::ObjectSwap => write!(f, "object swap"),
            SwapCategory::GroupSwap => write!(f, "group swap"),
            SwapCategory::Ignored => write!(f, "ignored"),
            SwapCategory::EraseOnly => write!(f, "erase only"),
        }
    }
}

/// Category membership by canonical name, plus variant counts for group swaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapTable {
    #[serde(default)]
    pub object_swap: BTreeSet<String>,
    #[serde(default)]
    pub group_swap: BTreeSet<String>,
    #[serde(default)]
    pub ignored: BTreeSet<String>,
    #[serde(default)]
    pub erase_only: BTreeSet<String>,
    /// Number of numbered variants (`name`, `name.1`, ...) per group-swap name.
    #[serde(default)]
    pub variants: BTreeMap<String, u32>,
}

const DEFAULT_OBJECT_SWAP: &[&str] = &[
    "cobweb",
    "dead_bush",
    "fern",
    "ladder",
    "lily_pad",
    "redstone_dust",
    "sugar_cane",
    "tall_grass",
    "vines",
    "wheat",
];

const DEFAULT_GROUP_SWAP: &[&str] = &[
    "campfire",
    "double_plant_grass_bottom",
    "fire",
    "lantern",
    "redstone_lamp_on",
    "redstone_torch_on",
    "sea_lantern",
    "torch",
];

const DEFAULT_ERASE_ONLY: &[&str] = &[
    "book",
    "cactus_bottom",
    "cactus_side",
    "door_iron_top",
    "door_wood_top",
    "double_plant_grass_top",
    "enchant_table_bottom",
    "enchant_table_side",
    "glass_pane_side",
    "glass_pane_top",
    "torch_flame",
];

impl Default for SwapTable {
    fn default() -> Self {
        let set = |names: &[&str]| -> BTreeSet<String> { names.iter().map(|n| n.to_string()).collect() };
        Self {
            object_swap: set(DEFAULT_OBJECT_SWAP),
            group_swap: set(DEFAULT_GROUP_SWAP),
            ignored: BTreeSet::new(),
            erase_only: set(DEFAULT_ERASE_ONLY),
            variants: BTreeMap::from([("torch".to_string(), 3)]),
        }
    }
}

impl SwapTable {
    /// An empty table: every name is unknown.
    pub fn empty() -> Self {
        Self {
            object_swap: BTreeSet::new(),
            group_swap: BTreeSet::new(),
            ignored: BTreeSet::new(),
            erase_only: BTreeSet::new(),
            variants: BTreeMap::new(),
        }
    }

    /// Parse and validate a table from JSON. Names are lower-cased.
    pub fn from_json(json: &str) -> Result<Self> {
        let table: SwapTable = serde_json::from_str(json)?;
        let table = table.normalized();
        table.validate()?;
        Ok(table)
    }

    /// Read a table from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Read the table at `path` if it exists, otherwise the built-in table.
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.is_file() {
            tracing::debug!("Reading swap table from {}", path.display());
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn with_category(mut self, name: &str, category: SwapCategory) -> Self {
        let name = name.to_lowercase();
        for set in [
            &mut self.object_swap,
            &mut self.group_swap,
            &mut self.ignored,
            &mut self.erase_only,
        ] {
            set.remove(&name);
        }
        match category {
            SwapCategory::ObjectSwap => self.object_swap.insert(name),
            SwapCategory::GroupSwap => self.group_swap.insert(name),
            SwapCategory::Ignored => self.ignored.insert(name),
            SwapCategory::EraseOnly => self.erase_only.insert(name),
        };
        self
    }

    /// Look up the category of an object or block name.
    ///
    /// The name is canonicalised and lower-cased first. Names in no list are
    /// reported as [`SwapError::UnknownSwapName`].
    pub fn classify(&self, name: &str) -> Result<SwapCategory> {
        let key = canonical_name(name).to_lowercase();
        if self.object_swap.contains(&key) {
            Ok(SwapCategory::ObjectSwap)
        } else if self.group_swap.contains(&key) {
            Ok(SwapCategory::GroupSwap)
        } else if self.erase_only.contains(&key) {
            Ok(SwapCategory::EraseOnly)
        } else if self.ignored.contains(&key) {
            Ok(SwapCategory::Ignored)
        } else {
            Err(SwapError::UnknownSwapName(key))
        }
    }

    /// Number of variants for a canonical name. Always at least 1.
    pub fn variant_count(&self, name: &str) -> u32 {
        self.variants
            .get(&name.to_lowercase())
            .copied()
            .unwrap_or(1)
            .max(1)
    }

    /// Check that no name sits in two categories and variant counts make sense.
    pub fn validate(&self) -> Result<()> {
        let lists = [
            ("object_swap", &self.object_swap),
            ("group_swap", &self.group_swap),
            ("ignored", &self.ignored),
            ("erase_only", &self.erase_only),
        ];
        for (i, (first_label, first)) in lists.iter().enumerate() {
            for (second_label, second) in &lists[i + 1..] {
                if let Some(name) = first.intersection(second).next() {
                    return Err(SwapError::InvalidSwapTable(format!(
                        "'{}' is listed in both {} and {}",
                        name, first_label, second_label
                    )));
                }
            }
        }

        for (name, &count) in &self.variants {
            if count == 0 {
                return Err(SwapError::InvalidSwapTable(format!(
                    "'{}' has a variant count of 0",
                    name
                )));
            }
            if !self.group_swap.contains(name) {
                return Err(SwapError::InvalidSwapTable(format!(
                    "'{}' has variants but is not a group swap",
                    name
                )));
            }
        }
        Ok(())
    }

    fn normalized(self) -> Self {
        let lower = |set: BTreeSet<String>| -> BTreeSet<String> {
            set.into_iter().map(|n| n.to_lowercase()).collect()
        };
        Self {
            object_swap: lower(self.object_swap),
            group_swap: lower(self.group_swap),
            ignored: lower(self.ignored),
            erase_only: lower(self.erase_only),
            variants: self
                .variants
                .into_iter()
                .map(|(name, count)| (name.to_lowercase(), count))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_valid() {
        let table = SwapTable::default();
        table.validate().unwrap();
        assert_eq!(table.classify("torch").unwrap(), SwapCategory::GroupSwap);
        assert_eq!(table.classify("cobweb.001").unwrap(), SwapCategory::ObjectSwap);
        assert_eq!(table.classify("torch_flame").unwrap(), SwapCategory::EraseOnly);
        assert_eq!(table.variant_count("torch"), 3);
        assert_eq!(table.variant_count("lantern"), 1);
    }

    #[test]
    fn test_unknown_name() {
        let table = SwapTable::default();
        assert!(matches!(
            table.classify("diamond_ore"),
            Err(SwapError::UnknownSwapName(name)) if name == "diamond_ore"
        ));
    }

    #[test]
    fn test_empty_table_knows_nothing() {
        let table = SwapTable::empty();
        table.validate().unwrap();
        assert!(table.classify("torch").is_err());
        assert_eq!(table.variant_count("torch"), 1);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let table = SwapTable::from_json(r#"{ "group_swap": ["Torch"] }"#).unwrap();
        assert_eq!(table.classify("TORCH.002").unwrap(), SwapCategory::GroupSwap);
    }

    #[test]
    fn test_from_json_partial_lists() {
        let json = r#"{
            "object_swap": ["cobweb"],
            "group_swap": ["torch"],
            "erase_only": ["torch_flame"],
            "variants": { "torch": 2 }
        }"#;
        let table = SwapTable::from_json(json).unwrap();
        assert_eq!(table.variant_count("torch"), 2);
        assert!(table.ignored.is_empty());
        assert!(table.classify("vines").is_err());
    }

    #[test]
    fn test_rejects_duplicate_membership() {
        let json = r#"{ "object_swap": ["torch"], "group_swap": ["torch"] }"#;
        assert!(matches!(
            SwapTable::from_json(json),
            Err(SwapError::InvalidSwapTable(_))
        ));
    }

    #[test]
    fn test_rejects_bad_variants() {
        let zero = r#"{ "group_swap": ["torch"], "variants": { "torch": 0 } }"#;
        assert!(SwapTable::from_json(zero).is_err());

        let not_group = r#"{ "object_swap": ["cobweb"], "variants": { "cobweb": 2 } }"#;
        assert!(SwapTable::from_json(not_group).is_err());
    }

    #[test]
    fn test_with_category_moves_name() {
        let table = SwapTable::default().with_category("torch", SwapCategory::Ignored);
        assert_eq!(table.classify("torch").unwrap(), SwapCategory::Ignored);
        assert!(!table.group_swap.contains("torch"));
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let table = SwapTable::from_file_or_default(dir.path().join("asset_meshSwap.json")).unwrap();
        assert_eq!(table, SwapTable::default());
    }
}
