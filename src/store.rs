//! Persistent category → keyword mapping.
//!
//! The on-disk form is a JSON object whose key order is the iteration order
//! of the store. Order matters: the categorizer walks categories in this order
//! and the last match wins.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{FinsortError, Result};
use crate::models::UNCATEGORIZED;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEntry {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Insertion-ordered list of categories. A `Vec` rather than a map because
/// order is part of the matching semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMap(Vec<CategoryEntry>);

impl Default for CategoryMap {
    fn default() -> Self {
        Self(vec![CategoryEntry {
            name: UNCATEGORIZED.to_string(),
            keywords: Vec::new(),
        }])
    }
}

impl CategoryMap {
    fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|c| c.name == name)
    }

    fn ensure_sentinel(&mut self) {
        if self.position(UNCATEGORIZED).is_none() {
            self.0.insert(
                0,
                CategoryEntry {
                    name: UNCATEGORIZED.to_string(),
                    keywords: Vec::new(),
                },
            );
        }
    }
}

impl Serialize for CategoryMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in &self.0 {
            map.serialize_entry(&entry.name, &entry.keywords)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CategoryMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = CategoryMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of category name to keyword list")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
                let mut entries: Vec<CategoryEntry> = Vec::new();
                while let Some((name, keywords)) = access.next_entry::<String, Vec<String>>()? {
                    // Duplicate JSON keys: later value replaces, position kept.
                    if let Some(existing) = entries.iter_mut().find(|e| e.name == name) {
                        existing.keywords = keywords;
                    } else {
                        entries.push(CategoryEntry { name, keywords });
                    }
                }
                Ok(CategoryMap(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

/// Category store bound to its durable file. Every successful mutation
/// rewrites the whole file.
#[derive(Debug)]
pub struct CategoryStore {
    path: PathBuf,
    categories: CategoryMap,
}

impl CategoryStore {
    /// Read the store at `path`, or start from just the sentinel if the file
    /// does not exist. A malformed file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let mut categories = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str::<CategoryMap>(&content)?
        } else {
            tracing::debug!("No category file at {}, starting fresh", path.display());
            CategoryMap::default()
        };
        categories.ensure_sentinel();
        tracing::debug!("Loaded {} categories from {}", categories.0.len(), path.display());
        Ok(Self {
            path: path.to_path_buf(),
            categories,
        })
    }

    /// Overwrite the durable file with the full mapping.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.categories)?;
        std::fs::write(&self.path, format!("{json}\n"))?;
        tracing::debug!("Saved {} categories to {}", self.categories.0.len(), self.path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `false` without touching disk when the name is blank or taken.
    pub fn add_category(&mut self, name: &str) -> Result<bool> {
        let name = name.trim();
        if name.is_empty() || self.contains(name) {
            return Ok(false);
        }
        self.categories.0.push(CategoryEntry {
            name: name.to_string(),
            keywords: Vec::new(),
        });
        self.save()?;
        tracing::info!("Added category {name:?}");
        Ok(true)
    }

    /// Trim and append `keyword` to `category`. Returns `false` for blank or
    /// already-present keywords, and for the sentinel category.
    pub fn add_keyword(&mut self, category: &str, keyword: &str) -> Result<bool> {
        let idx = self
            .categories
            .position(category)
            .ok_or_else(|| FinsortError::UnknownCategory(category.to_string()))?;
        let keyword = keyword.trim();
        if keyword.is_empty() || category == UNCATEGORIZED {
            return Ok(false);
        }
        let entry = &mut self.categories.0[idx];
        if entry.keywords.iter().any(|k| k == keyword) {
            return Ok(false);
        }
        entry.keywords.push(keyword.to_string());
        self.save()?;
        tracing::info!("Added keyword {keyword:?} to {category:?}");
        Ok(true)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.categories.position(name).is_some()
    }

    pub fn keywords(&self, name: &str) -> Option<&[String]> {
        self.categories
            .0
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.keywords.as_slice())
    }

    pub fn names(&self) -> Vec<&str> {
        self.categories.0.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryEntry> {
        self.categories.0.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.0.len()
    }
}
