//! Material counting.
//!
//! [`aggregate`] turns a structure into a table of canonical block keys and
//! counts. The table serializes to a JSON object and to `name,count` CSV
//! lines sorted by descending count.

mod translations;

pub use translations::Translations;

use crate::config::AirIds;
use crate::schematic::Structure;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Blocks per stack.
pub const STACK_SIZE: u64 = 64;
/// Blocks per shulker box (27 stacks).
pub const BOX_SIZE: u64 = 27 * STACK_SIZE;

/// Canonical block key to non-air cell count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialCount(BTreeMap<String, u64>);

/// Count every non-air cell across all regions.
///
/// Each region is counted by palette index first and merged into the table
/// afterwards, so the result does not depend on region order.
pub fn aggregate(structure: &Structure, air: &AirIds) -> MaterialCount {
    let mut table = MaterialCount::default();

    for region in &structure.regions {
        let solid = region.solid_mask(air);
        let mut per_index = vec![0u64; region.palette.len()];
        for &idx in &region.blocks {
            if let Some(slot) = per_index.get_mut(idx as usize) {
                *slot += 1;
            }
        }
        for (i, count) in per_index.into_iter().enumerate() {
            if count > 0 && solid[i] {
                table.add(region.palette[i].canonical_key(), count);
            }
        }
    }

    log::debug!(
        "aggregated {} material(s), {} block(s)",
        table.len(),
        table.total()
    );
    table
}

impl MaterialCount {
    pub fn add(&mut self, key: impl Into<String>, count: u64) {
        *self.0.entry(key.into()).or_insert(0) += count;
    }

    pub fn get(&self, key: &str) -> u64 {
        self.0.get(key).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    /// Merge another table into this one.
    pub fn merge(&mut self, other: &MaterialCount) {
        for (key, &count) in &other.0 {
            self.add(key.clone(), count);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Entries by descending count, ties by ascending key.
    pub fn sorted(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// JSON object mapping key to count.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.iter()
                .map(|(k, v)| (k.to_string(), serde_json::Value::from(v)))
                .collect(),
        )
    }

    /// `name,count` lines in [`sorted`](Self::sorted) order.
    ///
    /// Keys containing commas or quotes are quoted.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        for (key, count) in self.sorted() {
            out.push_str(&csv_field(key));
            out.push(',');
            out.push_str(&count.to_string());
            out.push('\n');
        }
        out
    }

    /// Display rows in [`sorted`](Self::sorted) order.
    pub fn rows(&self, translations: &Translations) -> Vec<MaterialRow> {
        self.sorted()
            .into_iter()
            .map(|(key, count)| MaterialRow::new(key, translations.display_name(key), count))
            .collect()
    }
}

fn csv_field(s: &str) -> String {
    if s.contains(|c: char| matches!(c, ',' | '"' | '\n')) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// One line of a material list, split into boxes, stacks and single items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialRow {
    pub key: String,
    pub display_name: String,
    pub count: u64,
    pub boxes: u64,
    pub stacks: u64,
    pub leftover: u64,
}

impl MaterialRow {
    pub fn new(key: &str, display_name: &str, count: u64) -> Self {
        let (boxes, stacks, leftover) = split_count(count);
        Self {
            key: key.to_string(),
            display_name: display_name.to_string(),
            count,
            boxes,
            stacks,
            leftover,
        }
    }
}

/// `(boxes, stacks, leftover)` for an item count.
pub fn split_count(count: u64) -> (u64, u64, u64) {
    let boxes = count / BOX_SIZE;
    let remainder = count % BOX_SIZE;
    (boxes, remainder / STACK_SIZE, remainder % STACK_SIZE)
}
