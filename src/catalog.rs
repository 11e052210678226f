//! Item display reconciliation
//!
//! Resolves opaque catalog item ids to human-readable names for message
//! rendering and notification composition. Deterministic and
//! side-effect free; the catalog itself is fetched by an external
//! collaborator and handed in as a plain lookup table.

use crate::model::ItemLine;
use std::collections::HashMap;

/// What the catalog knows about one item. Price is in minor currency
/// units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemInfo {
    pub name: String,
    pub price: i64,
}

/// Lookup table from item id to display info.
pub type Catalog = HashMap<String, ItemInfo>;

/// Renders an item list as a single human-readable string:
/// `"Name (qty шт), ..."`. Unknown ids fall back to a truncated-id
/// placeholder instead of failing.
pub fn format_items(lines: &[ItemLine], catalog: &Catalog) -> String {
    if lines.is_empty() {
        return "—".to_string();
    }
    lines
        .iter()
        .map(|line| {
            let name = catalog
                .get(&line.item_id)
                .map_or_else(|| placeholder(&line.item_id), |info| info.name.clone());
            format!("{name} ({} шт)", line.qty)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn placeholder(item_id: &str) -> String {
    let short: String = item_id.chars().take(8).collect();
    format!("товар #{short}")
}
