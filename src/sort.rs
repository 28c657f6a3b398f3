//! Ordering policy shared by the variable list and the command tree

use std::cmp::Ordering;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How sibling items are ordered when displayed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Keep the order items are declared in the settings file
    #[default]
    Settings,
    /// Sort by name, case-insensitive first
    Alphabetical,
}

/// Compare two keys roughly the way a locale collator would.
///
/// Letters compare case-insensitively first; only when two keys differ in case alone does
/// lowercase sort ahead of uppercase (`"a" < "A" < "b"`).
#[must_use]
pub fn compare_keys(a: &str, b: &str) -> Ordering {
    let primary = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    primary.then_with(|| {
        a.chars()
            .zip(b.chars())
            .map(|(x, y)| case_rank(x).cmp(&case_rank(y)))
            .find(|o| o.is_ne())
            .unwrap_or_else(|| a.len().cmp(&b.len()))
    })
}

fn case_rank(c: char) -> u8 {
    u8::from(c.is_uppercase())
}

/// Order `items` by `key` according to `mode`.
///
/// `Settings` returns the items untouched. `Alphabetical` is a stable sort, so items with
/// identical keys keep their relative input order.
#[must_use]
pub fn order<T, F>(mut items: Vec<T>, key: F, mode: SortOrder) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    if mode == SortOrder::Alphabetical {
        items.sort_by(|a, b| compare_keys(key(a), key(b)));
    }
    items
}
