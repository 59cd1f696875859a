//! Table merging, dotted-key helpers, command-section resolution, and the
//! alias key-remap step that runs before final decoding.

use std::collections::HashMap;

use toml::{Table, Value};

/// Deep-merge `overlay` on top of `base`.
/// If both sides have a Table for the same key, recurse.
/// Otherwise, `overlay`'s value wins.
pub fn deep_merge(mut base: Table, overlay: Table) -> Table {
    for (key, overlay_val) in overlay {
        match (base.remove(&key), overlay_val) {
            (Some(Value::Table(base_tbl)), Value::Table(overlay_tbl)) => {
                base.insert(key, Value::Table(deep_merge(base_tbl, overlay_tbl)));
            }
            (_, overlay_val) => {
                base.insert(key, overlay_val);
            }
        }
    }
    base
}

/// Look up a value by dotted key path (e.g. `"database.url"`).
pub fn get_dotted<'a>(table: &'a Table, dotted_key: &str) -> Option<&'a Value> {
    let (path, leaf) = match dotted_key.rsplit_once('.') {
        Some((p, l)) => (Some(p), l),
        None => (None, dotted_key),
    };
    let tbl = match path {
        Some(path) => {
            let mut current = table;
            for segment in path.split('.') {
                current = current.get(segment)?.as_table()?;
            }
            current
        }
        None => table,
    };
    tbl.get(leaf)
}

/// Insert a value at a dotted key path, creating intermediate tables as
/// needed. A non-table value in the way is replaced by a table.
pub fn set_dotted(table: &mut Table, dotted_key: &str, value: Value) {
    let segments: Vec<&str> = dotted_key.split('.').collect();
    let mut current = table;
    for segment in &segments[..segments.len() - 1] {
        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Table(Table::new()));
        if !entry.is_table() {
            *entry = Value::Table(Table::new());
        }
        current = entry
            .as_table_mut()
            .expect("intermediate key was just replaced with a table");
    }
    current.insert(segments[segments.len() - 1].to_string(), value);
}

/// Compute the effective flat configuration for a command path out of a
/// global, possibly deeply nested tree:
///
/// 1. every top-level scalar (non-table) key is copied as the baseline;
/// 2. the command-path segments are walked through the tree, and the
///    deepest successfully-resolved table is applied wholesale over the
///    baseline — not merged level by level;
/// 3. a missing or non-table segment stops the walk (the last resolved
///    table still applies), and an explicitly empty deepest table yields no
///    override beyond the baseline.
pub fn section_for_command(global: &Table, path: &[&str]) -> Table {
    let mut merged = Table::new();
    for (key, value) in global {
        if !value.is_table() {
            merged.insert(key.clone(), value.clone());
        }
    }

    let mut deepest: Option<&Table> = None;
    let mut current = global;
    for segment in path {
        match current.get(*segment).and_then(Value::as_table) {
            Some(sub) => {
                deepest = Some(sub);
                current = sub;
            }
            None => break,
        }
    }

    if let Some(section) = deepest {
        for (key, value) in section {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Table(t) => t.is_empty(),
        _ => false,
    }
}

/// Rewrite flattened/aliased keys so a value resolves under both its
/// canonical field path and its declared alias.
///
/// For every known `alias → canonical-path` association: a flat alias key
/// holding a non-empty value different from its declared default is
/// propagated onto the canonical nested path and removed; afterwards,
/// whichever of the two keys is populated is mirrored onto the other.
pub fn remap_keys(
    merged: &mut Table,
    aliases: &HashMap<String, String>,
    defaults: &HashMap<String, Value>,
) {
    for (alias, canonical_path) in aliases {
        if let Some(flat) = merged.get(alias).cloned() {
            let is_default = defaults.get(alias).is_some_and(|d| *d == flat);
            if !is_empty_value(&flat) && !is_default {
                set_dotted(merged, canonical_path, flat);
                merged.remove(alias);
            }
        }
        match (
            get_dotted(merged, canonical_path).cloned(),
            merged.get(alias).cloned(),
        ) {
            (Some(nested), None) if !is_empty_value(&nested) => {
                merged.insert(alias.clone(), nested);
            }
            (None, Some(flat)) if !is_empty_value(&flat) => {
                set_dotted(merged, canonical_path, flat);
            }
            _ => {}
        }
    }
}
