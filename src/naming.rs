//! Canonical option names and environment-variable names.
//!
//! The canonical external name is the alias when one is declared, otherwise
//! the lower-cased dot-path. Environment names are the global prefix joined
//! to the normalized path; when a field has both a path and a differing
//! alias, both env names are produced (canonical first) and both are tried
//! on read.

use std::sync::RwLock;

/// Canonical external name for a field.
pub fn canonical_name(path: &str, alias: Option<&str>) -> String {
    match alias {
        Some(a) if !a.is_empty() => a.to_string(),
        _ => path.to_lowercase(),
    }
}

/// Upper-case and replace `-`/`.` separators with `_`.
pub fn normalize_env(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '.' | '-' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

/// Environment-variable names for a field, canonical first. Deduplicates
/// when the alias normalizes to the same name as the path.
pub fn env_names(prefix: &str, path: &str, alias: Option<&str>) -> Vec<String> {
    let canonical = canonical_name(path, alias);
    let mut names = vec![format!("{prefix}_{}", normalize_env(&canonical))];
    let from_path = format!("{prefix}_{}", normalize_env(path));
    if from_path != names[0] {
        names.push(from_path);
    }
    names
}

/// The global env prefix. Derived lazily from the root command's name on the
/// first definition pass, but an explicitly set application name always wins
/// and a later lazy write never overwrites an existing value.
#[derive(Debug, Default)]
pub struct PrefixCell {
    value: RwLock<Option<String>>,
}

impl PrefixCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit application name: always overwrites.
    pub fn set_explicit(&self, name: &str) {
        let mut guard = self.value.write().expect("prefix lock poisoned");
        *guard = Some(normalize_env(name));
    }

    /// Lazy derivation: first writer wins.
    pub fn set_lazy(&self, name: &str) {
        let mut guard = self.value.write().expect("prefix lock poisoned");
        if guard.is_none() {
            *guard = Some(normalize_env(name));
        }
    }

    pub fn get(&self) -> Option<String> {
        self.value.read().expect("prefix lock poisoned").clone()
    }
}

/// Resolve the effective prefix for one definition pass. A caller-supplied
/// inherited prefix replaces the global one for that pass, except when it
/// normalizes to the same value — the double-prefixing guard.
pub fn effective_prefix(global: Option<&str>, inherited: Option<&str>) -> String {
    let global = global.unwrap_or("");
    match inherited {
        Some(p) if !p.is_empty() => {
            let normalized = normalize_env(p);
            if normalized == global {
                global.to_string()
            } else {
                normalized
            }
        }
        _ => global.to_string(),
    }
}
