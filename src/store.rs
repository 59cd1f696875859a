//! Per-command layered configuration store.
//!
//! Holds one sparse table per layer and answers lookups in precedence order:
//! explicit input > environment > merged config > defaults. The environment
//! layer is materialized from key→env-var bindings against a snapshot of the
//! process environment; tests inject synthetic snapshots instead of touching
//! real env vars.

use toml::{Table, Value};

use crate::merge::{deep_merge, get_dotted, set_dotted};

#[derive(Debug, Default)]
pub struct ConfigStore {
    defaults: Table,
    config: Table,
    explicit: Table,
    /// Dotted key → env var names, in binding order. First var present wins.
    env_bindings: Vec<(String, Vec<String>)>,
    /// Injected env snapshot; `None` reads the live process environment.
    env_source: Option<Vec<(String, String)>>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_default(&mut self, key: &str, value: Value) {
        set_dotted(&mut self.defaults, key, value);
    }

    /// Bind a dotted key to one or more environment-variable names.
    pub fn bind_env(&mut self, key: &str, names: Vec<String>) {
        self.env_bindings.push((key.to_string(), names));
    }

    /// Deep-merge a nested map into the config layer.
    pub fn merge_map(&mut self, table: Table) {
        self.config = deep_merge(std::mem::take(&mut self.config), table);
    }

    /// Record an explicit (command-line) value at the highest layer.
    pub fn set(&mut self, key: &str, value: Value) {
        set_dotted(&mut self.explicit, key, value);
    }

    pub fn set_env_source(&mut self, vars: Vec<(String, String)>) {
        self.env_source = Some(vars);
    }

    fn env_lookup(&self, name: &str) -> Option<String> {
        match &self.env_source {
            Some(vars) => vars
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone()),
            None => std::env::var(name).ok(),
        }
    }

    fn env_table(&self) -> Table {
        let mut table = Table::new();
        for (key, names) in &self.env_bindings {
            for name in names {
                if let Some(raw) = self.env_lookup(name) {
                    set_dotted(&mut table, key, Value::String(raw));
                    break;
                }
            }
        }
        table
    }

    /// Look up a dotted key through the precedence chain.
    pub fn get(&self, key: &str) -> Option<Value> {
        if let Some(v) = get_dotted(&self.explicit, key) {
            return Some(v.clone());
        }
        if let Some(v) = get_dotted(&self.env_table(), key) {
            return Some(v.clone());
        }
        if let Some(v) = get_dotted(&self.config, key) {
            return Some(v.clone());
        }
        get_dotted(&self.defaults, key).cloned()
    }

    /// True when a value for the key came from config or environment, as
    /// opposed to explicit input or a compiled default.
    pub fn from_config_or_env(&self, key: &str) -> bool {
        get_dotted(&self.config, key).is_some() || get_dotted(&self.env_table(), key).is_some()
    }

    /// True when any layer other than defaults holds the key.
    pub fn has_non_default(&self, key: &str) -> bool {
        get_dotted(&self.explicit, key).is_some() || self.from_config_or_env(key)
    }

    /// Merged snapshot of all layers, lowest precedence first.
    pub fn all_settings(&self) -> Table {
        let merged = deep_merge(self.defaults.clone(), self.config.clone());
        let merged = deep_merge(merged, self.env_table());
        deep_merge(merged, self.explicit.clone())
    }
}
