//! Settable value cells.
//!
//! A [`ValueCell`] is a small shared handle exposing get/set for one value.
//! Definition hooks construct one per option; the flag store writes explicit
//! input through it. This is the explicit replacement for direct field
//! aliasing — no raw memory access, one cell per externally settable value.

use std::sync::{Arc, RwLock};

use toml::Value;

#[derive(Debug, Clone, Default)]
pub struct ValueCell {
    inner: Arc<RwLock<Option<Value>>>,
}

impl ValueCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(value: Value) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(value))),
        }
    }

    pub fn set(&self, value: Value) {
        *self.inner.write().expect("cell lock poisoned") = Some(value);
    }

    pub fn get(&self) -> Option<Value> {
        self.inner.read().expect("cell lock poisoned").clone()
    }

    pub fn is_set(&self) -> bool {
        self.inner.read().expect("cell lock poisoned").is_some()
    }
}
