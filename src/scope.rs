//! Per-command binding state.
//!
//! A [`Scope`] is keyed by command *identity*, never by name: two command
//! instances that happen to share a declared name get fully isolated scopes.
//! Each scope owns the command's private layered store, the set of env vars
//! already bound, the custom decode hooks registered for that command, and
//! the defined-option map used for duplicate detection.
//!
//! Lock discipline: one read-write lock guards the scope's maps; the store
//! sits behind its own mutex and no lock is ever held across a call into it.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use crate::error::OptfigError;
use crate::hooks::DecodeHook;
use crate::store::ConfigStore;

/// Process-unique, opaque command identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandId(u64);

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

impl CommandId {
    pub(crate) fn next() -> Self {
        CommandId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Key for a per-command, per-field custom decode hook. Deterministic, so
/// unrelated custom-typed fields on the same command never collide.
pub fn hook_key(id: CommandId, field_path: &str) -> String {
    format!("{}\u{1f}{}", id.as_u64(), field_path)
}

#[derive(Default)]
struct ScopeState {
    bound_env: HashSet<String>,
    custom_decode: HashMap<String, DecodeHook>,
    /// canonical option name → declaring field path
    defined: HashMap<String, String>,
}

pub struct Scope {
    state: RwLock<ScopeState>,
    store: Mutex<ConfigStore>,
}

impl Scope {
    fn new() -> Self {
        Self {
            state: RwLock::new(ScopeState::default()),
            store: Mutex::new(ConfigStore::new()),
        }
    }

    pub fn is_env_bound(&self, name: &str) -> bool {
        self.state
            .read()
            .expect("scope lock poisoned")
            .bound_env
            .contains(name)
    }

    pub fn set_bound(&self, name: &str) {
        self.state
            .write()
            .expect("scope lock poisoned")
            .bound_env
            .insert(name.to_string());
    }

    /// Register a canonical option name. A duplicate is a structured error
    /// naming both the new and the existing owner field path.
    pub fn add_defined_flag(&self, name: &str, field_path: &str) -> Result<(), OptfigError> {
        let mut state = self.state.write().expect("scope lock poisoned");
        if let Some(existing) = state.defined.get(name) {
            return Err(OptfigError::DuplicateOption {
                name: name.to_string(),
                field: field_path.to_string(),
                existing: existing.clone(),
            });
        }
        state.defined.insert(name.to_string(), field_path.to_string());
        Ok(())
    }

    pub fn defined_count(&self) -> usize {
        self.state.read().expect("scope lock poisoned").defined.len()
    }

    pub fn set_custom_decode(&self, key: String, hook: DecodeHook) {
        self.state
            .write()
            .expect("scope lock poisoned")
            .custom_decode
            .insert(key, hook);
    }

    pub fn custom_decode(&self, key: &str) -> Option<DecodeHook> {
        self.state
            .read()
            .expect("scope lock poisoned")
            .custom_decode
            .get(key)
            .cloned()
    }

    /// Run a closure against the scope's private store. The scope's own
    /// lock is not held while the closure runs.
    pub fn with_store<R>(&self, f: impl FnOnce(&mut ConfigStore) -> R) -> R {
        let mut store = self.store.lock().expect("store lock poisoned");
        f(&mut store)
    }
}

/// Lazily creates and hands out scopes by command identity.
#[derive(Default)]
pub struct ScopeRegistry {
    scopes: RwLock<HashMap<CommandId, Arc<Scope>>>,
}

impl ScopeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scope(&self, id: CommandId) -> Arc<Scope> {
        if let Some(scope) = self.scopes.read().expect("registry lock poisoned").get(&id) {
            return Arc::clone(scope);
        }
        let mut scopes = self.scopes.write().expect("registry lock poisoned");
        Arc::clone(scopes.entry(id).or_insert_with(|| Arc::new(Scope::new())))
    }
}
