//! The engine facade: shared registries plus the three entry points —
//! `define` (schema registration), `bind_env` (environment binding), and
//! `unmarshal` (final resolution).
//!
//! A [`Binder`] is the explicit, injected replacement for ambient globals:
//! it owns the hook registry, the alias and default caches populated during
//! schema walks, the global env prefix, and the per-command scope registry.
//! One binder per process is typical; tests create independent ones.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use toml::{Table, Value};

use crate::command::Command;
use crate::define;
use crate::env;
use crate::error::OptfigError;
use crate::hooks::{DecodeHook, DefineHook, HookRegistry};
use crate::naming::PrefixCell;
use crate::resolve;
use crate::schema::Bind;
use crate::scope::{Scope, ScopeRegistry};

pub struct Binder {
    pub(crate) registry: HookRegistry,
    pub(crate) scopes: ScopeRegistry,
    /// alias → canonical field path, accumulated across schema walks.
    pub(crate) aliases: RwLock<HashMap<String, String>>,
    /// canonical option name → decoded default, for the key-remap step.
    pub(crate) defaults: RwLock<HashMap<String, Value>>,
    pub(crate) prefix: PrefixCell,
}

impl Default for Binder {
    fn default() -> Self {
        Self::new()
    }
}

// Manual impl: the registries hold bare closures.
impl fmt::Debug for Binder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binder")
            .field("aliases", &self.aliases)
            .field("defaults", &self.defaults)
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl Binder {
    pub fn new() -> Self {
        Self::with_registry(HookRegistry::builtin())
    }

    pub fn with_registry(registry: HookRegistry) -> Self {
        debug_assert!(
            registry.is_consistent(),
            "hook registry has a definition entry without a decode counterpart"
        );
        Self {
            registry,
            scopes: ScopeRegistry::new(),
            aliases: RwLock::new(HashMap::new()),
            defaults: RwLock::new(HashMap::new()),
            prefix: PrefixCell::new(),
        }
    }

    /// Set the application name the env prefix derives from. Explicit, so
    /// it overrides a prefix previously derived from a root command name.
    pub fn set_app_name(&self, name: &str) {
        self.prefix.set_explicit(name);
    }

    pub fn env_prefix(&self) -> Option<String> {
        self.prefix.get()
    }

    /// The command's scope, created lazily on first access.
    pub fn scope(&self, cmd: &Command) -> Arc<Scope> {
        self.scopes.scope(cmd.id())
    }

    /// Walk `C`'s schema and register its option surface on `cmd`.
    pub fn define<C: Bind>(
        &self,
        cmd: &mut Command,
        opts: DefineOptions,
    ) -> Result<(), OptfigError> {
        let schema = C::schema();
        if schema.is_empty() {
            return Err(OptfigError::EmptySchema {
                type_name: std::any::type_name::<C>().to_string(),
            });
        }
        self.prefix.set_lazy(cmd.root_name());
        define::walk(self, cmd, &schema, &opts)
    }

    /// Bind every env-enabled option into the command's store, idempotently.
    pub fn bind_env(&self, cmd: &Command) -> Result<(), OptfigError> {
        env::bind_environment(cmd, &self.scope(cmd));
        Ok(())
    }

    /// Resolve final values for `cmd` into a fresh `C`, merging `global`
    /// (the enclosing configuration snapshot) through the precedence chain.
    pub fn unmarshal<C: Bind>(&self, cmd: &mut Command, global: &Table) -> Result<C, OptfigError> {
        self.unmarshal_with(cmd, global, UnmarshalOptions::default())
    }

    pub fn unmarshal_with<C: Bind>(
        &self,
        cmd: &mut Command,
        global: &Table,
        opts: UnmarshalOptions,
    ) -> Result<C, OptfigError> {
        resolve::unmarshal(self, cmd, global, &opts)
    }
}

/// Per-define-pass options: exclusions, an inherited group, an inherited env
/// prefix for nested reuse, and the custom hook pairs for fields marked
/// `custom` (keyed by field path).
#[derive(Default, Clone)]
pub struct DefineOptions {
    pub(crate) group: Option<String>,
    pub(crate) exclusions: Vec<String>,
    pub(crate) env_prefix: Option<String>,
    pub(crate) define_hooks: HashMap<String, DefineHook>,
    pub(crate) decode_hooks: HashMap<String, DecodeHook>,
}

impl DefineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }

    /// Exclude a field by alias or full path, case-insensitively, scoped to
    /// this define pass only.
    pub fn exclude(mut self, name: &str) -> Self {
        self.exclusions.push(name.to_string());
        self
    }

    /// Inherited env prefix for nested schema reuse. Ignored when it
    /// normalizes to the already-active global prefix.
    pub fn env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    pub fn define_hook(mut self, field_path: &str, hook: DefineHook) -> Self {
        self.define_hooks.insert(field_path.to_string(), hook);
        self
    }

    pub fn decode_hook(mut self, field_path: &str, hook: DecodeHook) -> Self {
        self.decode_hooks.insert(field_path.to_string(), hook);
        self
    }
}

/// Extra caller-supplied decode hooks for one unmarshal call, applied after
/// the key-remap step and before per-option hooks.
#[derive(Default, Clone)]
pub struct UnmarshalOptions {
    pub(crate) hooks: Vec<(String, DecodeHook)>,
}

impl UnmarshalOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hook(mut self, field_path: &str, hook: DecodeHook) -> Self {
        self.hooks.push((field_path.to_string(), hook));
        self
    }
}
