//! The command collaborator boundary.
//!
//! The engine does not parse arguments itself — it shapes metadata for
//! whatever parser the application wires in. [`Command`] is the in-crate
//! command node: an identity, a path from the root, an execution context,
//! and a [`FlagSet`] of option descriptors with per-option annotation slots
//! and changed/satisfied tracking. The optional `cli` module bridges this to
//! clap.

use std::collections::{HashMap, HashSet};

use toml::Value;

use crate::cell::ValueCell;
use crate::schema::Kind;
use crate::scope::CommandId;

/// Values contributed to a command's execution by the destination type's
/// context capability.
#[derive(Debug, Default)]
pub struct CommandContext {
    values: HashMap<String, Value>,
}

impl CommandContext {
    pub fn insert(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The externally visible unit: one per leaf field, unless ignored.
#[derive(Debug, Clone)]
pub struct OptionDescriptor {
    pub name: String,
    pub field_path: String,
    pub short: Option<char>,
    pub description: String,
    pub env_names: Vec<String>,
    pub group: Option<String>,
    pub required: bool,
    pub kind: Kind,
    pub default: Option<Value>,
    pub cell: ValueCell,
}

/// A command's settable-option set with string-keyed annotation slots and a
/// per-option changed flag, toggled once explicit external input arrives.
#[derive(Debug, Default)]
pub struct FlagSet {
    options: Vec<OptionDescriptor>,
    index: HashMap<String, usize>,
    annotations: HashMap<String, HashMap<String, Vec<String>>>,
    changed: HashSet<String>,
    satisfied: HashSet<String>,
}

impl FlagSet {
    pub fn add(&mut self, opt: OptionDescriptor) {
        self.index.insert(opt.name.clone(), self.options.len());
        self.options.push(opt);
    }

    pub fn get(&self, name: &str) -> Option<&OptionDescriptor> {
        self.index.get(name).map(|&i| &self.options[i])
    }

    /// Options in definition order.
    pub fn options(&self) -> &[OptionDescriptor] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn set_annotation(&mut self, name: &str, key: &str, values: Vec<String>) {
        self.annotations
            .entry(name.to_string())
            .or_default()
            .insert(key.to_string(), values);
    }

    pub fn annotation(&self, name: &str, key: &str) -> Option<&[String]> {
        self.annotations
            .get(name)?
            .get(key)
            .map(Vec::as_slice)
    }

    /// Record explicit external input for a named option. Returns false for
    /// an unknown name.
    pub fn set_from_input(&mut self, name: &str, raw: &str) -> bool {
        let Some(opt) = self.get(name) else {
            return false;
        };
        opt.cell.set(Value::String(raw.to_string()));
        self.changed.insert(name.to_string());
        true
    }

    pub fn changed(&self, name: &str) -> bool {
        self.changed.contains(name)
    }

    /// Mark a mandatory option as satisfied by a non-explicit source, so
    /// external mandatory-flag enforcement does not spuriously fail.
    pub fn mark_satisfied(&mut self, name: &str) {
        self.satisfied.insert(name.to_string());
    }

    pub fn is_satisfied(&self, name: &str) -> bool {
        self.satisfied.contains(name) || self.changed(name)
    }

    /// Required options not yet satisfied by any source. What an external
    /// enforcer would consult before failing a run.
    pub fn unsatisfied_required(&self) -> Vec<String> {
        self.options
            .iter()
            .filter(|o| o.required && !self.is_satisfied(&o.name))
            .map(|o| o.name.clone())
            .collect()
    }
}

/// One node of a command tree. Identity is per instance: two commands with
/// the same declared name are distinct and never share binding state.
#[derive(Debug)]
pub struct Command {
    id: CommandId,
    name: String,
    path: Vec<String>,
    flags: FlagSet,
    context: CommandContext,
    debug_output: bool,
}

impl Command {
    pub fn new(name: &str) -> Self {
        Self {
            id: CommandId::next(),
            name: name.to_string(),
            path: vec![name.to_string()],
            flags: FlagSet::default(),
            context: CommandContext::default(),
            debug_output: false,
        }
    }

    /// Create a child command. The child gets its own identity and scope;
    /// only the path is inherited.
    pub fn subcommand(&self, name: &str) -> Command {
        let mut path = self.path.clone();
        path.push(name.to_string());
        Command {
            id: CommandId::next(),
            name: name.to_string(),
            path,
            flags: FlagSet::default(),
            context: CommandContext::default(),
            debug_output: false,
        }
    }

    pub fn id(&self) -> CommandId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path segments from the root command to this one.
    pub fn path_segments(&self) -> Vec<&str> {
        self.path.iter().map(String::as_str).collect()
    }

    pub fn root_name(&self) -> &str {
        &self.path[0]
    }

    pub fn flags(&self) -> &FlagSet {
        &self.flags
    }

    pub fn flags_mut(&mut self) -> &mut FlagSet {
        &mut self.flags
    }

    pub fn context(&self) -> &CommandContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut CommandContext {
        &mut self.context
    }

    pub fn set_debug_output(&mut self, on: bool) {
        self.debug_output = on;
    }

    pub fn debug_output(&self) -> bool {
        self.debug_output
    }
}
