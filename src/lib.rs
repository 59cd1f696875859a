//! Derive a CLI option surface from a declaratively annotated config
//! schema, then resolve values from every layer.
//!
//! Optfig turns one schema description into everything a command needs:
//! flag definitions, environment-variable bindings, config-file keys, and a
//! typed, validated value at the end.
//!
//! ```ignore
//! let binder = Binder::new();
//! let mut cmd = Command::new("myapp");
//! binder.define::<ServerConfig>(&mut cmd, DefineOptions::new())?;
//! binder.bind_env(&cmd)?;
//! let config: ServerConfig = binder.unmarshal(&mut cmd, &global_config)?;
//! ```
//!
//! # Why optfig
//!
//! Most CLI applications carry the same setting three or four times: once
//! as a flag definition, once as an env-var read, once as a config-file
//! key, and once as a struct field. The copies drift — a renamed flag keeps
//! its old env var, a new setting never makes it into the config loader.
//!
//! Optfig replaces the copies with a single schema. The destination struct
//! describes its fields once, through the [`Bind`] trait; the definition
//! walk derives the flag name, the short alias, the env-var names, and the
//! config key from that description. Add a field to the schema and every
//! surface picks it up.
//!
//! # Design: schema as source of truth
//!
//! A [`SchemaNode`] is a tree of [`FieldSpec`]s. Leaves carry a [`Kind`]
//! (string, bool, int, float, duration, log level, string list, int list,
//! or a custom tag) plus attributes; composites contribute path segments
//! and inherited metadata:
//!
//! - **`alias`** renames the option externally while the config key keeps
//!   the field path. Both env-var forms are bound, alias first.
//! - **`default`** is string-encoded and decoded through the same hook as
//!   runtime input, so a default that would not parse fails at definition
//!   time, not at 3am.
//! - **`required`** defers to the whole chain: a mandatory option supplied
//!   by config or environment is as satisfied as one passed on the command
//!   line.
//! - **`ignore`** keeps a field out of the option surface entirely.
//! - **`group`** tags options for help organization and propagates through
//!   nesting; a child's own group wins.
//!
//! # Layer precedence
//!
//! ```text
//! Declared defaults       string-encoded in the schema
//!        ↑ overridden by
//! Command config section  deepest table on the command path
//!        ↑ overridden by
//! Environment vars        PREFIX_FIELD_PATH, alias form first
//!        ↑ overridden by
//! Explicit input          CLI flags, or anything fed to the cells
//! ```
//!
//! Every layer is sparse: unset keys fall through to the layer below. Each
//! command instance gets its own isolated [`Scope`] keyed by identity, so
//! two commands that happen to share a name never share state.
//!
//! # Kinds and hooks
//!
//! Every kind pairs a *define* hook (produces the settable cell, may
//! enhance the description) with a *decode* hook (converts a textual value
//! into the target shape). The built-in registry covers the scalar kinds
//! plus durations (`"1h30m"` → milliseconds), log levels (canonicalized,
//! `"warning"` accepted), and comma-separated lists. Custom-tagged fields
//! register their own pair per field path; an incomplete pair is a
//! definition-time error that names the missing half.
//!
//! # Environment variables
//!
//! With prefix `MYAPP`, the field path `database.url` binds
//! `MYAPP_DATABASE_URL`; an alias `db-url` additionally binds
//! `MYAPP_DB_URL` and wins when both are set. The prefix derives lazily
//! from the root command's name, or explicitly via
//! [`Binder::set_app_name`]. Binding is idempotent.
//!
//! # Lifecycle
//!
//! After deserialization the destination type's capabilities run in a fixed
//! order: [`Bind::context`] contributes values to the command's execution
//! context, [`Bind::transform`] normalizes the decoded value, and
//! [`Bind::validate`] returns semantic errors, aggregated into one failure.
//! All three have no-op defaults.
//!
//! # Clap adapter
//!
//! The engine never parses arguments. The `cli` module (behind the `clap`
//! feature, on by default) projects an option surface onto a
//! `clap::Command` and feeds matches back as explicit input; only values
//! that genuinely came from the command line are applied. Any other parser
//! can do the same through [`FlagSet::set_from_input`].
//!
//! # Error handling
//!
//! All fallible operations return [`OptfigError`]. Errors are user-facing:
//! duplicate option names report both declaring fields, decode failures
//! name the option, the raw value, and (for lists) the offending position,
//! and incomplete custom hook pairs name the registration call to make.

pub mod error;
pub mod schema;

mod binder;
mod cell;
#[cfg(feature = "clap")]
pub mod cli;
mod command;
mod define;
mod env;
mod hooks;
pub(crate) mod merge;
mod naming;
mod resolve;
mod scope;
mod store;

#[cfg(test)]
mod fixtures;

pub use binder::{Binder, DefineOptions, UnmarshalOptions};
pub use cell::ValueCell;
pub use command::{Command, CommandContext, FlagSet, OptionDescriptor};
pub use error::OptfigError;
pub use hooks::{DecodeHook, DefineHook, DefineRequest, HookRegistry};
pub use schema::{Bind, FieldSpec, Kind, SchemaNode};
pub use scope::{CommandId, Scope, ScopeRegistry};
pub use store::ConfigStore;
