//! The resolution engine: merges every source through the precedence chain
//! and deserializes the result into the destination type.
//!
//! Precedence, highest first: explicit input, environment, command config
//! section, defaults. The pipeline folds explicit cell values into the
//! store, merges the command's config section (with alias remapping),
//! snapshots all layers, runs decode hooks over textual values, checks
//! mandatory presence, deserializes, and finally drives the destination's
//! lifecycle capabilities in a fixed order: context, transform, validate.

use tracing::debug;
use toml::{Table, Value};

use crate::binder::{Binder, UnmarshalOptions};
use crate::command::Command;
use crate::error::OptfigError;
use crate::hooks::DecodeHook;
use crate::merge::{get_dotted, remap_keys, section_for_command, set_dotted};
use crate::schema::Bind;
use crate::scope::hook_key;

pub(crate) fn unmarshal<C: Bind>(
    binder: &Binder,
    cmd: &mut Command,
    global: &Table,
    opts: &UnmarshalOptions,
) -> Result<C, OptfigError> {
    let scope = binder.scopes.scope(cmd.id());

    // Explicit input first: changed cells land in the store's top layer.
    for opt in cmd.flags().options() {
        if cmd.flags().changed(&opt.name) {
            if let Some(value) = opt.cell.get() {
                scope.with_store(|s| s.set(&opt.field_path, value.clone()));
            }
        }
    }

    let aliases = binder
        .aliases
        .read()
        .expect("aliases lock poisoned")
        .clone();
    let defaults = binder
        .defaults
        .read()
        .expect("defaults lock poisoned")
        .clone();

    let mut section = section_for_command(global, &cmd.path_segments());
    remap_keys(&mut section, &aliases, &defaults);
    scope.with_store(|s| s.merge_map(section));

    let mut snapshot = scope.with_store(|s| s.all_settings());
    remap_keys(&mut snapshot, &aliases, &defaults);

    // Caller-supplied hooks run before per-option hooks.
    for (path, hook) in &opts.hooks {
        apply_decode(&mut snapshot, path, path, hook)?;
    }
    for opt in cmd.flags().options() {
        let hook = scope
            .custom_decode(&hook_key(cmd.id(), &opt.field_path))
            .or_else(|| binder.registry.decode_for(opt.kind));
        if let Some(hook) = hook {
            apply_decode(&mut snapshot, &opt.field_path, &opt.name, &hook)?;
        }
    }

    for opt in cmd.flags().options() {
        if opt.required && get_dotted(&snapshot, &opt.field_path).is_none() {
            return Err(OptfigError::MissingRequired {
                name: opt.name.clone(),
                command: cmd.name().to_string(),
            });
        }
    }

    let mut config: C =
        Value::Table(snapshot)
            .try_into()
            .map_err(|e| OptfigError::Deserialize {
                stage: "deserialize",
                reason: e.to_string(),
            })?;

    config.context(cmd.context_mut());

    config.transform().map_err(|reason| OptfigError::Transform {
        command: cmd.name().to_string(),
        reason,
    })?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(OptfigError::Validation {
            command: cmd.name().to_string(),
            errors,
        });
    }

    // Mandatory options filled from config or environment are reported as
    // satisfied, so external required-flag enforcement does not fail runs
    // that never touched the flag.
    let satisfied: Vec<String> = cmd
        .flags()
        .options()
        .iter()
        .filter(|o| o.required && !cmd.flags().changed(&o.name))
        .filter(|o| scope.with_store(|s| s.from_config_or_env(&o.field_path)))
        .map(|o| o.name.clone())
        .collect();
    for name in satisfied {
        cmd.flags_mut().mark_satisfied(&name);
    }

    if cmd.debug_output() {
        if let Ok(json) = serde_json::to_string_pretty(&config) {
            debug!(command = %cmd.name(), config = %json, "resolved configuration");
        }
    }

    Ok(config)
}

/// Run a decode hook over the snapshot value at a dotted path. Hooks only
/// fire on textual values; typed values pass through untouched.
fn apply_decode(
    snapshot: &mut Table,
    path: &str,
    key: &str,
    hook: &DecodeHook,
) -> Result<(), OptfigError> {
    let Some(raw @ Value::String(_)) = get_dotted(snapshot, path).cloned() else {
        return Ok(());
    };
    let decoded = hook(&raw)
        .map_err(|reason| {
            OptfigError::Decode {
                key: key.to_string(),
                value: raw.as_str().unwrap_or_default().to_string(),
                reason,
            }
            .at_stage("decode")
        })?;
    set_dotted(snapshot, path, decoded);
    Ok(())
}
