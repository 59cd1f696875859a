//! Environment binding: wires each option's env-var names into the
//! command's store.
//!
//! Binding is idempotent per scope — an option already bound is skipped, so
//! calling this from both a definition pass and an explicit setup step never
//! duplicates bindings. Options with no env names (suppressed via the `env`
//! attribute) contribute nothing.

use tracing::trace;

use crate::command::Command;
use crate::scope::Scope;

pub(crate) fn bind_environment(cmd: &Command, scope: &Scope) {
    for opt in cmd.flags().options() {
        if opt.env_names.is_empty() {
            continue;
        }
        if scope.is_env_bound(&opt.name) {
            continue;
        }
        trace!(option = %opt.name, vars = ?opt.env_names, "binding environment variables");
        scope.with_store(|s| s.bind_env(&opt.field_path, opt.env_names.clone()));
        scope.set_bound(&opt.name);
    }
}

#[cfg(test)]
mod tests {
    use toml::Value;

    use crate::binder::{Binder, DefineOptions};
    use crate::command::Command;
    use crate::fixtures::test::ServerConfig;

    fn bound(binder: &Binder) -> Command {
        let mut cmd = Command::new("myapp");
        binder
            .define::<ServerConfig>(&mut cmd, DefineOptions::new())
            .unwrap();
        binder.bind_env(&cmd).unwrap();
        cmd
    }

    #[test]
    fn bound_vars_resolve_through_the_store() {
        let binder = Binder::new();
        let cmd = bound(&binder);
        let scope = binder.scope(&cmd);
        scope.with_store(|s| {
            s.set_env_source(vec![("MYAPP_HOST".to_string(), "envhost".to_string())]);
        });
        assert_eq!(
            scope.with_store(|s| s.get("host")),
            Some(Value::String("envhost".into()))
        );
    }

    #[test]
    fn alias_env_name_wins_over_path_form() {
        let binder = Binder::new();
        let cmd = bound(&binder);
        let scope = binder.scope(&cmd);
        scope.with_store(|s| {
            s.set_env_source(vec![
                ("MYAPP_DATABASE_URL".to_string(), "pg://path".to_string()),
                ("MYAPP_DB_URL".to_string(), "pg://alias".to_string()),
            ]);
        });
        assert_eq!(
            scope.with_store(|s| s.get("database.url")),
            Some(Value::String("pg://alias".into()))
        );
    }

    #[test]
    fn binding_twice_is_idempotent() {
        let binder = Binder::new();
        let mut cmd = Command::new("myapp");
        binder
            .define::<ServerConfig>(&mut cmd, DefineOptions::new())
            .unwrap();
        binder.bind_env(&cmd).unwrap();
        binder.bind_env(&cmd).unwrap();

        let scope = binder.scope(&cmd);
        scope.with_store(|s| {
            s.set_env_source(vec![("MYAPP_HOST".to_string(), "once".to_string())]);
        });
        assert!(scope.is_env_bound("host"));
        assert_eq!(
            scope.with_store(|s| s.get("host")),
            Some(Value::String("once".into()))
        );
    }
}
