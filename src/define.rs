//! The definition walker: turns a schema description into a command's
//! option surface.
//!
//! The walk is depth-first over the field tree. Composite fields contribute
//! path segments and inherited metadata (group, env enablement); leaf fields
//! become [`OptionDescriptor`]s via their kind's definition hook. Structural
//! problems — bad attribute values, name-grammar violations, duplicate
//! canonical names, incomplete custom hook pairs — abort the walk with an
//! error naming the offending field.

use std::collections::HashMap;

use tracing::trace;
use toml::Value;

use crate::binder::{Binder, DefineOptions};
use crate::command::{Command, OptionDescriptor};
use crate::error::OptfigError;
use crate::hooks::{DecodeHook, DefineHook, DefineRequest};
use crate::naming::{canonical_name, effective_prefix, env_names};
use crate::schema::{name_matches_grammar, FieldSpec, Kind, SchemaNode};
use crate::scope::hook_key;

/// Metadata inherited from enclosing composite fields.
#[derive(Clone)]
struct Inherited {
    path: String,
    group: Option<String>,
    env_enabled: bool,
}

pub(crate) fn walk(
    binder: &Binder,
    cmd: &mut Command,
    schema: &SchemaNode,
    opts: &DefineOptions,
) -> Result<(), OptfigError> {
    let prefix = effective_prefix(binder.prefix.get().as_deref(), opts.env_prefix.as_deref());
    let mut walker = Walker {
        binder,
        opts,
        prefix,
        custom_tags: HashMap::new(),
    };
    let inherited = Inherited {
        path: String::new(),
        group: opts.group.clone(),
        env_enabled: true,
    };
    for field in schema.fields() {
        walker.field(cmd, field, &inherited)?;
    }
    // A custom tag shared by two custom-marked fields in one pass cannot be
    // dispatched deterministically.
    for (tag, fields) in &walker.custom_tags {
        if fields.len() > 1 {
            return Err(OptfigError::AmbiguousCustomType {
                type_tag: tag.to_string(),
                fields: fields.clone(),
            });
        }
    }
    Ok(())
}

struct Walker<'a> {
    binder: &'a Binder,
    opts: &'a DefineOptions,
    prefix: String,
    /// custom tag → custom-marked field paths seen, for ambiguity detection.
    custom_tags: HashMap<&'static str, Vec<String>>,
}

impl Walker<'_> {
    fn field(
        &mut self,
        cmd: &mut Command,
        field: &FieldSpec,
        inherited: &Inherited,
    ) -> Result<(), OptfigError> {
        let path = if inherited.path.is_empty() {
            field.name().to_lowercase()
        } else {
            format!("{}.{}", inherited.path, field.name().to_lowercase())
        };
        if !name_matches_grammar(&path) {
            return Err(OptfigError::InvalidName {
                field: path.clone(),
                name: path,
            });
        }
        let alias = field.get_attr("alias").filter(|a| !a.is_empty());
        if let Some(a) = alias {
            if !name_matches_grammar(a) {
                return Err(OptfigError::InvalidName {
                    field: path,
                    name: a.to_string(),
                });
            }
        }

        if self.excluded(&path, alias) {
            trace!(field = %path, "field excluded from definition pass");
            return Ok(());
        }

        if field.is_composite() {
            return self.composite(cmd, field, &path, inherited);
        }
        self.leaf(cmd, field, &path, alias, inherited)
    }

    fn excluded(&self, path: &str, alias: Option<&str>) -> bool {
        self.opts.exclusions.iter().any(|ex| {
            ex.eq_ignore_ascii_case(path)
                || alias.is_some_and(|a| ex.eq_ignore_ascii_case(a))
        })
    }

    fn composite(
        &mut self,
        cmd: &mut Command,
        field: &FieldSpec,
        path: &str,
        inherited: &Inherited,
    ) -> Result<(), OptfigError> {
        for attr in ["short", "custom", "required", "ignore"] {
            if field.has_attr(attr) {
                return Err(OptfigError::AttrNotAllowedOnComposite {
                    field: path.to_string(),
                    attr,
                });
            }
        }
        let next = Inherited {
            path: path.to_string(),
            // a group declared on the composite wins over the inherited one
            group: field
                .get_attr("group")
                .map(str::to_string)
                .or_else(|| inherited.group.clone()),
            env_enabled: match field.get_attr("env") {
                Some(_) => parse_bool_attr(path, "env", field)?,
                None => inherited.env_enabled,
            },
        };
        for child in field.children() {
            self.field(cmd, child, &next)?;
        }
        Ok(())
    }

    fn leaf(
        &mut self,
        cmd: &mut Command,
        field: &FieldSpec,
        path: &str,
        alias: Option<&str>,
        inherited: &Inherited,
    ) -> Result<(), OptfigError> {
        let required = parse_bool_attr(path, "required", field)?;
        let ignore = parse_bool_attr(path, "ignore", field)?;
        let custom = parse_bool_attr(path, "custom", field)?;
        if required && ignore {
            return Err(OptfigError::ConflictingAttrs {
                field: path.to_string(),
            });
        }
        if ignore {
            trace!(field = %path, "field marked ignore, skipped");
            return Ok(());
        }

        let short = match field.get_attr("short") {
            Some(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(c),
                    _ => {
                        return Err(OptfigError::InvalidShort {
                            field: path.to_string(),
                            value: s.to_string(),
                        });
                    }
                }
            }
            None => None,
        };

        let kind = field
            .kind()
            .expect("leaf field always carries a kind");
        let hooks = self.resolve_hooks(cmd, path, kind, custom)?;
        let Some((define_hook, decode_hook)) = hooks else {
            // No hooks anywhere for this kind: the field contributes nothing
            // to the option surface.
            trace!(field = %path, kind = kind.tag(), "no definition hook, field skipped");
            return Ok(());
        };

        let canonical = canonical_name(path, alias);

        // The declared default is string-encoded and goes through the same
        // decode hook as runtime input. Decoded before the name is
        // registered, so a bad default leaves no half-registered name.
        let default = match field.get_attr("default") {
            Some(raw) => {
                let decoded = decode_hook(&Value::String(raw.to_string())).map_err(|reason| {
                    OptfigError::Decode {
                        key: canonical.clone(),
                        value: raw.to_string(),
                        reason,
                    }
                })?;
                Some(decoded)
            }
            None => None,
        };

        let scope = self.binder.scopes.scope(cmd.id());
        scope.add_defined_flag(&canonical, path)?;
        if let Some(decoded) = &default {
            scope.with_store(|s| s.set_default(path, decoded.clone()));
            self.binder
                .defaults
                .write()
                .expect("defaults lock poisoned")
                .insert(canonical.clone(), decoded.clone());
        }

        if canonical != path {
            self.binder
                .aliases
                .write()
                .expect("aliases lock poisoned")
                .insert(canonical.clone(), path.to_string());
        }

        let declared_desc = field.get_attr("desc").unwrap_or("");
        let request = DefineRequest {
            name: &canonical,
            short,
            description: declared_desc,
            field,
            current: default.as_ref(),
        };
        let (cell, description) = define_hook(&request);

        let env_enabled = match field.get_attr("env") {
            Some(_) => parse_bool_attr(path, "env", field)?,
            None => inherited.env_enabled,
        };
        let names = if env_enabled {
            env_names(&self.prefix, path, alias)
        } else {
            Vec::new()
        };

        let group = field
            .get_attr("group")
            .map(str::to_string)
            .or_else(|| inherited.group.clone());

        let flags = cmd.flags_mut();
        if let Some(g) = &group {
            flags.set_annotation(&canonical, "group", vec![g.clone()]);
        }
        if !names.is_empty() {
            flags.set_annotation(&canonical, "env", names.clone());
        }
        if required {
            flags.set_annotation(&canonical, "required", vec!["true".to_string()]);
        }
        flags.set_annotation(&canonical, "decode", vec![kind.tag().to_string()]);

        flags.add(OptionDescriptor {
            name: canonical,
            field_path: path.to_string(),
            short,
            description,
            env_names: names,
            group,
            required,
            kind,
            default,
            cell,
        });
        Ok(())
    }

    /// Resolve the define/decode pair for a leaf. Custom-marked fields use
    /// their registered per-field pair, falling back to the registry; an
    /// incomplete pair is an error. Unmarked fields use the registry alone.
    fn resolve_hooks(
        &mut self,
        cmd: &Command,
        path: &str,
        kind: Kind,
        custom: bool,
    ) -> Result<Option<(DefineHook, DecodeHook)>, OptfigError> {
        if !custom {
            let Some(define) = self.binder.registry.define_for(kind) else {
                return Ok(None);
            };
            let decode = self
                .binder
                .registry
                .decode_for(kind)
                .ok_or_else(|| OptfigError::MissingDecodeHook {
                    field: path.to_string(),
                })?;
            return Ok(Some((define, decode)));
        }

        if let Kind::Custom(tag) = kind {
            self.custom_tags
                .entry(tag)
                .or_default()
                .push(path.to_string());
        }

        let define = self.opts.define_hooks.get(path).cloned();
        let decode = self.opts.decode_hooks.get(path).cloned();
        match (define, decode) {
            (Some(define), Some(decode)) => {
                let scope = self.binder.scopes.scope(cmd.id());
                scope.set_custom_decode(hook_key(cmd.id(), path), decode.clone());
                Ok(Some((define, decode)))
            }
            (Some(_), None) => Err(OptfigError::MissingDecodeHook {
                field: path.to_string(),
            }),
            (None, Some(_)) => Err(OptfigError::MissingDefineHook {
                field: path.to_string(),
            }),
            (None, None) => {
                match (
                    self.binder.registry.define_for(kind),
                    self.binder.registry.decode_for(kind),
                ) {
                    (Some(define), Some(decode)) => Ok(Some((define, decode))),
                    _ => Err(OptfigError::MissingDefinition {
                        field: path.to_string(),
                        kind: kind.tag().to_string(),
                    }),
                }
            }
        }
    }
}

/// Parse a boolean attribute. Anything other than the literal strings
/// `"true"` and `"false"` is reported with the field, attribute, and value.
fn parse_bool_attr(path: &str, attr: &str, field: &FieldSpec) -> Result<bool, OptfigError> {
    match field.get_attr(attr) {
        None => Ok(false),
        Some("true") => Ok(true),
        Some("false") => Ok(false),
        Some(other) => Err(OptfigError::InvalidAttrValue {
            field: path.to_string(),
            attr: attr.to_string(),
            value: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde::{Deserialize, Serialize};
    use toml::Value;

    use super::*;
    use crate::binder::{Binder, DefineOptions};
    use crate::cell::ValueCell;
    use crate::schema::{Bind, SchemaNode};

    #[derive(Serialize, Deserialize)]
    struct Net {
        host: String,
        port: i64,
        database: Db,
    }

    #[derive(Serialize, Deserialize)]
    struct Db {
        url: String,
        pool_size: i64,
    }

    impl Bind for Net {
        fn schema() -> SchemaNode {
            SchemaNode::new(vec![
                FieldSpec::new("Host", Kind::Str)
                    .short('H')
                    .desc("Bind address")
                    .default_value("localhost"),
                FieldSpec::new("Port", Kind::Int).default_value("8080"),
                FieldSpec::nested(
                    "Database",
                    vec![
                        FieldSpec::new("Url", Kind::Str).alias("db-url"),
                        FieldSpec::new("Pool_Size", Kind::Int),
                    ],
                )
                .group("storage"),
            ])
        }
    }

    fn define<C: Bind>(opts: DefineOptions) -> Result<(Binder, Command), OptfigError> {
        let binder = Binder::new();
        let mut cmd = Command::new("myapp");
        binder.define::<C>(&mut cmd, opts)?;
        Ok((binder, cmd))
    }

    #[test]
    fn walk_defines_leaves_with_lowercased_paths() {
        let (_, cmd) = define::<Net>(DefineOptions::new()).unwrap();
        let flags = cmd.flags();
        assert_eq!(flags.len(), 4);
        let host = flags.get("host").unwrap();
        assert_eq!(host.field_path, "host");
        assert_eq!(host.short, Some('H'));
        assert_eq!(host.description, "Bind address");
        let pool = flags.get("database.pool_size").unwrap();
        assert_eq!(pool.field_path, "database.pool_size");
    }

    #[test]
    fn alias_becomes_canonical_name_with_both_env_forms() {
        let (binder, cmd) = define::<Net>(DefineOptions::new()).unwrap();
        let url = cmd.flags().get("db-url").unwrap();
        assert_eq!(url.field_path, "database.url");
        assert_eq!(url.env_names, vec!["MYAPP_DB_URL", "MYAPP_DATABASE_URL"]);
        let aliases = binder.aliases.read().unwrap();
        assert_eq!(aliases.get("db-url").map(String::as_str), Some("database.url"));
    }

    #[test]
    fn defaults_are_decoded_and_seeded() {
        let (binder, cmd) = define::<Net>(DefineOptions::new()).unwrap();
        let port = cmd.flags().get("port").unwrap();
        assert_eq!(port.default, Some(Value::Integer(8080)));
        assert_eq!(port.cell.get(), Some(Value::Integer(8080)));
        let stored = binder
            .scope(&cmd)
            .with_store(|s| s.get("port"));
        assert_eq!(stored, Some(Value::Integer(8080)));
    }

    #[test]
    fn composite_group_propagates_to_children() {
        let (_, cmd) = define::<Net>(DefineOptions::new()).unwrap();
        assert_eq!(
            cmd.flags().get("db-url").unwrap().group.as_deref(),
            Some("storage")
        );
        assert_eq!(cmd.flags().get("host").unwrap().group, None);
        assert_eq!(
            cmd.flags().annotation("db-url", "group"),
            Some(&["storage".to_string()][..])
        );
    }

    #[test]
    fn decode_annotation_carries_kind_tag() {
        let (_, cmd) = define::<Net>(DefineOptions::new()).unwrap();
        assert_eq!(
            cmd.flags().annotation("port", "decode"),
            Some(&["int".to_string()][..])
        );
    }

    #[test]
    fn exclusion_is_case_insensitive_and_matches_alias_or_path() {
        let (_, cmd) =
            define::<Net>(DefineOptions::new().exclude("DB-URL").exclude("database.pool_size"))
                .unwrap();
        assert!(cmd.flags().get("db-url").is_none());
        assert!(cmd.flags().get("database.pool_size").is_none());
        assert_eq!(cmd.flags().len(), 2);
    }

    #[derive(Serialize, Deserialize)]
    struct BadRequired {
        debug: bool,
    }
    impl Bind for BadRequired {
        fn schema() -> SchemaNode {
            SchemaNode::new(vec![FieldSpec::new("Debug", Kind::Bool).attr("required", "yes")])
        }
    }

    #[test]
    fn non_boolean_attr_value_is_reported() {
        let err = define::<BadRequired>(DefineOptions::new()).unwrap_err();
        match err {
            OptfigError::InvalidAttrValue { field, attr, value } => {
                assert_eq!(field, "debug");
                assert_eq!(attr, "required");
                assert_eq!(value, "yes");
            }
            other => panic!("expected InvalidAttrValue, got {other:?}"),
        }
    }

    #[derive(Serialize, Deserialize)]
    struct BadDefault {
        port: i64,
    }
    impl Bind for BadDefault {
        fn schema() -> SchemaNode {
            SchemaNode::new(vec![FieldSpec::new("Port", Kind::Int).default_value("abc")])
        }
    }

    #[derive(Serialize, Deserialize)]
    struct GoodDefault {
        port: i64,
    }
    impl Bind for GoodDefault {
        fn schema() -> SchemaNode {
            SchemaNode::new(vec![FieldSpec::new("Port", Kind::Int).default_value("8080")])
        }
    }

    #[test]
    fn failing_default_does_not_register_the_name() {
        let binder = Binder::new();
        let mut cmd = Command::new("myapp");
        let err = binder
            .define::<BadDefault>(&mut cmd, DefineOptions::new())
            .unwrap_err();
        assert!(matches!(err, OptfigError::Decode { key, .. } if key == "port"));
        // a corrected schema can reuse the name on the same command
        binder
            .define::<GoodDefault>(&mut cmd, DefineOptions::new())
            .unwrap();
        assert!(cmd.flags().get("port").is_some());
    }

    #[derive(Serialize, Deserialize)]
    struct ReqIgnore {
        token: String,
    }
    impl Bind for ReqIgnore {
        fn schema() -> SchemaNode {
            SchemaNode::new(vec![FieldSpec::new("Token", Kind::Str)
                .required(true)
                .ignore(true)])
        }
    }

    #[test]
    fn required_and_ignore_conflict() {
        let err = define::<ReqIgnore>(DefineOptions::new()).unwrap_err();
        assert!(matches!(err, OptfigError::ConflictingAttrs { field } if field == "token"));
    }

    #[derive(Serialize, Deserialize)]
    struct Ignored {
        secret: String,
        host: String,
    }
    impl Bind for Ignored {
        fn schema() -> SchemaNode {
            SchemaNode::new(vec![
                FieldSpec::new("Secret", Kind::Str).ignore(true),
                FieldSpec::new("Host", Kind::Str),
            ])
        }
    }

    #[test]
    fn ignored_field_defines_nothing() {
        let (_, cmd) = define::<Ignored>(DefineOptions::new()).unwrap();
        assert!(cmd.flags().get("secret").is_none());
        assert!(cmd.flags().get("host").is_some());
    }

    #[derive(Serialize, Deserialize)]
    struct LongShort {
        host: String,
    }
    impl Bind for LongShort {
        fn schema() -> SchemaNode {
            SchemaNode::new(vec![FieldSpec::new("Host", Kind::Str).attr("short", "ho")])
        }
    }

    #[test]
    fn multi_char_short_is_rejected() {
        let err = define::<LongShort>(DefineOptions::new()).unwrap_err();
        assert!(matches!(err, OptfigError::InvalidShort { value, .. } if value == "ho"));
    }

    #[derive(Serialize, Deserialize)]
    struct ShortOnComposite {
        database: Db,
    }
    impl Bind for ShortOnComposite {
        fn schema() -> SchemaNode {
            SchemaNode::new(vec![FieldSpec::nested(
                "Database",
                vec![FieldSpec::new("Url", Kind::Str)],
            )
            .attr("short", "d")])
        }
    }

    #[test]
    fn short_on_composite_is_rejected() {
        let err = define::<ShortOnComposite>(DefineOptions::new()).unwrap_err();
        assert!(matches!(
            err,
            OptfigError::AttrNotAllowedOnComposite { attr: "short", .. }
        ));
    }

    #[derive(Serialize, Deserialize)]
    struct BadAlias {
        host: String,
    }
    impl Bind for BadAlias {
        fn schema() -> SchemaNode {
            SchemaNode::new(vec![FieldSpec::new("Host", Kind::Str).alias("bad name")])
        }
    }

    #[test]
    fn alias_must_match_name_grammar() {
        let err = define::<BadAlias>(DefineOptions::new()).unwrap_err();
        assert!(matches!(err, OptfigError::InvalidName { name, .. } if name == "bad name"));
    }

    #[derive(Serialize, Deserialize)]
    struct Colliding {
        server: Host,
        proxy: Host,
    }
    #[derive(Serialize, Deserialize)]
    struct Host {
        addr: String,
    }
    impl Bind for Colliding {
        fn schema() -> SchemaNode {
            SchemaNode::new(vec![
                FieldSpec::nested("Server", vec![FieldSpec::new("Addr", Kind::Str).alias("addr")]),
                FieldSpec::nested("Proxy", vec![FieldSpec::new("Addr", Kind::Str).alias("addr")]),
            ])
        }
    }

    #[test]
    fn duplicate_canonical_names_report_both_fields() {
        let err = define::<Colliding>(DefineOptions::new()).unwrap_err();
        match err {
            OptfigError::DuplicateOption { name, field, existing } => {
                assert_eq!(name, "addr");
                assert_eq!(field, "proxy.addr");
                assert_eq!(existing, "server.addr");
            }
            other => panic!("expected DuplicateOption, got {other:?}"),
        }
    }

    #[derive(Serialize, Deserialize)]
    struct WithTls {
        tls: String,
    }
    impl Bind for WithTls {
        fn schema() -> SchemaNode {
            SchemaNode::new(vec![FieldSpec::new("Tls", Kind::Custom("tls")).custom(true)])
        }
    }

    fn tls_define() -> DefineHook {
        Arc::new(|req| (ValueCell::new(), format!("{} [tls]", req.description)))
    }

    fn tls_decode() -> DecodeHook {
        Arc::new(|raw| match raw {
            Value::String(s) => Ok(Value::String(s.to_uppercase())),
            other => Ok(other.clone()),
        })
    }

    #[test]
    fn custom_field_uses_registered_pair() {
        let (binder, cmd) = define::<WithTls>(
            DefineOptions::new()
                .define_hook("tls", tls_define())
                .decode_hook("tls", tls_decode()),
        )
        .unwrap();
        let opt = cmd.flags().get("tls").unwrap();
        assert!(opt.description.ends_with("[tls]"));
        let scope = binder.scope(&cmd);
        assert!(scope.custom_decode(&hook_key(cmd.id(), "tls")).is_some());
    }

    #[test]
    fn custom_field_with_only_define_hook_fails_naming_decode() {
        let err =
            define::<WithTls>(DefineOptions::new().define_hook("tls", tls_define())).unwrap_err();
        assert!(matches!(err, OptfigError::MissingDecodeHook { field } if field == "tls"));
    }

    #[test]
    fn custom_field_with_only_decode_hook_fails_naming_define() {
        let err =
            define::<WithTls>(DefineOptions::new().decode_hook("tls", tls_decode())).unwrap_err();
        assert!(matches!(err, OptfigError::MissingDefineHook { field } if field == "tls"));
    }

    #[test]
    fn custom_field_without_hooks_or_registry_entry_fails() {
        let err = define::<WithTls>(DefineOptions::new()).unwrap_err();
        assert!(matches!(
            err,
            OptfigError::MissingDefinition { field, kind } if field == "tls" && kind == "tls"
        ));
    }

    #[test]
    fn custom_field_falls_back_to_registry_entry() {
        let mut registry = crate::hooks::HookRegistry::builtin();
        registry.register("tls", tls_define(), tls_decode());
        let binder = Binder::with_registry(registry);
        let mut cmd = Command::new("myapp");
        binder.define::<WithTls>(&mut cmd, DefineOptions::new()).unwrap();
        assert!(cmd.flags().get("tls").is_some());
    }

    #[derive(Serialize, Deserialize)]
    struct TwoTls {
        server_tls: String,
        proxy_tls: String,
    }
    impl Bind for TwoTls {
        fn schema() -> SchemaNode {
            SchemaNode::new(vec![
                FieldSpec::new("Server_Tls", Kind::Custom("tls")).custom(true),
                FieldSpec::new("Proxy_Tls", Kind::Custom("tls")).custom(true),
            ])
        }
    }

    #[test]
    fn shared_custom_tag_is_ambiguous() {
        let err = define::<TwoTls>(
            DefineOptions::new()
                .define_hook("server_tls", tls_define())
                .decode_hook("server_tls", tls_decode())
                .define_hook("proxy_tls", tls_define())
                .decode_hook("proxy_tls", tls_decode()),
        )
        .unwrap_err();
        match err {
            OptfigError::AmbiguousCustomType { type_tag, fields } => {
                assert_eq!(type_tag, "tls");
                assert_eq!(fields.len(), 2);
            }
            other => panic!("expected AmbiguousCustomType, got {other:?}"),
        }
    }

    #[derive(Serialize, Deserialize)]
    struct EnvOptOut {
        token: String,
        host: String,
    }
    impl Bind for EnvOptOut {
        fn schema() -> SchemaNode {
            SchemaNode::new(vec![
                FieldSpec::new("Token", Kind::Str).env(false),
                FieldSpec::new("Host", Kind::Str),
            ])
        }
    }

    #[test]
    fn env_false_suppresses_env_names() {
        let (_, cmd) = define::<EnvOptOut>(DefineOptions::new()).unwrap();
        assert!(cmd.flags().get("token").unwrap().env_names.is_empty());
        assert_eq!(
            cmd.flags().get("host").unwrap().env_names,
            vec!["MYAPP_HOST"]
        );
        assert_eq!(cmd.flags().annotation("token", "env"), None);
    }

    #[test]
    fn inherited_env_prefix_replaces_global_for_the_pass() {
        let binder = Binder::new();
        binder.set_app_name("myapp");
        let mut cmd = Command::new("myapp");
        binder
            .define::<EnvOptOut>(&mut cmd, DefineOptions::new().env_prefix("plugin"))
            .unwrap();
        assert_eq!(
            cmd.flags().get("host").unwrap().env_names,
            vec!["PLUGIN_HOST"]
        );
    }

    #[test]
    fn inherited_prefix_equal_to_global_is_not_doubled() {
        let binder = Binder::new();
        binder.set_app_name("myapp");
        let mut cmd = Command::new("myapp");
        binder
            .define::<EnvOptOut>(&mut cmd, DefineOptions::new().env_prefix("MyApp"))
            .unwrap();
        assert_eq!(
            cmd.flags().get("host").unwrap().env_names,
            vec!["MYAPP_HOST"]
        );
    }
}
