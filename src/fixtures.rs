//! Shared test fixtures: small destination types with representative
//! schemas, used across the engine's test modules.

pub mod test {
    use serde::{Deserialize, Serialize};
    use toml::Value;

    use crate::command::CommandContext;
    use crate::schema::{Bind, FieldSpec, Kind, SchemaNode};

    /// The everyday case: scalars, typed kinds, a nested section with an
    /// aliased field, defaults everywhere.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct ServerConfig {
        pub host: String,
        pub port: i64,
        pub debug: bool,
        pub log_level: String,
        pub timeout: i64,
        pub tags: Vec<String>,
        pub database: Database,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Database {
        pub url: String,
        pub pool_size: i64,
    }

    impl Bind for ServerConfig {
        fn schema() -> SchemaNode {
            SchemaNode::new(vec![
                FieldSpec::new("Host", Kind::Str)
                    .short('H')
                    .desc("Address to bind")
                    .default_value("localhost"),
                FieldSpec::new("Port", Kind::Int)
                    .short('p')
                    .desc("Port to listen on")
                    .default_value("8080"),
                FieldSpec::new("Debug", Kind::Bool).default_value("false"),
                FieldSpec::new("Log_Level", Kind::LogLevel)
                    .desc("Log verbosity")
                    .default_value("info"),
                FieldSpec::new("Timeout", Kind::Duration).default_value("30s"),
                FieldSpec::new("Tags", Kind::StringList).default_value(""),
                FieldSpec::nested(
                    "Database",
                    vec![
                        FieldSpec::new("Url", Kind::Str)
                            .alias("db-url")
                            .default_value("pg://localhost"),
                        FieldSpec::new("Pool_Size", Kind::Int).default_value("5"),
                    ],
                ),
            ])
        }
    }

    /// A mandatory field with no default: resolution must fail unless some
    /// layer supplies it.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct DeployConfig {
        pub target: String,
        pub replicas: i64,
    }

    impl Bind for DeployConfig {
        fn schema() -> SchemaNode {
            SchemaNode::new(vec![
                FieldSpec::new("Target", Kind::Str)
                    .desc("Deployment target")
                    .required(true),
                FieldSpec::new("Replicas", Kind::Int).default_value("1"),
            ])
        }
    }

    /// Exercises the lifecycle capabilities: context contribution,
    /// post-decode transform, semantic validation.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct ReleaseConfig {
        pub channel: String,
        pub version: String,
    }

    impl Bind for ReleaseConfig {
        fn schema() -> SchemaNode {
            SchemaNode::new(vec![
                FieldSpec::new("Channel", Kind::Str).default_value("stable"),
                FieldSpec::new("Version", Kind::Str).default_value("v1"),
            ])
        }

        fn context(&self, cx: &mut CommandContext) {
            cx.insert("channel", Value::String(self.channel.clone()));
        }

        fn transform(&mut self) -> Result<(), String> {
            if self.channel == "invalid" {
                return Err(format!("unknown channel '{}'", self.channel));
            }
            self.channel = self.channel.to_lowercase();
            Ok(())
        }

        fn validate(&self) -> Vec<String> {
            let mut errors = Vec::new();
            if !self.version.starts_with('v') {
                errors.push(format!("version '{}' must start with 'v'", self.version));
            }
            errors
        }
    }
}
