use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptfigError {
    // --- Metadata errors ---
    #[error("field '{field}': attribute '{attr}' has non-boolean value '{value}'")]
    InvalidAttrValue {
        field: String,
        attr: String,
        value: String,
    },

    #[error("field '{field}': 'required' and 'ignore' cannot be combined")]
    ConflictingAttrs { field: String },

    #[error("field '{field}': attribute '{attr}' is not valid on a composite field")]
    AttrNotAllowedOnComposite { field: String, attr: &'static str },

    #[error("field '{field}': name '{name}' does not match the option-name grammar (alphanumeric segments joined by '.' or '-')")]
    InvalidName { field: String, name: String },

    #[error("field '{field}': short alias '{value}' must be a single character")]
    InvalidShort { field: String, value: String },

    // --- Structural errors ---
    #[error("duplicate option '{name}': field '{field}' collides with previously defined field '{existing}'")]
    DuplicateOption {
        name: String,
        field: String,
        existing: String,
    },

    #[error("ambiguous custom type '{type_tag}' shared by fields: {}", fields.join(", "))]
    AmbiguousCustomType {
        type_tag: String,
        fields: Vec<String>,
    },

    // --- Hook errors ---
    #[error("custom field '{field}' has a define hook but no decode hook — register one with decode_hook(\"{field}\", ...)")]
    MissingDecodeHook { field: String },

    #[error("custom field '{field}' has a decode hook but no define hook — register one with define_hook(\"{field}\", ...)")]
    MissingDefineHook { field: String },

    #[error("custom field '{field}' of type '{kind}' has no hook pair and no registry entry")]
    MissingDefinition { field: String, kind: String },

    // --- Decode errors ---
    #[error("failed to decode '{key}' from '{value}': {reason}")]
    Decode {
        key: String,
        value: String,
        reason: String,
    },

    #[error("unmarshal failed at {stage}: {source}")]
    Unmarshal {
        stage: &'static str,
        #[source]
        source: Box<OptfigError>,
    },

    #[error("unmarshal failed at {stage}: {reason}")]
    Deserialize { stage: &'static str, reason: String },

    // --- Lifecycle errors ---
    #[error("transform failed for command '{command}': {reason}")]
    Transform { command: String, reason: String },

    #[error("validation failed for command '{command}': {}", errors.join("; "))]
    Validation {
        command: String,
        errors: Vec<String>,
    },

    // --- Input errors ---
    #[error("schema for '{type_name}' declares no fields")]
    EmptySchema { type_name: String },

    #[error("required option '{name}' on command '{command}' was not provided by any source")]
    MissingRequired { name: String, command: String },
}

impl OptfigError {
    /// Wrap an error with the unmarshal stage it surfaced in.
    pub(crate) fn at_stage(self, stage: &'static str) -> Self {
        OptfigError::Unmarshal {
            stage,
            source: Box::new(self),
        }
    }
}
