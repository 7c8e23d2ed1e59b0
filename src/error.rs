use serde::Serialize;

/// App-wide error type. Every fallible function returns `Result<T, AppError>`.
/// Serializes as `{ error, kind }` so callers presenting errors get a stable tag.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A required level of the schema document is missing or not an object.
    #[error("missing {0} field")]
    SchemaStructure(String),

    #[error("parsing attribute <{key}>: {source}")]
    Decoding {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Schema loader error: {0}")]
    Loader(String),

    #[error("attribute not found in schema: {0}")]
    AttributeNotFound(String),

    #[error("attribute defined more than once in schema: {0}")]
    DuplicateAttribute(String),

    #[error("error converting the attribute: {0}")]
    TypeMismatch(String),

    #[error("error converting the attribute: {name}. Must be {expected}")]
    Parse { name: String, expected: &'static str },

    #[error("error converting the attribute: {name}. type not supported: {kind}")]
    UnsupportedType { name: String, kind: String },

    #[error("the number of attributes is not valid ({remaining} schema attributes left unmatched, expected 1)")]
    CountMismatch { remaining: usize },

    #[error("error open connection with database: {0}")]
    Connection(String),

    #[error("error setting dialect: {0}")]
    Dialect(String),

    #[error("error trying to run migrations: {0}")]
    Migration(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl AppError {
    /// Stable snake_case tag for the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::SchemaStructure(_) => "schema_structure",
            AppError::Decoding { .. } => "decoding",
            AppError::InvalidSchema(_) => "invalid_schema",
            AppError::Loader(_) => "loader",
            AppError::AttributeNotFound(_) => "attribute_not_found",
            AppError::DuplicateAttribute(_) => "duplicate_attribute",
            AppError::TypeMismatch(_) => "type_mismatch",
            AppError::Parse { .. } => "parse",
            AppError::UnsupportedType { .. } => "unsupported_type",
            AppError::CountMismatch { .. } => "count_mismatch",
            AppError::Connection(_) => "connection",
            AppError::Dialect(_) => "dialect",
            AppError::Migration(_) => "migration",
            AppError::Config(_) => "config",
            AppError::Validation(_) => "validation",
            AppError::Io(_) => "io",
            AppError::Serde(_) => "serde",
        }
    }
}

/// We serialize as `{ error: "...", kind: "..." }` for API consumers.
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("AppError", 2)?;
        s.serialize_field("error", &self.to_string())?;
        s.serialize_field("kind", self.kind())?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_message_and_kind() {
        let err = AppError::AttributeNotFound("age".into());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "attribute_not_found");
        assert_eq!(json["error"], "attribute not found in schema: age");
    }

    #[test]
    fn test_schema_structure_message_names_path() {
        let err = AppError::SchemaStructure("properties.credentialSubject".into());
        assert_eq!(err.to_string(), "missing properties.credentialSubject field");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: AppError = io.into();
        assert_eq!(err.kind(), "io");
    }
}
