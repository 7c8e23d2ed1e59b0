pub mod attribute;
pub mod convert;
pub mod hash;
pub mod loader;

use serde_json::{Map, Value};

use crate::error::AppError;
use crate::validation;

pub use attribute::{Attribute, Attributes};
pub use convert::{AttributeValue, ConvertedAttribute, CredentialAttribute};
pub use hash::SchemaHash;
pub use loader::SchemaLoader;

/// A loaded credential JSON Schema. Read-only after load.
#[derive(Debug, Clone)]
pub struct JsonSchema {
    content: Map<String, Value>,
}

impl JsonSchema {
    /// Fetch and parse a schema document.
    pub async fn load(loader: &dyn SchemaLoader) -> Result<Self, AppError> {
        tracing::debug!(source = %loader.source(), "Loading credential schema");
        let raw = loader.load().await?;
        Self::from_slice(&raw)
    }

    pub fn from_slice(raw: &[u8]) -> Result<Self, AppError> {
        let value: Value = serde_json::from_slice(raw)?;
        Self::from_value(value)
    }

    /// The document must be a JSON object. Structure is checked lazily by
    /// the accessors so each one reports the path it needed.
    pub fn from_value(value: Value) -> Result<Self, AppError> {
        match value {
            Value::Object(content) => Ok(Self { content }),
            _ => Err(AppError::InvalidSchema("schema document must be a JSON object".into())),
        }
    }

    /// Check the document against its JSON Schema meta-schema.
    pub fn check_meta_schema(&self) -> Result<(), AppError> {
        jsonschema::validator_for(&Value::Object(self.content.clone()))
            .map(|_| ())
            .map_err(|e| AppError::InvalidSchema(e.to_string()))
    }

    pub fn content(&self) -> &Map<String, Value> {
        &self.content
    }

    /// Attributes declared in `properties.credentialSubject.properties`.
    pub fn attributes(&self) -> Result<Attributes, AppError> {
        let props = self.credential_subject_properties()?;
        if props.is_empty() {
            return Err(AppError::Validation(
                "properties.credentialSubject.properties declares no attributes".into(),
            ));
        }

        let mut attrs = Vec::with_capacity(props.len());
        for (id, prop) in props {
            validation::require_attribute_id(id)?;
            let mut attr: Attribute =
                serde_json::from_value(prop.clone()).map_err(|source| AppError::Decoding {
                    key: id.clone(),
                    source,
                })?;
            attr.id = id.clone();
            attrs.push(attr);
        }
        Ok(Attributes::new(attrs))
    }

    /// `$metadata.uris.jsonLdContext`
    pub fn json_ld_context(&self) -> Result<&str, AppError> {
        let metadata = object_at(&self.content, "$metadata", "$metadata")?;
        let uris = object_at(metadata, "uris", "$metadata.uris")?;
        uris.get("jsonLdContext")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::SchemaStructure("$metadata.uris.jsonLdContext".into()))
    }

    /// Hash of `"<jsonLdContext>#<schema_type>"`.
    pub fn schema_hash(&self, schema_type: &str) -> Result<SchemaHash, AppError> {
        validation::require_non_empty("schema_type", schema_type)?;
        let context = self.json_ld_context()?;
        let id = format!("{context}#{schema_type}");
        Ok(SchemaHash::from_identifier(id.as_bytes()))
    }

    /// Validate caller-supplied attributes against this schema and convert
    /// their values to the declared types.
    pub fn validate_and_convert(
        &self,
        attributes: Vec<CredentialAttribute>,
    ) -> Result<Vec<ConvertedAttribute>, AppError> {
        let descriptors = self.attributes()?;
        convert::validate_and_convert(&descriptors, attributes)
    }

    /// Validate an assembled credential subject against the
    /// `properties.credentialSubject` sub-schema.
    ///
    /// The root `$schema`, `definitions` and `$defs` are carried into the
    /// sub-schema so the draft is kept and local `$ref`s still resolve.
    pub fn validate_credential_subject(&self, subject: &Value) -> Result<(), AppError> {
        let properties = object_at(&self.content, "properties", "properties")?;
        let mut credential_subject =
            object_at(properties, "credentialSubject", "properties.credentialSubject")?.clone();
        for key in ["$schema", "definitions", "$defs"] {
            if let Some(root_value) = self.content.get(key) {
                credential_subject
                    .entry(key)
                    .or_insert_with(|| root_value.clone());
            }
        }

        let validator = jsonschema::validator_for(&Value::Object(credential_subject))
            .map_err(|e| AppError::InvalidSchema(e.to_string()))?;

        let errors: Vec<String> = validator.iter_errors(subject).map(|e| e.to_string()).collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors.join("; ")))
        }
    }

    fn credential_subject_properties(&self) -> Result<&Map<String, Value>, AppError> {
        let properties = object_at(&self.content, "properties", "properties")?;
        let credential_subject =
            object_at(properties, "credentialSubject", "properties.credentialSubject")?;
        object_at(
            credential_subject,
            "properties",
            "properties.credentialSubject.properties",
        )
    }
}

fn object_at<'a>(
    map: &'a Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, AppError> {
    map.get(key)
        .and_then(Value::as_object)
        .ok_or_else(|| AppError::SchemaStructure(path.to_string()))
}
