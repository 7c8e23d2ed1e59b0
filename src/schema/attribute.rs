use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Deserializer, Serialize};

/// One attribute declared under `properties.credentialSubject.properties`.
///
/// `id` is never read from the attribute body; it is always the property key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attribute {
    #[serde(skip_deserializing)]
    pub id: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(rename = "type", deserialize_with = "null_as_empty")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub format: String,
}

/// An explicit `null` is treated like an absent field.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.title.is_empty() {
            f.write_str(&self.id)
        } else {
            write!(f, "{}({})", self.title, self.id)
        }
    }
}

/// Attributes extracted from a schema. Order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Attributes(Vec<Attribute>);

impl Attributes {
    pub fn new(attributes: Vec<Attribute>) -> Self {
        Self(attributes)
    }

    pub fn get(&self, id: &str) -> Option<&Attribute> {
        self.0.iter().find(|a| a.id == id)
    }

    /// Display names (`title(id)` or `id`) for every attribute.
    pub fn schema_attrs(&self) -> Vec<String> {
        self.0.iter().map(Attribute::to_string).collect()
    }

    pub fn into_inner(self) -> Vec<Attribute> {
        self.0
    }
}

impl Deref for Attributes {
    type Target = [Attribute];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl IntoIterator for Attributes {
    type Item = Attribute;
    type IntoIter = std::vec::IntoIter<Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
