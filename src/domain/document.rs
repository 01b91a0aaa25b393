//! Publishable documents as handed over by the CMS lifecycle hooks.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Draft/publish state of a document.
///
/// Only `published` carries meaning for revalidation. Unknown states are
/// kept verbatim so a document round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DocumentStatus {
    /// Saved but not visible on the public site
    Draft,

    /// Visible on the public site
    Published,

    /// Any other state reported by the CMS
    Other(String),
}

impl DocumentStatus {
    pub fn is_published(&self) -> bool {
        matches!(self, DocumentStatus::Published)
    }

    pub fn as_str(&self) -> &str {
        match self {
            DocumentStatus::Draft => "draft",
            DocumentStatus::Published => "published",
            DocumentStatus::Other(s) => s.as_str(),
        }
    }
}

impl From<String> for DocumentStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "draft" => DocumentStatus::Draft,
            "published" => DocumentStatus::Published,
            _ => DocumentStatus::Other(s),
        }
    }
}

impl From<DocumentStatus> for String {
    fn from(status: DocumentStatus) -> Self {
        match status {
            DocumentStatus::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of an article before or after a change.
///
/// Serializes back to the JSON it was read from: absent keys stay absent
/// and an explicit `null` stays `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishableDocument {
    /// Public identifier, `home` is the site root. `Some(None)` is an explicit null.
    #[serde(
        default,
        deserialize_with = "deserialize_explicit",
        skip_serializing_if = "Option::is_none"
    )]
    pub slug: Option<Option<String>>,

    /// Draft/publish state (`_status` in the CMS payload), absent or null counts as unpublished
    #[serde(
        rename = "_status",
        default,
        deserialize_with = "deserialize_explicit",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<Option<DocumentStatus>>,

    /// Remaining fields, passed through untouched
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Present keys become `Some`, so a `null` value is told apart from a missing key
fn deserialize_explicit<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl PublishableDocument {
    /// Create a document with no extra fields
    pub fn new(slug: impl Into<String>, status: DocumentStatus) -> Self {
        Self {
            slug: Some(Some(slug.into())),
            status: Some(Some(status)),
            fields: Map::new(),
        }
    }

    /// Attach an extra field
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn slug(&self) -> Option<&str> {
        self.slug.as_ref().and_then(|s| s.as_deref())
    }

    pub fn status(&self) -> Option<&DocumentStatus> {
        self.status.as_ref().and_then(|s| s.as_ref())
    }

    pub fn is_published(&self) -> bool {
        self.status().is_some_and(DocumentStatus::is_published)
    }
}
