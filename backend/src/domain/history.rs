//! Generation history records.
//!
//! A record is written once, after the document builder accepted a request,
//! and is never mutated. Every read and delete is scoped to the owning user.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use super::source_structure::ExtractionSummary;
use super::user::UserId;

/// Identifier of a stored history record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HistoryRecordId(Uuid);

impl HistoryRecordId {
    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an already-parsed UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse a client-supplied identifier; malformed input yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for HistoryRecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Output document format requested from the builder.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Docx,
    Pdf,
    Pptx,
}

impl OutputFormat {
    /// Every supported format.
    pub const ALL: [Self; 3] = [Self::Docx, Self::Pdf, Self::Pptx];

    /// Lower-case wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Docx => "docx",
            Self::Pdf => "pdf",
            Self::Pptx => "pptx",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a format name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported output format '{0}'; expected docx, pdf or pptx")]
pub struct UnknownOutputFormat(pub String);

impl FromStr for OutputFormat {
    type Err = UnknownOutputFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        Self::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(token))
            .ok_or_else(|| UnknownOutputFormat(s.to_owned()))
    }
}

/// Artefact locators returned by the builder, keyed by format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = BTreeMap<String, String>)]
pub struct GeneratedArtifacts(BTreeMap<OutputFormat, String>);

impl GeneratedArtifacts {
    /// Collect the string entries for known formats from a builder response.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{GeneratedArtifacts, OutputFormat};
    /// use serde_json::json;
    ///
    /// let artifacts = GeneratedArtifacts::from_builder_response(&json!({
    ///     "diagrams_count": 2,
    ///     "docx": "report.docx",
    ///     "pdf": null,
    /// }));
    /// assert_eq!(artifacts.get(OutputFormat::Docx), Some("report.docx"));
    /// assert_eq!(artifacts.get(OutputFormat::Pdf), None);
    /// ```
    pub fn from_builder_response(response: &Value) -> Self {
        let entries = OutputFormat::ALL
            .into_iter()
            .filter_map(|format| {
                response
                    .get(format.as_str())
                    .and_then(Value::as_str)
                    .map(|locator| (format, locator.to_owned()))
            })
            .collect();
        Self(entries)
    }

    /// Locator for one format, if the builder produced it.
    pub fn get(&self, format: OutputFormat) -> Option<&str> {
        self.0.get(&format).map(String::as_str)
    }

    /// Iterate over the produced artefacts.
    pub fn iter(&self) -> impl Iterator<Item = (OutputFormat, &str)> {
        self.0.iter().map(|(format, locator)| (*format, locator.as_str()))
    }

    /// True when the builder produced no artefacts.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(OutputFormat, String)> for GeneratedArtifacts {
    fn from_iter<T: IntoIterator<Item = (OutputFormat, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Persisted log entry of one completed generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecord {
    pub id: HistoryRecordId,
    pub user_id: UserId,
    pub file_name: String,
    pub format: OutputFormat,
    pub summary: ExtractionSummary,
    pub instructions: String,
    pub artifacts: GeneratedArtifacts,
    pub created_at: DateTime<Utc>,
}
