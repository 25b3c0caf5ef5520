// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the conversion workflow.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::{ErrorCategory, HubError, Result, ValidationError};

/// Unique identifier for a conversion session (used in logs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Input sources
// ---------------------------------------------------------------------------

/// A file the user picked or dropped, with its declared media type.
///
/// The bytes are shared, so cloning a source never copies the document.
#[derive(Clone, PartialEq, Eq)]
pub struct FileSource {
    pub name: String,
    /// Declared media type (may be empty when the platform gives none).
    pub media_type: String,
    pub bytes: Arc<[u8]>,
}

impl FileSource {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes: Arc::from(bytes),
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// SHA-256 of the contents, for correlating log lines.
    pub fn fingerprint(&self) -> String {
        crate::integrity::document_fingerprint(&self.bytes)
    }
}

impl std::fmt::Debug for FileSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSource")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// The single active input of a conversion. At most one kind is ever set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InputSource {
    #[default]
    None,
    File(FileSource),
    /// A video link. May hold text that failed shape validation so the
    /// user can see and correct what they typed.
    RemoteVideo { url: String },
}

impl InputSource {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Short label for status lines and logs.
    pub fn display_name(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::File(file) => Some(&file.name),
            Self::RemoteVideo { url } => Some(url),
        }
    }
}

/// Everything the service needs for one submission. Built right before
/// sending and never stored.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub source: InputSource,
    pub language: String,
}

// ---------------------------------------------------------------------------
// Conversion results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversionStatus {
    Completed,
    Failed,
}

/// Why a conversion did not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// The request could not be built from the source.
    Invalid(ValidationError),
    /// No response, or a response that could not be read.
    Transport(String),
    /// Non-2xx HTTP status.
    Http { status: u16 },
    /// 2xx, but the status discriminator was not "completed".
    Rejected { status: Option<String> },
}

/// Artifact-level problems that leave the rest of a conversion usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactWarning {
    /// The report field was present but not a valid report.
    ReportCorrupt(String),
    /// The service returned no report at all.
    ReportMissing,
    /// The simplified content body could not be retrieved.
    ContentUnavailable(String),
}

/// Typed outcome of one submission. Fields not meaningful for the status
/// stay `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub status: ConversionStatus,
    pub failure: Option<FailureKind>,
    pub task_id: Option<String>,
    pub simplified_content_ref: Option<String>,
    pub audio_ref: Option<String>,
    pub epub_ref: Option<String>,
    pub pdf_ref: Option<String>,
    pub report: Option<AccessibilityReport>,
    /// Message supplied by the service, if any.
    pub message: Option<String>,
    /// Body of the simplified content, filled in by the secondary retrieval.
    pub content_body: Option<String>,
    pub warnings: Vec<ArtifactWarning>,
}

impl ConversionResult {
    /// An empty completed result; callers fill in the references they got.
    pub fn completed() -> Self {
        Self {
            status: ConversionStatus::Completed,
            failure: None,
            task_id: None,
            simplified_content_ref: None,
            audio_ref: None,
            epub_ref: None,
            pdf_ref: None,
            report: None,
            message: None,
            content_body: None,
            warnings: Vec::new(),
        }
    }

    pub fn failed(kind: FailureKind, message: Option<String>) -> Self {
        Self {
            status: ConversionStatus::Failed,
            failure: Some(kind),
            message,
            ..Self::completed()
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == ConversionStatus::Completed
    }

    /// The error this result represents, or `None` for a completed result.
    pub fn to_error(&self) -> Option<HubError> {
        let kind = self.failure.as_ref()?;
        Some(match kind {
            FailureKind::Invalid(v) => HubError::Validation(v.clone()),
            FailureKind::Transport(detail) => HubError::Transport(detail.clone()),
            FailureKind::Http { status } => HubError::Service {
                status: Some(*status),
                message: self.message.clone(),
            },
            FailureKind::Rejected { .. } => HubError::Service {
                status: None,
                message: self.message.clone(),
            },
        })
    }
}

// ---------------------------------------------------------------------------
// Accessibility report
// ---------------------------------------------------------------------------

/// Structure keys carried by the report but never listed as rows.
pub const RESERVED_STRUCTURE_KEYS: [&str; 2] = ["note", "alt_missing_count"];

/// Structured accessibility report. All values are opaque display strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessibilityReport {
    pub summary_score: String,
    #[serde(default, deserialize_with = "display_strings")]
    pub readability_metrics: IndexMap<String, String>,
    #[serde(default, deserialize_with = "display_strings")]
    pub structure_analysis: IndexMap<String, String>,
}

impl AccessibilityReport {
    /// Decode the JSON-encoded report string carried in the upload response.
    pub fn decode(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| HubError::ArtifactDecode(format!("report: {e}")))
    }

    /// Whether the grade token at the start of the summary is `PASS`.
    pub fn is_pass(&self) -> bool {
        self.summary_score.starts_with("PASS")
    }

    pub fn readability_rows(&self) -> impl Iterator<Item = (&str, &str)> {
        self.readability_metrics
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Structure rows in service order, without the reserved keys.
    pub fn structure_rows(&self) -> impl Iterator<Item = (&str, &str)> {
        self.structure_analysis
            .iter()
            .filter(|(k, _)| !RESERVED_STRUCTURE_KEYS.contains(&k.as_str()))
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn note(&self) -> Option<&str> {
        self.structure_analysis.get("note").map(String::as_str)
    }
}

/// `flesch_kincaid_grade` → `Flesch kincaid grade`.
pub fn display_label(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn display_strings<'de, D>(deserializer: D) -> std::result::Result<IndexMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = IndexMap::<String, serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(key, value)| {
            let shown = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Null => "N/A".to_owned(),
                other => other.to_string(),
            };
            (key, shown)
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Session and settings state
// ---------------------------------------------------------------------------

/// Lifecycle phases of a conversion session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// No submission in flight. A source may or may not be selected.
    Idle,
    /// Checking the source before sending.
    Validating,
    /// Waiting on the upload round trip.
    Submitting,
    /// Upload completed, fetching the simplified content body.
    AwaitingArtifacts,
    /// Artifacts attached to the result.
    Ready,
    /// Validation, transport or service failure.
    Errored,
}

impl SessionPhase {
    /// A submission is outstanding; another must be refused.
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Validating | Self::Submitting | Self::AwaitingArtifacts)
    }
}

/// Tone of a status line, tagged with the error category where relevant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusKind {
    #[default]
    Neutral,
    Info,
    Success,
    Warning(ErrorCategory),
    Error(ErrorCategory),
}

/// The one status line shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
    /// Whether trying the same thing again could help.
    pub retriable: bool,
}

impl StatusMessage {
    pub fn new(kind: StatusKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            retriable: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Append a parenthetical qualifier, e.g. a degraded artifact note.
    pub fn qualify(&mut self, qualifier: &str) {
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(qualifier);
    }
}

/// Snapshot of a conversion session.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub id: SessionId,
    pub phase: SessionPhase,
    pub source: InputSource,
    pub result: Option<ConversionResult>,
    pub status: StatusMessage,
    pub language: String,
    pub updated_at: DateTime<Utc>,
}

impl SessionState {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            id: SessionId::new(),
            phase: SessionPhase::Idle,
            source: InputSource::None,
            result: None,
            status: StatusMessage::default(),
            language: language.into(),
            updated_at: Utc::now(),
        }
    }
}

/// Display adaptations chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccessibilityState {
    pub dyslexic_font_enabled: bool,
    pub high_contrast_enabled: bool,
    pub color_inverted_enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_REPORT: &str = r#"{
        "summary_score": "PASS (Meets MVP baseline for structure/readability)",
        "readability_metrics": {
            "flesch_kincaid_grade": "6.1 (Target: Grade 8 or below)",
            "automated_readability_index": "7.20",
            "average_sentence_length": "11.50"
        },
        "structure_analysis": {
            "heading_structure_status": "Missing",
            "alt_text_status": "1/1 Expected ALT Placeholders Found",
            "alt_missing_count": 0,
            "note": "Contrast/Color checks require specific styling data."
        }
    }"#;

    #[test]
    fn report_decodes_and_passes() {
        let report = AccessibilityReport::decode(SAMPLE_REPORT).expect("decode");
        assert!(report.is_pass());
        assert_eq!(report.readability_metrics.len(), 3);
    }

    #[test]
    fn report_rows_keep_service_order() {
        let report = AccessibilityReport::decode(SAMPLE_REPORT).expect("decode");
        let keys: Vec<&str> = report.readability_rows().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            ["flesch_kincaid_grade", "automated_readability_index", "average_sentence_length"]
        );
    }

    #[test]
    fn structure_rows_hide_reserved_keys() {
        let report = AccessibilityReport::decode(SAMPLE_REPORT).expect("decode");
        let keys: Vec<&str> = report.structure_rows().map(|(k, _)| k).collect();
        assert_eq!(keys, ["heading_structure_status", "alt_text_status"]);
        assert!(report.note().is_some());
    }

    #[test]
    fn numeric_values_become_display_strings() {
        let report = AccessibilityReport::decode(SAMPLE_REPORT).expect("decode");
        assert_eq!(report.structure_analysis["alt_missing_count"], "0");
    }

    #[test]
    fn review_grade_is_not_a_pass() {
        let report =
            AccessibilityReport::decode(r#"{"summary_score": "REVIEW (Check readability)"}"#)
                .expect("decode");
        assert!(!report.is_pass());
        assert_eq!(report.structure_rows().count(), 0);
    }

    #[test]
    fn malformed_report_is_an_artifact_error() {
        let err = AccessibilityReport::decode("{not json").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::ArtifactDecode);
        assert!(AccessibilityReport::decode("{}").is_err());
    }

    #[test]
    fn labels_are_humanised() {
        assert_eq!(display_label("flesch_kincaid_grade"), "Flesch kincaid grade");
        assert_eq!(display_label(""), "");
    }

    #[test]
    fn failed_result_maps_to_service_error() {
        let result = ConversionResult::failed(
            FailureKind::Rejected {
                status: Some("FAILED".into()),
            },
            Some("transcript unavailable".into()),
        );
        assert!(!result.is_completed());
        assert!(result.task_id.is_none());
        match result.to_error() {
            Some(HubError::Service { message, .. }) => {
                assert_eq!(message.as_deref(), Some("transcript unavailable"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(ConversionResult::completed().to_error().is_none());
    }

    #[test]
    fn qualifiers_are_space_separated() {
        let mut msg = StatusMessage::new(StatusKind::Success, "Done.");
        msg.qualify("(Report data is corrupt.)");
        assert_eq!(msg.text, "Done. (Report data is corrupt.)");
    }

    #[test]
    fn busy_phases() {
        assert!(SessionPhase::Submitting.is_busy());
        assert!(SessionPhase::AwaitingArtifacts.is_busy());
        assert!(!SessionPhase::Ready.is_busy());
        assert!(!SessionPhase::Errored.is_busy());
    }
}
