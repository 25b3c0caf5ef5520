// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Interpretation of `/api/upload` response bodies.
//
// These functions never fail: every body, well-formed or not, becomes a
// typed `ConversionResult`.

use serde::Deserialize;
use tracing::{debug, warn};

use accesshub_core::types::{AccessibilityReport, ArtifactWarning, ConversionResult, FailureKind};

/// Status discriminator value that marks a finished conversion.
pub const COMPLETED_STATUS: &str = "completed";

/// Wire shape of a 2xx upload response. Every field is optional; the
/// interpretation below decides what absence means.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    status: Option<String>,
    task_id: Option<String>,
    message: Option<String>,
    simplified_file: Option<String>,
    audio_file: Option<String>,
    epub_file: Option<String>,
    pdf_file: Option<String>,
    /// Normally a JSON-encoded string; tolerated as an inline object too.
    report: Option<serde_json::Value>,
}

/// Error body of a non-2xx response.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Map a 2xx response body to a result.
pub fn interpret_upload_body(body: &str) -> ConversionResult {
    let response: UploadResponse = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "upload response is not valid JSON");
            return ConversionResult::failed(
                FailureKind::Transport(format!("malformed response: {e}")),
                None,
            );
        }
    };

    let completed = response
        .status
        .as_deref()
        .is_some_and(|s| s.trim().eq_ignore_ascii_case(COMPLETED_STATUS));

    if !completed {
        debug!(status = ?response.status, "service did not complete the conversion");
        return ConversionResult::failed(
            FailureKind::Rejected {
                status: response.status,
            },
            non_empty(response.message),
        );
    }

    let mut result = ConversionResult::completed();
    result.task_id = non_empty(response.task_id);
    result.message = non_empty(response.message);
    result.simplified_content_ref = non_empty(response.simplified_file);
    result.audio_ref = non_empty(response.audio_file);
    result.epub_ref = non_empty(response.epub_file);
    result.pdf_ref = non_empty(response.pdf_file);

    match decode_report(response.report) {
        Ok(report) => result.report = Some(report),
        Err(warning) => {
            warn!(?warning, task_id = ?result.task_id, "report unavailable");
            result.warnings.push(warning);
        }
    }

    result
}

/// Map a non-2xx response to a failed result, taking the service's
/// message from a JSON body when there is one.
pub fn interpret_error_body(status: u16, body: &str) -> ConversionResult {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| non_empty(b.message));
    ConversionResult::failed(FailureKind::Http { status }, message)
}

fn decode_report(
    raw: Option<serde_json::Value>,
) -> std::result::Result<AccessibilityReport, ArtifactWarning> {
    match raw {
        None | Some(serde_json::Value::Null) => Err(ArtifactWarning::ReportMissing),
        Some(serde_json::Value::String(encoded)) if encoded.trim().is_empty() => {
            Err(ArtifactWarning::ReportMissing)
        }
        Some(serde_json::Value::String(encoded)) => AccessibilityReport::decode(&encoded)
            .map_err(|e| ArtifactWarning::ReportCorrupt(e.to_string())),
        Some(inline @ serde_json::Value::Object(_)) => serde_json::from_value(inline)
            .map_err(|e| ArtifactWarning::ReportCorrupt(format!("report: {e}"))),
        Some(other) => Err(ArtifactWarning::ReportCorrupt(format!(
            "report: unexpected JSON {other}"
        ))),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
