// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable status lines for learners.
//
// Every error is mapped to a short localized sentence tagged with its
// category. The category drives colour in the UI; `retriable` tells the UI
// whether to offer "try again" or ask for different input.

use crate::error::{ErrorCategory, HubError, ValidationError};
use crate::locale::LocaleTable;
use crate::types::{ArtifactWarning, StatusKind, StatusMessage};

/// Convert a `HubError` into the status line shown to the user.
pub fn describe(err: &HubError, table: &LocaleTable) -> StatusMessage {
    let category = err.category();
    let (text, retriable) = match err {
        HubError::Validation(v) => (describe_validation(v, table), false),

        HubError::SubmissionInProgress => (table.get("error.busy").to_owned(), false),

        HubError::Transport(_) => (table.get("error.network").to_owned(), true),

        HubError::Service { status, message } => {
            let detail = match message.as_deref().map(str::trim) {
                Some(m) if !m.is_empty() => m.to_owned(),
                // An HTTP error with no readable body vs. a 2xx that said no.
                _ if status.is_some() => table.get("error.server_generic").to_owned(),
                _ => table.get("error.internal_generic").to_owned(),
            };
            (
                table.format("error.conversion_failed", &[("message", detail.as_str())]),
                true,
            )
        }

        HubError::ArtifactDecode(detail) => (
            table.format("status.content_failed", &[("detail", detail.as_str())]),
            true,
        ),

        HubError::Config(detail) => (
            table.format("error.config", &[("detail", detail.as_str())]),
            false,
        ),

        HubError::Io(io_err) => {
            let retriable = !matches!(
                io_err.kind(),
                std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied
            );
            (table.get("error.storage").to_owned(), retriable)
        }

        HubError::Serialization(_) => (table.get("error.storage").to_owned(), false),
    };

    let kind = match category {
        ErrorCategory::ArtifactDecode => StatusKind::Warning(category),
        _ => StatusKind::Error(category),
    };

    StatusMessage {
        kind,
        text,
        retriable,
    }
}

fn describe_validation(err: &ValidationError, table: &LocaleTable) -> String {
    match err {
        ValidationError::NoSourceSelected => table.get("error.no_source").to_owned(),
        ValidationError::UnsupportedFileType { .. } => {
            table.get("error.unsupported_file").to_owned()
        }
        ValidationError::FileTooLarge { limit, .. } => {
            table.format("error.file_too_large", &[("limit", format_bytes(*limit).as_str())])
        }
        ValidationError::InvalidRemoteUrl(_) => table.get("error.invalid_url").to_owned(),
        ValidationError::UnrecognizedDrop => table.get("error.unrecognized_drop").to_owned(),
    }
}

/// Parenthetical note appended to a success line for a degraded artifact.
pub fn artifact_qualifier(warning: &ArtifactWarning, table: &LocaleTable) -> String {
    match warning {
        ArtifactWarning::ReportCorrupt(_) => table.get("status.report_corrupt").to_owned(),
        ArtifactWarning::ReportMissing => table.get("status.report_missing").to_owned(),
        ArtifactWarning::ContentUnavailable(detail) => {
            table.format("status.content_failed", &[("detail", detail.as_str())])
        }
    }
}

/// `52428800` → `50 MB`.
pub fn format_bytes(bytes: u64) -> String {
    const MB: u64 = 1024 * 1024;
    const KB: u64 = 1024;
    if bytes >= MB {
        format!("{} MB", bytes / MB)
    } else if bytes >= KB {
        format!("{} KB", bytes / KB)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::LocaleRegistry;

    fn en() -> LocaleTable {
        LocaleRegistry::builtin().resolve("en")
    }

    #[test]
    fn no_source_is_not_retriable() {
        let human = describe(&ValidationError::NoSourceSelected.into(), &en());
        assert_eq!(human.kind, StatusKind::Error(ErrorCategory::Validation));
        assert!(!human.retriable);
        assert!(human.text.contains("select a file"));
    }

    #[test]
    fn network_failure_is_retriable() {
        let human = describe(&HubError::Transport("connection refused".into()), &en());
        assert_eq!(human.kind, StatusKind::Error(ErrorCategory::Transport));
        assert!(human.retriable);
    }

    #[test]
    fn service_message_is_shown_verbatim() {
        let err = HubError::Service {
            status: Some(400),
            message: Some("Unsupported file type: .txt".into()),
        };
        let human = describe(&err, &en());
        assert_eq!(human.text, "Conversion Failed: Unsupported file type: .txt");
    }

    #[test]
    fn http_error_without_body_uses_generic_server_text() {
        let err = HubError::Service {
            status: Some(502),
            message: None,
        };
        assert_eq!(
            describe(&err, &en()).text,
            "Conversion Failed: Server returned an error."
        );
    }

    #[test]
    fn rejected_status_without_message_uses_generic_failure_text() {
        let err = HubError::Service {
            status: None,
            message: Some("   ".into()),
        };
        assert_eq!(
            describe(&err, &en()).text,
            "Conversion Failed: Internal logic error."
        );
    }

    #[test]
    fn artifact_problems_are_warnings() {
        let human = describe(&HubError::ArtifactDecode("404".into()), &en());
        assert_eq!(human.kind, StatusKind::Warning(ErrorCategory::ArtifactDecode));
    }

    #[test]
    fn localized_text_follows_the_table() {
        let es = LocaleRegistry::builtin().resolve("es");
        let human = describe(&ValidationError::UnrecognizedDrop.into(), &es);
        assert!(human.text.starts_with("Suelta"));
    }

    #[test]
    fn size_limit_is_readable() {
        assert_eq!(format_bytes(50 * 1024 * 1024), "50 MB");
        assert_eq!(format_bytes(2048), "2 KB");
        assert_eq!(format_bytes(12), "12 B");
    }
}
