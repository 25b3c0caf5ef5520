// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion session — the state machine behind one "generate" action.
//
//   Idle -> Validating -> Submitting -> AwaitingArtifacts -> Ready
//                 \            \
//                  +-> Errored  +-> Errored
//
// Every submission carries a sequence number. Selecting a new source, a
// reset, or a newer submission bumps the session's number, so a response
// that arrives afterwards no longer matches and is dropped.
//
// The transitions are synchronous. The awaits happen between them in the
// service layer, so a shared session never has to be locked across the
// network round trip.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use accesshub_client::{ContentOutcome, ResultAssembler};
use accesshub_core::error::{ErrorCategory, HubError, Result, ValidationError};
use accesshub_core::human_errors::{artifact_qualifier, describe};
use accesshub_core::locale::{LocaleRegistry, LocaleTable};
use accesshub_core::types::{
    ArtifactWarning, ConversionRequest, ConversionResult, FileSource, InputSource, SessionPhase,
    SessionState, StatusKind, StatusMessage,
};

use crate::selector::{DropPayload, SourceSelector, is_video_url};

/// Proof that a submission was started, needed to apply its outcome.
#[derive(Debug, Clone)]
pub struct SubmissionTicket {
    sequence: u64,
    request: ConversionRequest,
    submitted_at: DateTime<Utc>,
}

impl SubmissionTicket {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn request(&self) -> &ConversionRequest {
        &self.request
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }
}

/// What the driver has to do next after applying an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Fetch the simplified content body and hand it to `apply_artifacts`.
    FetchContent { reference: Option<String> },
    /// The submission reached `Ready` or `Errored`.
    Finished,
    /// The outcome belonged to a superseded submission and was ignored.
    Stale,
}

pub struct ConversionSession {
    state: SessionState,
    registry: Arc<LocaleRegistry>,
    locale: LocaleTable,
    selector: SourceSelector,
    sequence: u64,
}

impl ConversionSession {
    pub fn new(registry: Arc<LocaleRegistry>, language: &str, selector: SourceSelector) -> Self {
        let locale = registry.resolve(language);
        Self {
            state: SessionState::new(language),
            registry,
            locale,
            selector,
            sequence: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The resolved table for the current language.
    pub fn locale(&self) -> &LocaleTable {
        &self.locale
    }

    /// Switch the interface language. Source and result are untouched;
    /// later submissions carry the new code.
    pub fn set_language(&mut self, code: &str) {
        self.locale = self.registry.resolve(code);
        self.state.language = code.to_owned();
        self.touch();
        info!(language = code, "language changed");
    }

    /// A source is active and nothing is in flight.
    pub fn can_submit(&self) -> bool {
        !self.state.source.is_none() && !self.state.phase.is_busy()
    }

    // -- Source selection ----------------------------------------------------

    pub fn select_file(&mut self, file: FileSource) -> std::result::Result<(), ValidationError> {
        let outcome = self.selector.select_file(file);
        self.apply_selection(outcome)
    }

    pub fn select_remote_url(&mut self, text: &str) -> std::result::Result<(), ValidationError> {
        let outcome = self.selector.select_remote_url(text);
        self.apply_selection(outcome)
    }

    pub fn select_from_drop(
        &mut self,
        payload: DropPayload,
    ) -> std::result::Result<(), ValidationError> {
        let outcome = self.selector.select_from_drop(payload);
        self.apply_selection(outcome)
    }

    fn apply_selection(
        &mut self,
        outcome: std::result::Result<InputSource, ValidationError>,
    ) -> std::result::Result<(), ValidationError> {
        match outcome {
            Ok(source) => {
                let status = match &source {
                    InputSource::File(file) => StatusMessage::new(
                        StatusKind::Info,
                        self.locale
                            .format("status.file_selected", &[("name", file.name.as_str())]),
                    ),
                    InputSource::RemoteVideo { url } => StatusMessage::new(
                        StatusKind::Info,
                        self.locale.format("status.url_selected", &[("url", url.as_str())]),
                    ),
                    InputSource::None => StatusMessage::default(),
                };
                self.begin_new_source(source);
                self.state.status = status;
                Ok(())
            }
            Err(err) => {
                // Invalid link text stays visible so it can be corrected.
                let source = match &err {
                    ValidationError::InvalidRemoteUrl(raw) => {
                        InputSource::RemoteVideo { url: raw.clone() }
                    }
                    _ => InputSource::None,
                };
                self.begin_new_source(source);
                self.state.status = describe(&HubError::Validation(err.clone()), &self.locale);
                debug!(error = %err, "source rejected");
                Err(err)
            }
        }
    }

    /// The single place a new source enters the session. Anything tied to
    /// the previous source goes, including an in-flight submission.
    fn begin_new_source(&mut self, source: InputSource) {
        if self.state.phase.is_busy() {
            warn!(sequence = self.sequence, "new source abandons the in-flight submission");
        }
        self.sequence += 1;
        self.state.source = source;
        self.state.result = None;
        self.state.status = StatusMessage::default();
        self.state.phase = SessionPhase::Idle;
        self.touch();
    }

    // -- Submission ----------------------------------------------------------

    /// Validate the active source and move to `Submitting`.
    ///
    /// A busy session refuses without changing anything. A missing or
    /// malformed source leaves the session `Errored` and returns the
    /// validation error; no request is built.
    pub fn begin_submit(&mut self) -> Result<SubmissionTicket> {
        if self.state.phase.is_busy() {
            warn!(phase = ?self.state.phase, "submit refused, conversion in progress");
            return Err(HubError::SubmissionInProgress);
        }

        self.state.phase = SessionPhase::Validating;
        if let Err(err) = validate_source(&self.state.source) {
            let err = HubError::Validation(err);
            self.state.status = describe(&err, &self.locale);
            self.state.result = None;
            self.state.phase = SessionPhase::Errored;
            self.touch();
            info!(error = %err, "submission failed validation");
            return Err(err);
        }

        self.sequence += 1;
        self.state.result = None;
        self.state.status =
            StatusMessage::new(StatusKind::Info, self.locale.get("status.uploading"));
        self.state.phase = SessionPhase::Submitting;
        self.touch();

        let ticket = SubmissionTicket {
            sequence: self.sequence,
            request: ConversionRequest {
                source: self.state.source.clone(),
                language: self.state.language.clone(),
            },
            submitted_at: Utc::now(),
        };
        let fingerprint = match &ticket.request.source {
            InputSource::File(file) => file.fingerprint(),
            _ => String::new(),
        };
        info!(
            sequence = ticket.sequence,
            source = ticket.request.source.display_name().unwrap_or_default(),
            document = %fingerprint,
            language = %ticket.request.language,
            "submission started"
        );
        Ok(ticket)
    }

    /// Apply the primary response of a submission.
    pub fn apply_response(&mut self, ticket: &SubmissionTicket, result: ConversionResult) -> Step {
        if !self.is_current(ticket, SessionPhase::Submitting) {
            return Step::Stale;
        }

        if !result.is_completed() {
            let err = result.to_error().unwrap_or(HubError::Service {
                status: None,
                message: None,
            });
            error!(sequence = ticket.sequence, error = %err, "conversion failed");
            self.state.status = describe(&err, &self.locale);
            self.state.result = Some(result);
            self.state.phase = SessionPhase::Errored;
            self.touch();
            return Step::Finished;
        }

        let reference = result.simplified_content_ref.clone();
        info!(
            sequence = ticket.sequence,
            task_id = result.task_id.as_deref().unwrap_or_default(),
            elapsed_ms = (Utc::now() - ticket.submitted_at).num_milliseconds(),
            "conversion completed, fetching artifacts"
        );
        self.state.result = Some(result);
        self.state.phase = SessionPhase::AwaitingArtifacts;
        self.touch();
        Step::FetchContent { reference }
    }

    /// Attach the secondary retrieval outcome and finish at `Ready`.
    ///
    /// Degraded artifacts become qualifiers on the success line. Missing
    /// simplified content is shown as an error, but the rest of the result
    /// is kept.
    pub fn apply_artifacts(&mut self, ticket: &SubmissionTicket, outcome: ContentOutcome) -> Step {
        if !self.is_current(ticket, SessionPhase::AwaitingArtifacts) {
            return Step::Stale;
        }
        let Some(result) = self.state.result.as_mut() else {
            return Step::Stale;
        };
        ResultAssembler::attach(result, outcome);

        let task_id = result.task_id.as_deref().unwrap_or("-");
        let mut status = StatusMessage::new(
            StatusKind::Success,
            self.locale.format("status.success", &[("task_id", task_id)]),
        );
        for warning in &result.warnings {
            status.qualify(&artifact_qualifier(warning, &self.locale));
        }
        let content_missing = result
            .warnings
            .iter()
            .any(|w| matches!(w, ArtifactWarning::ContentUnavailable(_)));
        if content_missing {
            status.kind = StatusKind::Error(ErrorCategory::ArtifactDecode);
            status.retriable = true;
        } else if !result.warnings.is_empty() {
            status.kind = StatusKind::Warning(ErrorCategory::ArtifactDecode);
        }

        info!(
            sequence = ticket.sequence,
            warnings = result.warnings.len(),
            "results ready"
        );
        self.state.status = status;
        self.state.phase = SessionPhase::Ready;
        self.touch();
        Step::Finished
    }

    /// Back to `Idle` with nothing selected. Allowed from any phase; an
    /// in-flight submission is abandoned.
    pub fn reset(&mut self) {
        self.sequence += 1;
        self.state.source = InputSource::None;
        self.state.result = None;
        self.state.status = StatusMessage::default();
        self.state.phase = SessionPhase::Idle;
        self.touch();
        info!(sequence = self.sequence, "session reset");
    }

    fn is_current(&self, ticket: &SubmissionTicket, expected: SessionPhase) -> bool {
        let current = ticket.sequence == self.sequence && self.state.phase == expected;
        if !current {
            warn!(
                ticket = ticket.sequence,
                current = self.sequence,
                phase = ?self.state.phase,
                "discarding stale response"
            );
        }
        current
    }

    fn touch(&mut self) {
        self.state.updated_at = Utc::now();
    }
}

fn validate_source(source: &InputSource) -> std::result::Result<(), ValidationError> {
    match source {
        InputSource::None => Err(ValidationError::NoSourceSelected),
        InputSource::RemoteVideo { url } if !is_video_url(url) => {
            Err(ValidationError::InvalidRemoteUrl(url.clone()))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use accesshub_client::response::interpret_upload_body;

    use crate::selector::PDF_MEDIA_TYPE;

    const VIDEO: &str = "https://www.youtube.com/watch?v=abc123";

    fn session() -> ConversionSession {
        ConversionSession::new(
            Arc::new(LocaleRegistry::builtin()),
            "en",
            SourceSelector::new(1024),
        )
    }

    fn pdf() -> FileSource {
        FileSource::new("lesson.pdf", PDF_MEDIA_TYPE, b"%PDF-1.7".to_vec())
    }

    const COMPLETED: &str = r#"{
        "status": "COMPLETED",
        "task_id": "t-42",
        "simplified_file": "x.html",
        "audio_file": "x.mp3",
        "report": "{\"summary_score\":\"PASS (baseline)\",\"readability_metrics\":{\"flesch_kincaid_grade\":\"6.1\"},\"structure_analysis\":{\"headings_found\":3}}"
    }"#;

    #[test]
    fn starts_idle_and_empty() {
        let s = session();
        assert_eq!(s.state().phase, SessionPhase::Idle);
        assert!(s.state().source.is_none());
        assert!(s.state().result.is_none());
        assert!(s.state().status.is_empty());
        assert!(!s.can_submit());
    }

    #[test]
    fn response_after_reset_is_ignored() {
        let mut s = session();
        s.select_remote_url(VIDEO).unwrap();
        let ticket = s.begin_submit().unwrap();
        s.reset();

        let step = s.apply_response(&ticket, interpret_upload_body(COMPLETED));
        assert_eq!(step, Step::Stale);
        assert_eq!(s.state().phase, SessionPhase::Idle);
        assert!(s.state().result.is_none());
        assert!(s.state().status.is_empty());
    }

    #[test]
    fn artifacts_after_reset_are_ignored() {
        let mut s = session();
        s.select_file(pdf()).unwrap();
        let ticket = s.begin_submit().unwrap();
        let step = s.apply_response(&ticket, interpret_upload_body(COMPLETED));
        assert_eq!(
            step,
            Step::FetchContent {
                reference: Some("x.html".into())
            }
        );
        assert_eq!(s.state().phase, SessionPhase::AwaitingArtifacts);

        s.reset();
        let step = s.apply_artifacts(&ticket, Ok("<p>late</p>".into()));
        assert_eq!(step, Step::Stale);
        assert_eq!(s.state().phase, SessionPhase::Idle);
        assert!(s.state().result.is_none());
        assert!(s.state().source.is_none());
    }

    #[test]
    fn older_ticket_cannot_apply_after_resubmit() {
        let mut s = session();
        s.select_file(pdf()).unwrap();
        let first = s.begin_submit().unwrap();
        s.reset();
        s.select_file(pdf()).unwrap();
        let second = s.begin_submit().unwrap();
        assert!(second.sequence() > first.sequence());
        assert!(second.submitted_at() >= first.submitted_at());

        assert_eq!(
            s.apply_response(&first, interpret_upload_body(COMPLETED)),
            Step::Stale
        );
        assert_eq!(s.state().phase, SessionPhase::Submitting);
        assert!(matches!(
            s.apply_response(&second, interpret_upload_body(COMPLETED)),
            Step::FetchContent { .. }
        ));
    }

    #[test]
    fn second_submit_while_busy_is_refused() {
        let mut s = session();
        s.select_file(pdf()).unwrap();
        let ticket = s.begin_submit().unwrap();
        assert!(!s.can_submit());

        let before = s.state().updated_at;
        assert!(matches!(
            s.begin_submit(),
            Err(HubError::SubmissionInProgress)
        ));
        assert_eq!(s.state().phase, SessionPhase::Submitting);
        assert_eq!(s.state().updated_at, before);

        s.apply_response(&ticket, interpret_upload_body(COMPLETED));
        assert!(matches!(
            s.begin_submit(),
            Err(HubError::SubmissionInProgress)
        ));
    }

    #[test]
    fn new_source_invalidates_in_flight_submission() {
        let mut s = session();
        s.select_file(pdf()).unwrap();
        let ticket = s.begin_submit().unwrap();

        s.select_remote_url(VIDEO).unwrap();
        assert_eq!(s.state().phase, SessionPhase::Idle);
        assert_eq!(
            s.apply_response(&ticket, interpret_upload_body(COMPLETED)),
            Step::Stale
        );
        assert!(s.state().result.is_none());
    }

    #[test]
    fn sources_are_mutually_exclusive_in_every_order() {
        let mut s = session();
        s.select_file(pdf()).unwrap();
        s.select_remote_url(VIDEO).unwrap();
        assert_eq!(
            s.state().source,
            InputSource::RemoteVideo { url: VIDEO.into() }
        );

        s.select_file(pdf()).unwrap();
        assert_eq!(s.state().source, InputSource::File(pdf()));

        s.select_from_drop(DropPayload {
            text: Some(VIDEO.into()),
            files: vec![],
        })
        .unwrap();
        assert_eq!(
            s.state().source,
            InputSource::RemoteVideo { url: VIDEO.into() }
        );

        s.select_from_drop(DropPayload {
            text: None,
            files: vec![pdf()],
        })
        .unwrap();
        assert_eq!(s.state().source, InputSource::File(pdf()));
    }

    #[test]
    fn selection_clears_previous_result_and_status() {
        let mut s = session();
        s.select_file(pdf()).unwrap();
        let ticket = s.begin_submit().unwrap();
        s.apply_response(&ticket, interpret_upload_body(COMPLETED));
        s.apply_artifacts(&ticket, Ok("<p/>".into()));
        assert_eq!(s.state().phase, SessionPhase::Ready);

        s.select_remote_url(VIDEO).unwrap();
        assert!(s.state().result.is_none());
        assert_eq!(s.state().phase, SessionPhase::Idle);
        assert_eq!(s.state().status.kind, StatusKind::Info);
        assert!(s.state().status.text.contains(VIDEO));
    }

    #[test]
    fn unsupported_file_clears_source() {
        let mut s = session();
        s.select_remote_url(VIDEO).unwrap();
        let txt = FileSource::new("notes.txt", "text/plain", b"hi".to_vec());

        let err = s.select_file(txt).unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedFileType { .. }));
        assert!(s.state().source.is_none());
        assert_eq!(s.state().status.text, "Please select a PDF or DOCX file.");
        assert!(!s.can_submit());
    }

    #[test]
    fn invalid_url_is_kept_and_rejected_at_submit() {
        let mut s = session();
        let err = s.select_remote_url("not a url").unwrap_err();
        assert_eq!(err, ValidationError::InvalidRemoteUrl("not a url".into()));
        assert_eq!(
            s.state().source,
            InputSource::RemoteVideo {
                url: "not a url".into()
            }
        );

        assert!(matches!(
            s.begin_submit(),
            Err(HubError::Validation(ValidationError::InvalidRemoteUrl(_)))
        ));
        assert_eq!(s.state().phase, SessionPhase::Errored);
        assert!(s.state().status.text.contains("YouTube link"));
    }

    #[test]
    fn empty_url_clears_without_message() {
        let mut s = session();
        s.select_file(pdf()).unwrap();
        s.select_remote_url("").unwrap();
        assert!(s.state().source.is_none());
        assert!(s.state().status.is_empty());
    }

    #[test]
    fn language_travels_with_the_request() {
        let mut s = session();
        s.select_file(pdf()).unwrap();
        s.set_language("es");
        assert_eq!(s.state().source, InputSource::File(pdf()));

        let ticket = s.begin_submit().unwrap();
        assert_eq!(ticket.request().language, "es");
        assert_eq!(s.state().status.text, "Subiendo y procesando...");
    }
}
