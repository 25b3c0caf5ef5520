// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Result assembly — turns a completed upload response into the artifacts
// the learner sees.
//
// Only the simplified content needs a second request. Audio and exports are
// handed to the presentation layer as URLs.

use tracing::{info, warn};

use accesshub_core::error::{HubError, Result};
use accesshub_core::types::{ArtifactWarning, ConversionResult};

use crate::backend::ConversionBackend;
use crate::client::Endpoints;

/// Absolute URLs of the artifacts a result refers to. Absent references
/// stay absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactLinks {
    pub audio: Option<String>,
    pub epub: Option<String>,
    pub pdf: Option<String>,
}

impl ArtifactLinks {
    pub fn is_empty(&self) -> bool {
        self.audio.is_none() && self.epub.is_none() && self.pdf.is_none()
    }
}

/// Outcome of the secondary retrieval.
pub type ContentOutcome = Result<String>;

pub struct ResultAssembler {
    endpoints: Endpoints,
}

impl ResultAssembler {
    pub fn new(endpoints: Endpoints) -> Self {
        Self { endpoints }
    }

    pub fn links(&self, result: &ConversionResult) -> ArtifactLinks {
        ArtifactLinks {
            audio: result.audio_ref.as_deref().map(|r| self.endpoints.result(r)),
            epub: result
                .epub_ref
                .as_deref()
                .map(|r| self.endpoints.download("epub", r)),
            pdf: result
                .pdf_ref
                .as_deref()
                .map(|r| self.endpoints.download("pdf", r)),
        }
    }

    /// Fetch the simplified content body named by a completed result's
    /// `simplified_content_ref`.
    pub async fn fetch_content<B: ConversionBackend>(
        &self,
        backend: &B,
        reference: Option<&str>,
    ) -> ContentOutcome {
        let reference = reference.ok_or_else(|| {
            HubError::ArtifactDecode("service returned no simplified content".into())
        })?;
        let body = backend.fetch_content(reference).await?;
        info!(reference, bytes = body.len(), "simplified content retrieved");
        Ok(body)
    }

    /// Attach a fetch outcome to the result. A failure becomes a warning;
    /// the result stays completed.
    pub fn attach(result: &mut ConversionResult, outcome: ContentOutcome) {
        match outcome {
            Ok(body) => result.content_body = Some(body),
            Err(e) => {
                warn!(error = %e, "simplified content unavailable");
                let detail = match e {
                    HubError::ArtifactDecode(detail) => detail,
                    other => other.to_string(),
                };
                result.content_body = None;
                result.warnings.push(ArtifactWarning::ContentUnavailable(detail));
            }
        }
    }
}
