// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Async HTTP client for the conversion service.
//
// Endpoints used:
//   - POST /api/upload             multipart: `file` | `youtube_url`, `language`
//   - GET  /api/result/{file}      simplified content body (raw markup)
//
// Export and audio endpoints are only turned into URLs (see `assembler`);
// the client never downloads them.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::Url;
use reqwest::multipart::{Form, Part};
use tracing::{debug, error, info, instrument, warn};

use accesshub_core::error::{HubError, Result, ValidationError};
use accesshub_core::types::{ConversionRequest, ConversionResult, FailureKind, InputSource};
use accesshub_core::AppConfig;

use crate::response::{interpret_error_body, interpret_upload_body};

const USER_AGENT: &str = concat!("accesshub/", env!("CARGO_PKG_VERSION"));

/// URL builder for the service's endpoints.
///
/// References returned by the service are pushed as single path segments,
/// so `?`, `#`, `%` and `/` inside a file name are percent-encoded rather
/// than read as URL structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base = Url::parse(base_url.trim())
            .map_err(|e| HubError::Config(format!("api_base_url '{base_url}': {e}")))?;
        if base.cannot_be_a_base() {
            return Err(HubError::Config(format!(
                "api_base_url '{base_url}' cannot carry a path"
            )));
        }
        base.set_query(None);
        base.set_fragment(None);
        Ok(Self { base })
    }

    pub fn base(&self) -> &str {
        self.base.as_str()
    }

    pub fn upload(&self) -> String {
        self.join(&["api", "upload"])
    }

    /// Result-relative path, used for simplified content and audio.
    pub fn result(&self, reference: &str) -> String {
        self.join(&["api", "result", reference.trim_start_matches('/')])
    }

    /// Export download path; `kind` is `epub` or `pdf`.
    pub fn download(&self, kind: &str, reference: &str) -> String {
        self.join(&["api", "download", kind, reference.trim_start_matches('/')])
    }

    fn join(&self, segments: &[&str]) -> String {
        let mut url = self.base.clone();
        // Infallible: `new` refuses cannot-be-a-base URLs.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.into()
    }
}

/// The multipart fields of one upload, before they become a `Form`.
///
/// File bytes are shared with the selected `FileSource`, not copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadPayload {
    File {
        name: String,
        media_type: String,
        bytes: Arc<[u8]>,
        language: String,
    },
    RemoteVideo {
        url: String,
        language: String,
    },
}

impl UploadPayload {
    /// Exactly one of file bytes or video link, plus the language code.
    pub fn from_request(request: &ConversionRequest) -> Result<Self> {
        let language = request.language.clone();
        match &request.source {
            InputSource::None => Err(ValidationError::NoSourceSelected.into()),
            InputSource::File(file) => Ok(Self::File {
                name: file.name.clone(),
                media_type: file.media_type.clone(),
                bytes: Arc::clone(&file.bytes),
                language,
            }),
            InputSource::RemoteVideo { url } => Ok(Self::RemoteVideo {
                url: url.trim().to_owned(),
                language,
            }),
        }
    }

    fn into_form(self) -> Result<Form> {
        match self {
            Self::File {
                name,
                media_type,
                bytes,
                language,
            } => {
                let length = bytes.len() as u64;
                let mut part =
                    Part::stream_with_length(Bytes::from_owner(bytes), length).file_name(name);
                if !media_type.is_empty() {
                    part = part.mime_str(&media_type).map_err(|e| {
                        HubError::Transport(format!("invalid media type '{media_type}': {e}"))
                    })?;
                }
                Ok(Form::new().part("file", part).text("language", language))
            }
            Self::RemoteVideo { url, language } => Ok(Form::new()
                .text("youtube_url", url)
                .text("language", language)),
        }
    }
}

/// HTTP client bound to one conversion service.
#[derive(Debug, Clone)]
pub struct ConversionClient {
    http: reqwest::Client,
    endpoints: Endpoints,
}

impl ConversionClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| HubError::Transport(format!("HTTP client setup: {e}")))?;
        Self::with_http(http, config)
    }

    /// Use an already configured `reqwest::Client`, for example one with
    /// its own proxy or TLS settings. `request_timeout_secs` is then up to
    /// the caller.
    pub fn with_http(http: reqwest::Client, config: &AppConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            http,
            endpoints: Endpoints::new(&config.api_base_url)?,
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// One upload round trip. Every outcome, including network failure,
    /// comes back as a `ConversionResult`.
    #[instrument(skip(self, request), fields(base = %self.endpoints.base(), language = %request.language))]
    pub async fn upload(&self, request: &ConversionRequest) -> ConversionResult {
        let form = match UploadPayload::from_request(request).and_then(UploadPayload::into_form) {
            Ok(form) => form,
            Err(HubError::Validation(v)) => {
                return ConversionResult::failed(FailureKind::Invalid(v), None);
            }
            Err(e) => {
                return ConversionResult::failed(FailureKind::Transport(e.to_string()), None);
            }
        };

        info!(source = ?request.source.display_name(), "sending upload");
        let response = match self.http.post(self.endpoints.upload()).multipart(form).send().await
        {
            Ok(r) => r,
            Err(e) => {
                error!(error = %e, "upload request failed");
                return ConversionResult::failed(FailureKind::Transport(e.to_string()), None);
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) if status.is_success() => {
                error!(error = %e, "could not read upload response");
                return ConversionResult::failed(FailureKind::Transport(e.to_string()), None);
            }
            // The error body is only a source of a nicer message.
            Err(_) => String::new(),
        };
        debug!(status = status.as_u16(), bytes = body.len(), "upload response received");

        if !status.is_success() {
            warn!(status = status.as_u16(), "upload rejected by service");
            return interpret_error_body(status.as_u16(), &body);
        }
        interpret_upload_body(&body)
    }

    /// Secondary retrieval of the simplified content body.
    #[instrument(skip(self), fields(base = %self.endpoints.base()))]
    pub async fn fetch_result_body(&self, reference: &str) -> Result<String> {
        let url = self.endpoints.result(reference);
        debug!(%url, "fetching simplified content");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| HubError::ArtifactDecode(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "simplified content fetch failed");
            return Err(HubError::ArtifactDecode(format!(
                "Failed to fetch simplified file (HTTP {})",
                status.as_u16()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| HubError::ArtifactDecode(e.to_string()))?;
        debug!(bytes = body.len(), "simplified content received");
        Ok(body)
    }
}
