// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the conversion workflow.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Problems with the user's input, detected before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no file or video link selected")]
    NoSourceSelected,

    #[error("unsupported file type for '{name}': {media_type}")]
    UnsupportedFileType { name: String, media_type: String },

    #[error("file '{name}' is {size} bytes, limit is {limit}")]
    FileTooLarge { name: String, size: u64, limit: u64 },

    /// Carries the text exactly as typed so it can be shown back for editing.
    #[error("not a recognised video link: {0}")]
    InvalidRemoteUrl(String),

    #[error("dropped content is neither a file nor a video link")]
    UnrecognizedDrop,
}

/// Top-level error type for all hub operations.
#[derive(Debug, Error)]
pub enum HubError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    // -- Conversion service --
    #[error("could not reach the conversion service: {0}")]
    Transport(String),

    #[error("conversion service error (status {status:?}): {message:?}")]
    Service {
        status: Option<u16>,
        message: Option<String>,
    },

    #[error("artifact could not be decoded or retrieved: {0}")]
    ArtifactDecode(String),

    #[error("a conversion is already in progress")]
    SubmissionInProgress,

    // -- Configuration / persistence --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse error taxonomy used to tag status messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Bad or missing input. Fixed by the user, never retried.
    Validation,
    /// Network unreachable or malformed response. Retry.
    Transport,
    /// The service answered but refused or failed the work.
    Service,
    /// One artifact is unusable while the rest of the conversion stands.
    ArtifactDecode,
}

impl HubError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) | Self::SubmissionInProgress | Self::Config(_) => {
                ErrorCategory::Validation
            }
            Self::Transport(_) | Self::Io(_) => ErrorCategory::Transport,
            Self::Service { .. } => ErrorCategory::Service,
            Self::ArtifactDecode(_) | Self::Serialization(_) => ErrorCategory::ArtifactDecode,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, HubError>;
