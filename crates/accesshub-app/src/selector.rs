// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Source selection — decides which single input (file or video link) is
// active. Manual picking, pasting and drag-and-drop all go through the
// same rules here.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use accesshub_core::error::ValidationError;
use accesshub_core::types::{FileSource, InputSource};

/// Declared media type accepted for PDF uploads.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";
/// Filename suffix accepted for Word uploads.
pub const DOCX_SUFFIX: &str = ".docx";

/// `(https?://)?(www.)?(youtube.com/(watch?v=|embed/)|youtu.be/)<id>`,
/// optionally followed by more query parameters or a fragment.
static VIDEO_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:https?://)?(?:www\.|m\.)?(?:youtube\.com/(?:watch\?v=|embed/)|youtu\.be/)[A-Za-z0-9_-]+(?:[?&#]\S*)?$",
    )
    .expect("video URL pattern is valid")
});

pub fn is_video_url(text: &str) -> bool {
    VIDEO_URL.is_match(text.trim())
}

/// PDF by declared media type, DOCX by filename suffix.
pub fn is_accepted_file(file: &FileSource) -> bool {
    file.media_type.eq_ignore_ascii_case(PDF_MEDIA_TYPE)
        || file.name.to_ascii_lowercase().ends_with(DOCX_SUFFIX)
}

/// What a drag-and-drop delivered.
#[derive(Debug, Clone, Default)]
pub struct DropPayload {
    /// Plain-text flavour of the drop, if any.
    pub text: Option<String>,
    pub files: Vec<FileSource>,
}

/// Validation rules for choosing a source.
#[derive(Debug, Clone, Copy)]
pub struct SourceSelector {
    max_upload_bytes: u64,
}

impl SourceSelector {
    pub fn new(max_upload_bytes: u64) -> Self {
        Self { max_upload_bytes }
    }

    pub fn select_file(&self, file: FileSource) -> Result<InputSource, ValidationError> {
        if !is_accepted_file(&file) {
            debug!(name = %file.name, media_type = %file.media_type, "rejected file type");
            return Err(ValidationError::UnsupportedFileType {
                name: file.name,
                media_type: file.media_type,
            });
        }
        if file.size() > self.max_upload_bytes {
            return Err(ValidationError::FileTooLarge {
                size: file.size(),
                name: file.name,
                limit: self.max_upload_bytes,
            });
        }
        Ok(InputSource::File(file))
    }

    /// Empty text clears the source without error. Text that is not a
    /// video link is an error carrying the text verbatim.
    pub fn select_remote_url(&self, text: &str) -> Result<InputSource, ValidationError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(InputSource::None);
        }
        if !is_video_url(trimmed) {
            return Err(ValidationError::InvalidRemoteUrl(text.to_owned()));
        }
        Ok(InputSource::RemoteVideo {
            url: trimmed.to_owned(),
        })
    }

    /// A video link in the text wins; otherwise the first file is used.
    pub fn select_from_drop(&self, payload: DropPayload) -> Result<InputSource, ValidationError> {
        if let Some(text) = payload.text.as_deref() {
            if is_video_url(text) {
                return self.select_remote_url(text);
            }
        }
        match payload.files.into_iter().next() {
            Some(file) => self.select_file(file),
            None => Err(ValidationError::UnrecognizedDrop),
        }
    }
}

/// Hover state of the drop target. Dragging over and out only changes the
/// highlight; the session is touched only by `drop`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DropZone {
    hovering: bool,
}

impl DropZone {
    pub fn drag_over(&mut self) {
        self.hovering = true;
    }

    pub fn drag_leave(&mut self) {
        self.hovering = false;
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    /// End the drag and hand the payload back for selection.
    pub fn drop(&mut self, payload: DropPayload) -> DropPayload {
        self.hovering = false;
        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> SourceSelector {
        SourceSelector::new(1024)
    }

    fn pdf() -> FileSource {
        FileSource::new("lesson.pdf", PDF_MEDIA_TYPE, b"%PDF".to_vec())
    }

    #[test]
    fn recognises_video_links() {
        for url in [
            "https://www.youtube.com/watch?v=abc123",
            "http://youtube.com/watch?v=dQw4w9WgXcQ&t=42s",
            "youtube.com/embed/dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "youtu.be/abc-_9",
            "  https://youtu.be/abc123  ",
        ] {
            assert!(is_video_url(url), "{url}");
        }
    }

    #[test]
    fn rejects_non_video_links() {
        for text in [
            "not a url",
            "https://www.youtube.com/",
            "https://www.youtube.com/watch?v=",
            "https://vimeo.com/12345",
            "https://example.com/?u=https://youtu.be/abc",
            "https://youtube.com.evil.org/watch?v=abc",
        ] {
            assert!(!is_video_url(text), "{text}");
        }
    }

    #[test]
    fn accepts_pdf_by_media_type_and_docx_by_suffix() {
        assert!(selector().select_file(pdf()).is_ok());
        let docx = FileSource::new("Essay.DOCX", "", b"PK".to_vec());
        assert!(selector().select_file(docx).is_ok());
        // A .pdf name without the PDF media type is not enough.
        let unlabeled = FileSource::new("scan.pdf", "application/octet-stream", vec![1]);
        assert!(selector().select_file(unlabeled).is_err());
    }

    #[test]
    fn other_files_are_unsupported() {
        let txt = FileSource::new("notes.txt", "text/plain", b"hi".to_vec());
        assert_eq!(
            selector().select_file(txt),
            Err(ValidationError::UnsupportedFileType {
                name: "notes.txt".into(),
                media_type: "text/plain".into(),
            })
        );
    }

    #[test]
    fn oversize_files_are_rejected() {
        let big = FileSource::new("big.pdf", PDF_MEDIA_TYPE, vec![0; 2048]);
        assert!(matches!(
            selector().select_file(big),
            Err(ValidationError::FileTooLarge { size: 2048, limit: 1024, .. })
        ));
    }

    #[test]
    fn invalid_url_keeps_text_verbatim() {
        assert_eq!(
            selector().select_remote_url("not a url"),
            Err(ValidationError::InvalidRemoteUrl("not a url".into()))
        );
    }

    #[test]
    fn empty_url_clears_without_error() {
        assert_eq!(selector().select_remote_url("   "), Ok(InputSource::None));
    }

    #[test]
    fn drop_prefers_video_text() {
        let payload = DropPayload {
            text: Some("https://youtu.be/abc123".into()),
            files: vec![pdf()],
        };
        assert_eq!(
            selector().select_from_drop(payload),
            Ok(InputSource::RemoteVideo {
                url: "https://youtu.be/abc123".into()
            })
        );
    }

    #[test]
    fn drop_falls_back_to_first_file() {
        let txt = FileSource::new("b.txt", "text/plain", vec![]);
        let payload = DropPayload {
            text: Some("just some words".into()),
            files: vec![pdf(), txt],
        };
        assert_eq!(selector().select_from_drop(payload), Ok(InputSource::File(pdf())));
    }

    #[test]
    fn drop_validates_the_file_like_manual_selection() {
        let payload = DropPayload {
            text: None,
            files: vec![FileSource::new("b.txt", "text/plain", vec![])],
        };
        assert!(matches!(
            selector().select_from_drop(payload),
            Err(ValidationError::UnsupportedFileType { .. })
        ));
    }

    #[test]
    fn empty_drop_is_unrecognized() {
        let payload = DropPayload {
            text: Some("hello".into()),
            files: vec![],
        };
        assert_eq!(
            selector().select_from_drop(payload),
            Err(ValidationError::UnrecognizedDrop)
        );
    }

    #[test]
    fn drag_hover_is_idempotent() {
        let mut zone = DropZone::default();
        zone.drag_over();
        zone.drag_over();
        assert!(zone.is_hovering());
        zone.drag_leave();
        zone.drag_leave();
        assert!(!zone.is_hovering());
        zone.drag_over();
        let _ = zone.drop(DropPayload::default());
        assert!(!zone.is_hovering());
    }
}
