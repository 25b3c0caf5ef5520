// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Presentation model — everything a renderer needs, already localized.
//
// Built fresh from a session snapshot each time; holds no state of its own.

use std::fmt::Write as _;

use accesshub_client::ArtifactLinks;
use accesshub_core::locale::LocaleTable;
use accesshub_core::types::{
    AccessibilityReport, AccessibilityState, SessionPhase, SessionState, StatusKind,
    StatusMessage, display_label,
};

use crate::settings::{container_classes, content_classes};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub title: String,
    pub phase: SessionPhase,
    pub status: StatusMessage,
    /// Name of the selected file or the link text.
    pub source_label: Option<String>,
    pub generate_label: String,
    pub can_generate: bool,
    pub container_classes: Vec<&'static str>,
    /// Present once a conversion completed.
    pub completed: Option<CompletedView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedView {
    pub heading: String,
    pub report: Option<ReportView>,
    pub audio_title: String,
    /// The audio URL, or the localized "missing" note.
    pub audio: Result<String, String>,
    pub downloads: Vec<DownloadLink>,
    pub content_title: String,
    /// The content body, or the localized "could not load" placeholder.
    pub content: Result<String, String>,
    pub content_classes: Vec<&'static str>,
    pub start_new_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportView {
    pub title: String,
    pub score_label: String,
    pub summary_score: String,
    pub passed: bool,
    pub readability_title: String,
    pub readability: Vec<(String, String)>,
    pub structure_title: String,
    pub structure: Vec<(String, String)>,
    pub note: Option<String>,
}

impl ReportView {
    fn build(report: &AccessibilityReport, locale: &LocaleTable) -> Self {
        Self {
            title: locale.get("result.report_title").to_owned(),
            score_label: locale.get("result.overall_score").to_owned(),
            summary_score: report.summary_score.clone(),
            passed: report.is_pass(),
            readability_title: locale.get("result.readability").to_owned(),
            readability: labelled(report.readability_rows()),
            structure_title: locale.get("result.structure").to_owned(),
            structure: labelled(report.structure_rows()),
            note: report.note().map(str::to_owned),
        }
    }
}

fn labelled<'a>(rows: impl Iterator<Item = (&'a str, &'a str)>) -> Vec<(String, String)> {
    rows.map(|(k, v)| (display_label(k), v.to_owned())).collect()
}

impl ResultView {
    pub fn build(
        state: &SessionState,
        links: &ArtifactLinks,
        accessibility: AccessibilityState,
        locale: &LocaleTable,
    ) -> Self {
        let busy = state.phase.is_busy();
        let generate_label = if busy {
            locale.get("action.processing")
        } else {
            locale.get("action.generate")
        };

        let completed = state
            .result
            .as_ref()
            .filter(|r| r.is_completed() && state.phase == SessionPhase::Ready)
            .map(|result| {
                let mut downloads = Vec::new();
                if let Some(url) = &links.audio {
                    downloads.push(DownloadLink {
                        label: locale.get("result.download_audio").to_owned(),
                        url: url.clone(),
                    });
                }
                if let Some(url) = &links.epub {
                    downloads.push(DownloadLink {
                        label: locale.get("result.download_epub").to_owned(),
                        url: url.clone(),
                    });
                }
                if let Some(url) = &links.pdf {
                    downloads.push(DownloadLink {
                        label: locale.get("result.download_pdf").to_owned(),
                        url: url.clone(),
                    });
                }

                CompletedView {
                    heading: locale.get("result.complete").to_owned(),
                    report: result.report.as_ref().map(|r| ReportView::build(r, locale)),
                    audio_title: locale.get("result.audio_title").to_owned(),
                    audio: links
                        .audio
                        .clone()
                        .ok_or_else(|| locale.get("result.audio_missing").to_owned()),
                    downloads,
                    content_title: locale.get("result.content_title").to_owned(),
                    content: result
                        .content_body
                        .clone()
                        .ok_or_else(|| locale.get("result.content_unavailable").to_owned()),
                    content_classes: content_classes(accessibility),
                    start_new_label: locale.get("action.start_new").to_owned(),
                }
            });

        Self {
            title: locale.get("app.title").to_owned(),
            phase: state.phase,
            status: state.status.clone(),
            source_label: state.source.display_name().map(str::to_owned),
            generate_label: generate_label.to_owned(),
            can_generate: !state.source.is_none() && !busy,
            container_classes: container_classes(accessibility),
            completed,
        }
    }
}

/// Plain-text rendering for the terminal.
pub fn render_text(view: &ResultView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.title);

    if !view.status.is_empty() {
        let tag = match view.status.kind {
            StatusKind::Neutral | StatusKind::Info => "",
            StatusKind::Success => "[ok] ",
            StatusKind::Warning(_) => "[warning] ",
            StatusKind::Error(_) => "[error] ",
        };
        let _ = writeln!(out, "{tag}{}", view.status.text);
    }

    let Some(done) = &view.completed else {
        return out;
    };

    let _ = writeln!(out, "\n{}", done.heading);

    if let Some(report) = &done.report {
        let verdict = if report.passed { "pass" } else { "review" };
        let _ = writeln!(out, "\n== {} ==", report.title);
        let _ = writeln!(
            out,
            "{}: {} ({verdict})",
            report.score_label, report.summary_score
        );
        let _ = writeln!(out, "-- {} --", report.readability_title);
        for (label, value) in &report.readability {
            let _ = writeln!(out, "  {label}: {value}");
        }
        let _ = writeln!(out, "-- {} --", report.structure_title);
        for (label, value) in &report.structure {
            let _ = writeln!(out, "  {label}: {value}");
        }
        if let Some(note) = &report.note {
            let _ = writeln!(out, "  {note}");
        }
    }

    let _ = writeln!(out, "\n== {} ==", done.audio_title);
    let (Ok(audio) | Err(audio)) = &done.audio;
    let _ = writeln!(out, "{audio}");
    for link in &done.downloads {
        let _ = writeln!(out, "{}: {}", link.label, link.url);
    }

    let _ = writeln!(out, "\n== {} ==", done.content_title);
    let (Ok(content) | Err(content)) = &done.content;
    let _ = writeln!(out, "{content}");
    out
}
