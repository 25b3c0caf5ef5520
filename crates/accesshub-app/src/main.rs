// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Accessibility Learning Hub — command-line shell.
//
// Entry point. Initialises logging and services, selects one source, runs a
// single conversion and prints the localized result.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use accesshub_core::error::HubError;
use accesshub_core::human_errors::describe;
use accesshub_core::locale::{
    BASE_LANGUAGE, LocaleRegistry, SUPPORTED_LANGUAGES, is_supported_language,
};
use accesshub_core::types::{FileSource, SessionPhase};

use accesshub_app::services::app_services::AppServices;
use accesshub_app::settings::AccessibilitySettings;
use accesshub_app::view;

#[derive(Parser, Debug)]
#[command(name = "accesshub")]
#[command(about = "Turn documents and lecture videos into accessible study material")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a PDF/DOCX file or a YouTube link
    Convert(ConvertArgs),
    /// List the languages a conversion can be requested in
    Languages,
}

#[derive(clap::Args, Debug)]
struct ConvertArgs {
    /// Document to upload (PDF or DOCX)
    #[arg(long, value_name = "PATH", conflicts_with = "url", required_unless_present = "url")]
    file: Option<PathBuf>,

    /// YouTube link to convert
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Language code for the interface and the generated material
    #[arg(short, long, value_name = "CODE")]
    language: Option<String>,

    /// Base URL of the conversion service
    #[arg(long, env = "ACCESSHUB_API_BASE_URL")]
    api_base_url: Option<String>,

    /// Mark the simplified content for the dyslexia-friendly font
    #[arg(long)]
    dyslexic_font: bool,

    #[arg(long)]
    high_contrast: bool,

    #[arg(long)]
    invert_colors: bool,

    /// Remember the language and display options for next time
    #[arg(long)]
    save_preferences: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Languages => {
            for (code, name) in SUPPORTED_LANGUAGES {
                println!("{code}\t{name}");
            }
            ExitCode::SUCCESS
        }
        Command::Convert(args) => convert(args).await,
    }
}

async fn convert(args: ConvertArgs) -> ExitCode {
    tracing::info!("Accessibility Learning Hub starting");

    let svc = match AppServices::init(|config| {
        if let Some(language) = &args.language {
            config.language = language.clone();
        }
        if let Some(url) = &args.api_base_url {
            config.api_base_url = url.clone();
        }
    }) {
        Ok(svc) => svc,
        Err(e) => {
            let language = args.language.as_deref().unwrap_or(BASE_LANGUAGE);
            report_error(&e, language);
            return ExitCode::FAILURE;
        }
    };

    let language = svc.config().language;
    if !is_supported_language(&language) {
        tracing::warn!(language = %language, "unsupported language, interface falls back to English");
    }
    apply_display_flags(svc.accessibility(), &args);

    // A rejected selection has already left its message in the session.
    match (&args.file, &args.url) {
        (Some(path), _) => match read_file(path) {
            Ok(file) => {
                let _ = svc.select_file(file);
            }
            Err(e) => {
                report_error(&HubError::Io(e), &language);
                return ExitCode::FAILURE;
            }
        },
        (None, Some(url)) => {
            let _ = svc.select_remote_url(url);
        }
        (None, None) => {}
    }

    if svc.can_submit() {
        if let Err(e) = svc.convert().await {
            tracing::debug!(error = %e, "conversion not started");
        }
    }

    if args.save_preferences {
        if let Err(e) = svc.save_preferences() {
            report_error(&e, &language);
        }
    }

    print!("{}", view::render_text(&svc.view()));
    if svc.snapshot().phase == SessionPhase::Ready {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Command-line flags only switch adaptations on; saved ones stay on.
fn apply_display_flags(settings: &AccessibilitySettings, args: &ConvertArgs) {
    let current = settings.snapshot();
    if args.dyslexic_font && !current.dyslexic_font_enabled {
        settings.toggle_dyslexic_font();
    }
    if args.high_contrast && !current.high_contrast_enabled {
        settings.toggle_high_contrast();
    }
    if args.invert_colors && !current.color_inverted_enabled {
        settings.toggle_color_inversion();
    }
}

fn read_file(path: &Path) -> std::io::Result<FileSource> {
    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let media_type = mime_guess::from_path(path).first_raw().unwrap_or_default();
    Ok(FileSource::new(name, media_type, bytes))
}

fn report_error(err: &HubError, language: &str) {
    let table = LocaleRegistry::builtin().resolve(language);
    eprintln!("{}", describe(err, &table).text);
}
