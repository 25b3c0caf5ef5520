// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer — owns the conversion session, the backend and the
// user's preferences, and exposes the actions a front end can trigger.
//
// The session sits behind a `Mutex` that is only taken around synchronous
// transitions. It is never held across a network await, so `reset` and
// source selection stay responsive while a conversion is in flight.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{info, warn};

use accesshub_client::{ConversionBackend, ConversionClient, Endpoints, ResultAssembler};
use accesshub_core::AppConfig;
use accesshub_core::error::{Result, ValidationError};
use accesshub_core::locale::LocaleRegistry;
use accesshub_core::types::{FileSource, SessionState};

use super::data_dir;
use crate::selector::{DropPayload, DropZone, SourceSelector};
use crate::session::{ConversionSession, Step};
use crate::settings::AccessibilitySettings;
use crate::view::ResultView;

const CONFIG_FILE: &str = "config.json";

/// Shared application services.
///
/// All fields are Arc-wrapped so the struct can be cloned into tasks.
pub struct AppServices<B = ConversionClient> {
    backend: Arc<B>,
    assembler: Arc<ResultAssembler>,
    session: Arc<Mutex<ConversionSession>>,
    drop_zone: Arc<Mutex<DropZone>>,
    accessibility: Arc<AccessibilitySettings>,
    config: Arc<Mutex<AppConfig>>,
    data_dir: PathBuf,
}

impl<B> Clone for AppServices<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            assembler: Arc::clone(&self.assembler),
            session: Arc::clone(&self.session),
            drop_zone: Arc::clone(&self.drop_zone),
            accessibility: Arc::clone(&self.accessibility),
            config: Arc::clone(&self.config),
            data_dir: self.data_dir.clone(),
        }
    }
}

impl AppServices<ConversionClient> {
    /// Initialise from the platform data directory. `adjust` is applied to
    /// the loaded preferences before anything is built from them.
    pub fn init(adjust: impl FnOnce(&mut AppConfig)) -> Result<Self> {
        Self::open(data_dir::data_dir(), adjust)
    }

    pub fn open(dir: PathBuf, adjust: impl FnOnce(&mut AppConfig)) -> Result<Self> {
        info!(path = %dir.display(), "initialising app services");
        let mut config = load_config(&dir).unwrap_or_default();
        adjust(&mut config);
        let client = ConversionClient::new(&config)?;
        Self::with_backend(dir, config, client)
    }
}

impl<B: ConversionBackend> AppServices<B> {
    pub fn with_backend(dir: PathBuf, config: AppConfig, backend: B) -> Result<Self> {
        config.validate()?;
        let registry = Arc::new(LocaleRegistry::builtin());
        let session = ConversionSession::new(
            registry,
            &config.language,
            SourceSelector::new(config.max_upload_bytes),
        );

        info!(
            api = %config.api_base_url,
            language = %config.language,
            "app services initialised"
        );

        let endpoints = Endpoints::new(&config.api_base_url)?;
        Ok(Self {
            backend: Arc::new(backend),
            assembler: Arc::new(ResultAssembler::new(endpoints)),
            session: Arc::new(Mutex::new(session)),
            drop_zone: Arc::new(Mutex::new(DropZone::default())),
            accessibility: Arc::new(AccessibilitySettings::new(config.accessibility)),
            config: Arc::new(Mutex::new(config)),
            data_dir: dir,
        })
    }

    fn session(&self) -> MutexGuard<'_, ConversionSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // -- Conversion ----------------------------------------------------------

    /// Submit the active source and wait for the outcome. Returns the
    /// session snapshot afterwards, which may be a later state if the
    /// submission was abandoned meanwhile.
    pub async fn convert(&self) -> Result<SessionState> {
        let ticket = self.session().begin_submit()?;

        let response = self.backend.submit(ticket.request()).await;
        let step = self.session().apply_response(&ticket, response);

        if let Step::FetchContent { reference } = step {
            let outcome = self
                .assembler
                .fetch_content(self.backend.as_ref(), reference.as_deref())
                .await;
            self.session().apply_artifacts(&ticket, outcome);
        }
        Ok(self.snapshot())
    }

    pub fn select_file(&self, file: FileSource) -> std::result::Result<(), ValidationError> {
        self.session().select_file(file)
    }

    pub fn select_remote_url(&self, text: &str) -> std::result::Result<(), ValidationError> {
        self.session().select_remote_url(text)
    }

    pub fn select_from_drop(&self, payload: DropPayload) -> std::result::Result<(), ValidationError> {
        self.session().select_from_drop(payload)
    }

    // -- Drag and drop -------------------------------------------------------

    pub fn drag_over(&self) {
        self.drop_zone().drag_over();
    }

    pub fn drag_leave(&self) {
        self.drop_zone().drag_leave();
    }

    /// Whether the drop target should be highlighted.
    pub fn is_drop_hovering(&self) -> bool {
        self.drop_zone().is_hovering()
    }

    /// End a drag over the drop target and select from what was dropped.
    pub fn drop_payload(&self, payload: DropPayload) -> std::result::Result<(), ValidationError> {
        let payload = DropZone::drop(&mut self.drop_zone(), payload);
        self.select_from_drop(payload)
    }

    fn drop_zone(&self) -> MutexGuard<'_, DropZone> {
        self.drop_zone.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A source is active and no conversion is in flight.
    pub fn can_submit(&self) -> bool {
        self.session().can_submit()
    }

    pub fn reset(&self) {
        self.session().reset();
    }

    pub fn snapshot(&self) -> SessionState {
        self.session().state().clone()
    }

    pub fn view(&self) -> ResultView {
        let session = self.session();
        let links = session
            .state()
            .result
            .as_ref()
            .map(|r| self.assembler.links(r))
            .unwrap_or_default();
        ResultView::build(
            session.state(),
            &links,
            self.accessibility.snapshot(),
            session.locale(),
        )
    }

    // -- Preferences ---------------------------------------------------------

    pub fn set_language(&self, code: &str) {
        self.session().set_language(code);
        self.lock_config().language = code.to_owned();
    }

    /// The display adaptations handle, for renderers and toggles.
    pub fn accessibility(&self) -> &AccessibilitySettings {
        &self.accessibility
    }

    pub fn config(&self) -> AppConfig {
        self.lock_config().clone()
    }

    /// Write the current language and display adaptations to disk.
    pub fn save_preferences(&self) -> Result<()> {
        let mut config = self.lock_config();
        config.accessibility = self.accessibility.snapshot();
        persist_config(&self.data_dir, &config)?;
        info!(path = %self.data_dir.display(), "preferences saved");
        Ok(())
    }

    fn lock_config(&self) -> MutexGuard<'_, AppConfig> {
        self.config.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn load_config(data_dir: &Path) -> Option<AppConfig> {
    let path = data_dir.join(CONFIG_FILE);
    let data = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&data) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable config");
            None
        }
    }
}

fn persist_config(data_dir: &Path, config: &AppConfig) -> Result<()> {
    std::fs::create_dir_all(data_dir)?;
    let path = data_dir.join(CONFIG_FILE);
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json)?;
    Ok(())
}
