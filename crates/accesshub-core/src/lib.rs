// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Accessibility Learning Hub — core types, errors, configuration and UI
// localization shared across all crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod integrity;
pub mod locale;
pub mod types;

pub use config::AppConfig;
pub use error::{ErrorCategory, HubError, ValidationError};
pub use locale::{LocaleRegistry, LocaleTable};
pub use types::*;
