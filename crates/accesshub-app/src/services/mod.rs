// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer — bridges the command-line shell to the session, the
// conversion client and the persisted preferences.

pub mod app_services;
pub mod data_dir;
