// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Accessibility Learning Hub — conversion session orchestration.
//
// Source selection, the conversion state machine, display adaptations and
// the presentation model, with `services::app_services::AppServices` as the
// entry point a front end drives. The `accesshub` binary is one such front
// end.

pub mod selector;
pub mod services;
pub mod session;
pub mod settings;
pub mod view;
