// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// accesshub-client — HTTP plumbing for the conversion service: upload
// submission, response interpretation, and assembly of the resulting
// artifacts.

pub mod assembler;
pub mod backend;
pub mod client;
pub mod response;

pub use assembler::{ArtifactLinks, ContentOutcome, ResultAssembler};
pub use backend::ConversionBackend;
pub use client::{ConversionClient, Endpoints};
