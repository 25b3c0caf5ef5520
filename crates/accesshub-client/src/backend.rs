// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Trait seam between the session and whatever performs conversions.
//
// `ConversionClient` is the production implementation; tests substitute an
// in-process fake so the session can be driven without a network.

use std::future::Future;

use accesshub_core::error::Result;
use accesshub_core::types::{ConversionRequest, ConversionResult};

use crate::client::ConversionClient;

/// A conversion service reachable from the session.
pub trait ConversionBackend: Send + Sync {
    /// Submit one request. Never fails: failures are `ConversionResult`s.
    fn submit(
        &self,
        request: &ConversionRequest,
    ) -> impl Future<Output = ConversionResult> + Send;

    /// Retrieve the simplified content body named by `reference`.
    fn fetch_content(&self, reference: &str) -> impl Future<Output = Result<String>> + Send;
}

impl ConversionBackend for ConversionClient {
    async fn submit(&self, request: &ConversionRequest) -> ConversionResult {
        self.upload(request).await
    }

    async fn fetch_content(&self, reference: &str) -> Result<String> {
        self.fetch_result_body(reference).await
    }
}
