// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Upload fingerprints, so a submission can be matched to the document that
// produced it in the logs without logging the document itself.

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of an uploaded document.
pub fn document_fingerprint(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_has_the_well_known_digest() {
        assert_eq!(
            document_fingerprint(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn same_bytes_same_fingerprint() {
        let a = document_fingerprint(b"%PDF-1.7 lesson");
        assert_eq!(a, document_fingerprint(b"%PDF-1.7 lesson"));
        assert_ne!(a, document_fingerprint(b"%PDF-1.7 lesson 2"));
        assert_eq!(a.len(), 64);
    }
}
