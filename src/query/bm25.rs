// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Okapi BM25 term-document scoring.
//!
//! The idf uses the additive-one smoothing form, which stays positive even
//! for terms that appear in more than half the collection. Scores are
//! additive across query terms; the DAAT loops sum one call per aligned
//! cursor.
//!
//! # References
//!
//! - Robertson & Zaragoza (2009): "The Probabilistic Relevance Framework:
//!   BM25 and Beyond", Foundations and Trends in IR 3(4).

/// Term-frequency saturation.
pub const K1: f64 = 1.5;

/// Document-length normalization strength.
pub const B: f64 = 0.75;

/// BM25 scorer fixed to one collection's statistics.
#[derive(Debug, Clone, Copy)]
pub struct Bm25 {
    total_docs: f64,
    avg_doc_len: f64,
}

impl Bm25 {
    pub fn new(total_docs: u32, avg_doc_len: f64) -> Self {
        Bm25 {
            total_docs: f64::from(total_docs),
            avg_doc_len,
        }
    }

    /// Score one (term, document) pair.
    ///
    /// `tf` is the raw term frequency, `doc_frequency` the number of
    /// documents containing the term, `doc_len` the document's token count.
    pub fn score(&self, tf: f64, doc_frequency: u32, doc_len: u32) -> f64 {
        let df = f64::from(doc_frequency);
        let idf = ((self.total_docs - df + 0.5) / (df + 0.5) + 1.0).ln();

        // Degenerate collections (avgdl 0) skip length normalization
        // rather than dividing by zero.
        let len_ratio = if self.avg_doc_len > 0.0 {
            f64::from(doc_len) / self.avg_doc_len
        } else {
            0.0
        };
        let tfc = tf * (K1 + 1.0) / (tf + K1 * (1.0 - B + B * len_ratio));
        idf * tfc
    }
}
