// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Block-level posting encode/decode.
//!
//! Postings are the heart of an inverted index: for each term, which
//! documents contain it and how often. Within a block the docID stream is
//! delta-coded (first value absolute, then gaps) because docIDs cluster and
//! small gaps varbyte-encode into single bytes. Frequencies are stored as
//! absolute values; they are small to begin with.
//!
//! Gaps are at least 1 by construction, since a docID appears at most once per
//! list. The decoder rejects a zero gap outright: it can only come from a
//! writer that appended the same docID twice, and letting it through would
//! silently break the strict ordering every downstream algorithm assumes.

use std::io;

use crate::codec::{decode_varbyte, encode_varbyte};

/// Encode one block of up-to-[`BLOCK_SIZE`](super::BLOCK_SIZE) postings into
/// two independent varbyte streams.
///
/// `doc_ids` must be strictly increasing and the same length as `freqs`.
/// The output buffers are cleared first.
pub fn encode_block(doc_ids: &[u32], freqs: &[u32], doc_buf: &mut Vec<u8>, freq_buf: &mut Vec<u8>) {
    debug_assert_eq!(doc_ids.len(), freqs.len());
    debug_assert!(doc_ids.windows(2).all(|w| w[0] < w[1]));

    doc_buf.clear();
    freq_buf.clear();

    let mut prev = 0u32;
    for (i, &doc_id) in doc_ids.iter().enumerate() {
        let gap = if i == 0 { doc_id } else { doc_id - prev };
        encode_varbyte(gap, doc_buf);
        prev = doc_id;
    }
    for &freq in freqs {
        encode_varbyte(freq, freq_buf);
    }
}

/// Decode one block back into absolute docIDs and frequencies.
///
/// Errors on: a truncated varbyte, a zero gap after the first docID
/// (duplicate docID, so a corrupt writer), docID overflow past 32 bits, or a
/// count mismatch between the two streams.
pub fn decode_block(doc_bytes: &[u8], freq_bytes: &[u8]) -> io::Result<(Vec<u32>, Vec<u32>)> {
    let mut doc_ids = Vec::new();
    let mut pos = 0;
    let mut current = 0u32;
    while pos < doc_bytes.len() {
        let (gap, consumed) = decode_varbyte(&doc_bytes[pos..])?;
        pos += consumed;
        if doc_ids.is_empty() {
            current = gap;
        } else {
            if gap == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "zero docID gap inside block (duplicate docID)",
                ));
            }
            current = current.checked_add(gap).ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidData, "docID gap overflows 32 bits")
            })?;
        }
        doc_ids.push(current);
    }

    let mut freqs = Vec::with_capacity(doc_ids.len());
    let mut pos = 0;
    while pos < freq_bytes.len() {
        let (freq, consumed) = decode_varbyte(&freq_bytes[pos..])?;
        pos += consumed;
        freqs.push(freq);
    }

    if doc_ids.len() != freqs.len() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "block decode mismatch: {} docIDs vs {} frequencies",
                doc_ids.len(),
                freqs.len()
            ),
        ));
    }

    Ok((doc_ids, freqs))
}
