// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Document-at-a-time evaluation over a set of term cursors.
//!
//! Both modes walk all cursors in docID order and score each matching
//! document exactly once, pushing it through the bounded top-k heap.
//! Conjunctive evaluation repeatedly aligns every cursor on a candidate
//! docID, galloping past documents that cannot match; disjunctive
//! evaluation visits the frontier minimum and folds in every cursor parked
//! there. A cursor that terminates, whether exhausted or corrupt, looks like an
//! empty remainder, which is exactly how the loops treat it.
//!
//! Cursors are consumed by value; their file handles close when the vector
//! drops, on every path out of these functions.
//!
//! # References
//!
//! - **DAAT with skipping**: Broder, Carmel, Herscovici, Soffer, Zien
//!   (2003): "Efficient Query Evaluation using a Two-Level Retrieval
//!   Process", CIKM (the `nextGEQ` alignment pattern).

use crate::index::{InvertedList, MAX_DOC_ID};

use super::bm25::Bm25;
use super::stats::DocumentLengths;
use super::topk::{ScoredDoc, TopK};

/// One opened posting list plus the lexicon statistics BM25 needs.
#[derive(Debug)]
pub struct TermCursor {
    pub list: InvertedList,
    pub doc_frequency: u32,
}

/// Documents containing *every* term, ranked by summed BM25.
///
/// The caller is responsible for the missing-term rule: a query term absent
/// from the lexicon means an empty result, and these cursors should never
/// be opened. An empty cursor set here also evaluates to no results.
pub fn conjunctive(
    mut cursors: Vec<TermCursor>,
    lengths: &DocumentLengths,
    scorer: &Bm25,
    k: usize,
) -> Vec<ScoredDoc> {
    let mut topk = TopK::new(k);
    if cursors.is_empty() {
        return topk.into_sorted();
    }

    let mut frontier: Vec<u32> = cursors.iter_mut().map(|c| c.list.next_geq(0)).collect();

    'scan: while !frontier.contains(&MAX_DOC_ID) {
        let mut did = frontier[0];

        // Align every cursor on `did`; any advance past it restarts the
        // alignment with the larger candidate.
        'align: loop {
            for i in 0..cursors.len() {
                if frontier[i] < did {
                    frontier[i] = cursors[i].list.next_geq(did);
                }
                if frontier[i] == MAX_DOC_ID {
                    break 'scan;
                }
                if frontier[i] > did {
                    did = frontier[i];
                    continue 'align;
                }
            }
            break 'align;
        }

        // All cursors sit on `did`: score and step everyone past it.
        let doc_len = lengths.get(did);
        let mut score = 0.0;
        for (i, cursor) in cursors.iter_mut().enumerate() {
            score += scorer.score(cursor.list.score(), cursor.doc_frequency, doc_len);
            frontier[i] = cursor.list.next_geq(did + 1);
        }
        topk.insert(did, score);
    }

    topk.into_sorted()
}

/// Documents containing *any* term, ranked by summed BM25 over the terms
/// they contain.
pub fn disjunctive(
    mut cursors: Vec<TermCursor>,
    lengths: &DocumentLengths,
    scorer: &Bm25,
    k: usize,
) -> Vec<ScoredDoc> {
    let mut topk = TopK::new(k);
    if cursors.is_empty() {
        return topk.into_sorted();
    }

    let mut frontier: Vec<u32> = cursors.iter_mut().map(|c| c.list.next_geq(0)).collect();

    loop {
        let did = match frontier.iter().copied().min() {
            Some(min) if min < MAX_DOC_ID => min,
            _ => break,
        };

        let doc_len = lengths.get(did);
        let mut score = 0.0;
        for (i, cursor) in cursors.iter_mut().enumerate() {
            if frontier[i] == did {
                score += scorer.score(cursor.list.score(), cursor.doc_frequency, doc_len);
                frontier[i] = cursor.list.next_geq(did + 1);
            }
        }
        topk.insert(did, score);
    }

    topk.into_sorted()
}
