// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Forward cursor over one term's posting list.
//!
//! An [`InvertedList`] owns a private read handle into the index file,
//! positioned by a lexicon entry. It decodes one block at a time, keeping
//! only the current block's docIDs and frequencies in memory, and exposes
//! the classic skip primitive: `next_geq(target)` returns the first docID
//! at or past `target`, loading and discarding whole blocks on the way.
//!
//! Corruption never surfaces as a partial list. Any decode or consistency
//! failure (a truncated varbyte, a block header past the lexicon's byte
//! budget, a stored term that isn't the one asked for) drops the cursor
//! into a sticky terminal state, after which `next_geq` only ever answers
//! [`MAX_DOC_ID`]. The DAAT loops upstairs treat that exactly like a list
//! that ended normally.
//!
//! Dropping the cursor closes its file handle; there is no explicit close
//! call to forget on an early-return path.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use super::postings::decode_block;
use super::{LexiconEntry, MAX_BLOCK_BYTES, MAX_DOC_ID, MAX_TERM_BYTES};
use crate::codec::read_u64;

/// Read cursor over one term's block-compressed postings.
pub struct InvertedList {
    term: String,
    file: BufReader<File>,
    num_blocks: u64,
    blocks_loaded: u64,
    /// Decoded postings of the current block.
    doc_ids: Vec<u32>,
    freqs: Vec<u32>,
    /// Next posting to consider within the current block.
    pos_in_block: usize,
    current_doc: u32,
    current_freq: u32,
    /// Bytes consumed so far, bounded by `total_bytes`.
    bytes_read: u64,
    total_bytes: u64,
    done: bool,
}

impl InvertedList {
    /// Open a cursor at the record described by `entry`, verify the stored
    /// term, and stage the first block.
    ///
    /// Errors only if the index file cannot be opened or seeked. Everything
    /// after that (term mismatch, truncation, corrupt blocks) yields an
    /// already-terminal cursor that reads as an empty list.
    pub fn open(index_path: &Path, term: &str, entry: &LexiconEntry) -> io::Result<InvertedList> {
        let mut file = BufReader::new(File::open(index_path)?);
        file.seek(SeekFrom::Start(entry.offset))?;

        let mut list = InvertedList {
            term: term.to_string(),
            file,
            num_blocks: 0,
            blocks_loaded: 0,
            doc_ids: Vec::new(),
            freqs: Vec::new(),
            pos_in_block: 0,
            current_doc: 0,
            current_freq: 0,
            bytes_read: 0,
            total_bytes: entry.length,
            done: false,
        };
        list.read_header();
        if !list.done {
            list.load_next_block();
        }
        Ok(list)
    }

    /// True until the list is exhausted or terminated by corruption.
    pub fn has_next(&self) -> bool {
        !self.done
    }

    /// Smallest docID `>= target`, advancing past it; [`MAX_DOC_ID`] when no
    /// such posting exists (the cursor is then terminal).
    ///
    /// Targets behind the current position are clamped forward: the cursor
    /// never rewinds, so a stale target returns the current frontier.
    pub fn next_geq(&mut self, target: u32) -> u32 {
        while !self.done {
            if self.pos_in_block >= self.doc_ids.len() {
                self.load_next_block();
                continue;
            }

            // Binary search in the undelivered tail of the block.
            let tail = &self.doc_ids[self.pos_in_block..];
            let found = self.pos_in_block + tail.partition_point(|&d| d < target);
            if found < self.doc_ids.len() {
                self.current_doc = self.doc_ids[found];
                self.current_freq = self.freqs[found];
                self.pos_in_block = found + 1;
                return self.current_doc;
            }
            self.load_next_block();
        }
        MAX_DOC_ID
    }

    /// Raw term frequency of the posting most recently returned by
    /// [`next_geq`](Self::next_geq). Returns 0.0 before the first hit.
    pub fn score(&self) -> f64 {
        f64::from(self.current_freq)
    }

    /// The term this cursor was opened for.
    pub fn term(&self) -> &str {
        &self.term
    }

    // ------------------------------------------------------------------
    // internals
    // ------------------------------------------------------------------

    /// Terminate the cursor, reporting why. Terminal is sticky: every
    /// failure path funnels through here and the cursor then reads as
    /// end-of-list.
    fn terminate(&mut self, reason: &str) {
        if !self.done {
            eprintln!("warning: posting list '{}' terminated: {}", self.term, reason);
            self.done = true;
        }
    }

    fn read_header(&mut self) {
        let term_size = match read_u64(&mut self.file) {
            Ok(n) => n,
            Err(e) => return self.terminate(&format!("term size unreadable: {}", e)),
        };
        self.bytes_read += 8;

        if term_size > MAX_TERM_BYTES || self.bytes_read + term_size > self.total_bytes {
            return self.terminate(&format!("implausible term size {}", term_size));
        }

        let mut stored = vec![0u8; term_size as usize];
        if let Err(e) = self.file.read_exact(&mut stored) {
            return self.terminate(&format!("term text unreadable: {}", e));
        }
        self.bytes_read += term_size;

        if stored != self.term.as_bytes() {
            return self.terminate(&format!(
                "stored term {:?} does not match",
                String::from_utf8_lossy(&stored)
            ));
        }

        match read_u64(&mut self.file) {
            Ok(n) => self.num_blocks = n,
            Err(e) => return self.terminate(&format!("block count unreadable: {}", e)),
        }
        self.bytes_read += 8;

        if self.num_blocks == 0 {
            // A writer never emits a term without postings, but an empty
            // record still has a well-defined meaning: nothing to return.
            self.done = true;
        }
    }

    fn load_next_block(&mut self) {
        if self.blocks_loaded >= self.num_blocks {
            self.done = true;
            return;
        }

        let doc_ids_size = match read_u64(&mut self.file) {
            Ok(n) => n,
            Err(e) => return self.terminate(&format!("block header unreadable: {}", e)),
        };
        let freqs_size = match read_u64(&mut self.file) {
            Ok(n) => n,
            Err(e) => return self.terminate(&format!("block header unreadable: {}", e)),
        };
        self.bytes_read += 16;

        if doc_ids_size > MAX_BLOCK_BYTES || freqs_size > MAX_BLOCK_BYTES {
            return self.terminate(&format!(
                "block sizes implausible ({} / {} bytes)",
                doc_ids_size, freqs_size
            ));
        }
        if self.bytes_read + doc_ids_size + freqs_size > self.total_bytes {
            return self.terminate(&format!(
                "block overruns lexicon length ({} + {} + {} > {})",
                self.bytes_read, doc_ids_size, freqs_size, self.total_bytes
            ));
        }

        let mut doc_bytes = vec![0u8; doc_ids_size as usize];
        if let Err(e) = self.file.read_exact(&mut doc_bytes) {
            return self.terminate(&format!("docID stream unreadable: {}", e));
        }
        self.bytes_read += doc_ids_size;

        let mut freq_bytes = vec![0u8; freqs_size as usize];
        if let Err(e) = self.file.read_exact(&mut freq_bytes) {
            return self.terminate(&format!("frequency stream unreadable: {}", e));
        }
        self.bytes_read += freqs_size;

        match decode_block(&doc_bytes, &freq_bytes) {
            Ok((doc_ids, freqs)) => {
                self.doc_ids = doc_ids;
                self.freqs = freqs;
                self.pos_in_block = 0;
                self.blocks_loaded += 1;
            }
            Err(e) => self.terminate(&format!("block decode failed: {}", e)),
        }
    }
}

impl std::fmt::Debug for InvertedList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvertedList")
            .field("term", &self.term)
            .field("blocks", &format_args!("{}/{}", self.blocks_loaded, self.num_blocks))
            .field("done", &self.done)
            .finish()
    }
}
