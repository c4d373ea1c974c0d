// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The block-compressed inverted index: on-disk format, writer, and cursor.
//!
//! One index is two files. `index.bin` is a concatenation of per-term
//! records; `lexicon.txt` maps each term to its record. A record is:
//!
//! ```text
//! term_size  : u64 LE
//! term_text  : term_size bytes, raw
//! num_blocks : u64 LE
//! blocks[num_blocks]:
//!     doc_ids_size : u64 LE
//!     freqs_size   : u64 LE
//!     doc_ids      : doc_ids_size bytes (varbyte, delta-coded)
//!     freqs        : freqs_size bytes (varbyte, absolute)
//! ```
//!
//! Blocks hold up to [`BLOCK_SIZE`] postings. Delta coding restarts at every
//! block boundary: the first docID of a block is absolute, the rest are gaps
//! from their predecessor. A block decodes in isolation given only its own
//! bytes, which is what makes `next_geq` skipping possible without touching
//! earlier blocks.
//!
//! The index file and lexicon are written once by the merger and immutable
//! afterwards. Readers each own a private file handle; nothing here is
//! shared mutable state.
//!
//! # References
//!
//! - **Blocked postings + skipping**: Zobel & Moffat (2006): "Inverted Files
//!   for Text Search Engines", ACM Computing Surveys 38(2), §6.
//! - **Document-ordered index organization**: Croft, Metzler, Strohman
//!   (2009): "Search Engines: Information Retrieval in Practice", ch. 5.

pub mod cursor;
pub mod lexicon;
pub mod merge;
pub mod postings;

pub use cursor::InvertedList;
pub use lexicon::{Lexicon, LexiconEntry};
pub use merge::{merge_runs, MergeStats};

// ============================================================================
// FORMAT CONSTANTS
// ============================================================================

/// Postings per block. Delta coding resets at each block boundary.
pub const BLOCK_SIZE: usize = 128;

/// Exhausted-cursor sentinel. Larger than any valid docID.
pub const MAX_DOC_ID: u32 = i32::MAX as u32;

// ============================================================================
// SECURITY LIMITS (prevent resource exhaustion from corrupt input)
// ============================================================================

/// Maximum plausible byte size for one encoded block stream: 100 MiB.
/// A block holds at most [`BLOCK_SIZE`] varbytes, so anything near this
/// bound means the header is garbage.
pub const MAX_BLOCK_BYTES: u64 = 100 * 1024 * 1024;

/// Maximum term length in bytes. Tokens come out of an ASCII tokenizer;
/// a multi-kilobyte "term" in a header is corruption.
pub const MAX_TERM_BYTES: u64 = 4096;
