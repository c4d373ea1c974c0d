//! Disk-resident block-compressed inverted index with BM25 retrieval.
//!
//! This crate builds a searchable index over a passage collection
//! (`passage_id<TAB>text` lines) and answers ranked queries over it. The
//! pipeline is classic external-memory indexing: parse into sorted runs,
//! k-way merge into one block-compressed index, then evaluate queries
//! document-at-a-time over per-term cursors.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────┐    ┌──────────────┐    ┌─────────────────────┐
//! │  parse    │───▶│ index::merge │───▶│ index.bin + lexicon │
//! │ (runs +   │    │ (k-way heap, │    │ (blocked varbyte    │
//! │  sidecars)│    │  block write)│    │  postings)          │
//! └───────────┘    └──────────────┘    └─────────────────────┘
//!                                                │
//!                        ┌───────────────────────┘
//!                        ▼
//!               ┌────────────────┐    ┌──────────────────────┐
//!               │ index::cursor  │───▶│ query::daat + bm25   │
//!               │ (next_geq over │    │ (AND / OR top-k over │
//!               │  blocks)       │    │  aligned cursors)    │
//!               └────────────────┘    └──────────────────────┘
//! ```
//!
//! The on-disk format is documented in [`index`]; the varbyte convention it
//! depends on lives in [`codec`].
//!
//! # Usage
//!
//! ```ignore
//! use vole::parse::{parse_collection, ParserConfig};
//! use vole::index::merge_runs;
//! use vole::query::{QueryEngine, QueryMode};
//!
//! parse_collection(&collection, &work, &ParserConfig::default(), None)?;
//! merge_runs(&vole::layout::run_files(&work)?, &index, &lexicon, None)?;
//!
//! let engine = QueryEngine::open(&work)?;
//! let hits = engine.evaluate_text("rains in spain", QueryMode::Disjunctive, 10)?;
//! ```

pub mod codec;
pub mod index;
pub mod layout;
pub mod parse;
pub mod query;

pub use index::{merge_runs, InvertedList, Lexicon, LexiconEntry, MergeStats, MAX_DOC_ID};
pub use parse::{parse_collection, tokenize, ParseStats, ParserConfig};
pub use query::{QueryEngine, QueryMode, ScoredDoc};
