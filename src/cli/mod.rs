// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the vole command-line interface.
//!
//! Four subcommands covering the index lifecycle: `parse` turns a raw
//! collection into sorted runs plus sidecar statistics, `merge` folds the
//! runs into the final block-compressed index, `query` answers ranked
//! queries (batch TREC output or an interactive shell with snippets), and
//! `inspect` reports index statistics.

pub mod display;

use clap::{Parser, Subcommand, ValueEnum};

use vole::parse::DEFAULT_RUN_CAPACITY;
use vole::QueryMode;

#[derive(Parser)]
#[command(
    name = "vole",
    about = "Block-compressed inverted index and BM25 passage search",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a passage collection into sorted runs and sidecar stats
    Parse {
        /// Collection file: one `passage_id<TAB>text` per line
        #[arg(short, long)]
        collection: String,

        /// Working directory for runs and stats
        #[arg(short, long)]
        work_dir: String,

        /// Postings buffered in memory before spilling one run
        #[arg(long, default_value_t = DEFAULT_RUN_CAPACITY)]
        run_capacity: usize,
    },

    /// Merge sorted runs into the final index and lexicon
    Merge {
        /// Working directory containing `runs/` from a parse
        #[arg(short, long)]
        work_dir: String,
    },

    /// Answer ranked queries against a merged index
    Query {
        /// Working directory containing the merged index
        #[arg(short, long)]
        work_dir: String,

        /// Batch query file (`queryID<TAB>text` per line); omit for the
        /// interactive shell
        #[arg(short, long)]
        queries: Option<String>,

        /// Output file for TREC-format batch results
        #[arg(short, long, requires = "queries")]
        output: Option<String>,

        /// Conjunctive (and) or disjunctive (or) evaluation
        #[arg(short, long, value_enum, default_value = "or")]
        mode: Mode,

        /// Results per query
        #[arg(short = 'k', long, default_value_t = 1000)]
        top_k: usize,

        /// Collection file, enables passage snippets in the shell
        #[arg(long)]
        collection: Option<String>,
    },

    /// Report statistics about a merged index
    Inspect {
        /// Working directory containing the merged index
        #[arg(short, long)]
        work_dir: String,

        /// How many highest-df terms to list
        #[arg(long, default_value_t = 10)]
        top_terms: usize,
    },
}

/// CLI spelling of the two evaluation modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    And,
    Or,
}

impl From<Mode> for QueryMode {
    fn from(mode: Mode) -> QueryMode {
        match mode {
            Mode::And => QueryMode::Conjunctive,
            Mode::Or => QueryMode::Disjunctive,
        }
    }
}
