// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! vole CLI: parse, merge, query, and inspect passage search indexes.
//!
//! ```bash
//! # Parse the collection into sorted runs + sidecar stats
//! vole parse --collection passages.tsv --work-dir ./work
//!
//! # Merge runs into the final block-compressed index
//! vole merge --work-dir ./work
//!
//! # Batch evaluation, TREC output
//! vole query --work-dir ./work --queries queries.tsv --output results.trec
//!
//! # Interactive shell with snippets
//! vole query --work-dir ./work --collection passages.tsv --mode and -k 10
//! ```

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use vole::index::merge_runs;
use vole::parse::{parse_collection, ParserConfig};
use vole::query::{PassageStore, QueryEngine, QueryMode};
use vole::{layout, Lexicon};

mod cli;
use cli::display::{format_size, styled, truncate_snippet, BOLD, CYAN, DIM, GREEN, YELLOW};
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse {
            collection,
            work_dir,
            run_capacity,
        } => run_parse(&collection, &work_dir, run_capacity),
        Commands::Merge { work_dir } => run_merge(&work_dir),
        Commands::Query {
            work_dir,
            queries,
            output,
            mode,
            top_k,
            collection,
        } => run_query(
            &work_dir,
            queries.as_deref(),
            output.as_deref(),
            mode.into(),
            top_k,
            collection.as_deref(),
        ),
        Commands::Inspect {
            work_dir,
            top_terms,
        } => run_inspect(&work_dir, top_terms),
    };

    if let Err(e) = result {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {prefix:<8} [{bar:40.cyan/dim}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━━╸")
}

fn run_parse(collection: &str, work_dir: &str, run_capacity: usize) -> Result<(), String> {
    let collection_path = Path::new(collection);
    let work_path = Path::new(work_dir);
    fs::create_dir_all(work_path).map_err(|e| format!("Failed to create work dir: {}", e))?;

    let total_bytes = fs::metadata(collection_path)
        .map_err(|e| format!("Failed to stat {}: {}", collection, e))?
        .len();

    let pb = ProgressBar::new(total_bytes);
    pb.set_style(bar_style());
    pb.set_prefix("Parsing");

    let config = ParserConfig { run_capacity };
    let started = Instant::now();
    let stats = parse_collection(collection_path, work_path, &config, Some(&pb))
        .map_err(|e| format!("Parse failed: {}", e))?;
    pb.finish_with_message(format!("{} documents", stats.documents));

    eprintln!("✅ Parse complete in {:.1?}", started.elapsed());
    eprintln!(
        "   {} documents │ {} tokens │ {} postings │ {} runs",
        stats.documents, stats.tokens, stats.postings, stats.runs
    );
    Ok(())
}

fn run_merge(work_dir: &str) -> Result<(), String> {
    let work_path = Path::new(work_dir);
    let runs = layout::run_files(work_path)
        .map_err(|e| format!("Failed to list runs in {}: {}", work_dir, e))?;
    if runs.is_empty() {
        eprintln!("⚠️  No run files found; nothing to merge");
        return Ok(());
    }

    let index_path = work_path.join(layout::INDEX_FILE);
    let lexicon_path = work_path.join(layout::LEXICON_FILE);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {prefix:<8} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_prefix("Merging");
    pb.enable_steady_tick(std::time::Duration::from_millis(80));

    let started = Instant::now();
    let stats = match merge_runs(&runs, &index_path, &lexicon_path, Some(&pb)) {
        Ok(stats) => stats,
        Err(e) => {
            // A failed merge must not leave partial artifacts behind.
            let _ = fs::remove_file(&index_path);
            let _ = fs::remove_file(&lexicon_path);
            return Err(format!("Merge failed: {}", e));
        }
    };
    pb.finish_with_message(format!("{} terms", stats.terms));

    eprintln!("✅ Merge complete in {:.1?}", started.elapsed());
    eprintln!(
        "   {} runs │ {} terms │ {} postings │ {}",
        runs.len(),
        stats.terms,
        stats.postings,
        format_size(stats.index_bytes)
    );
    Ok(())
}

fn run_query(
    work_dir: &str,
    queries: Option<&str>,
    output: Option<&str>,
    mode: QueryMode,
    top_k: usize,
    collection: Option<&str>,
) -> Result<(), String> {
    let work_path = Path::new(work_dir);
    let engine =
        QueryEngine::open(work_path).map_err(|e| format!("Failed to open index: {}", e))?;

    match queries {
        Some(queries) => {
            let output: PathBuf = match output {
                Some(path) => PathBuf::from(path),
                None => Path::new(queries).with_extension("trec"),
            };
            let started = Instant::now();
            let evaluated = engine
                .run_batch(Path::new(queries), &output, mode, top_k)
                .map_err(|e| format!("Batch query failed: {}", e))?;
            eprintln!(
                "✅ {} queries in {:.1?} → {}",
                evaluated,
                started.elapsed(),
                output.display()
            );
            Ok(())
        }
        None => run_shell(&engine, work_path, mode, top_k, collection),
    }
}

/// Interactive query shell. Reads one query per line; `exit` quits.
fn run_shell(
    engine: &QueryEngine,
    work_path: &Path,
    mode: QueryMode,
    top_k: usize,
    collection: Option<&str>,
) -> Result<(), String> {
    let mut passages = match collection {
        Some(collection) => Some(
            PassageStore::open(
                &work_path.join(layout::PASSAGE_OFFSETS_FILE),
                Path::new(collection),
            )
            .map_err(|e| format!("Failed to open collection: {}", e))?,
        ),
        None => None,
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        write!(stdout, "{} ", styled(CYAN, "query>")).map_err(|e| format!("stdout: {}", e))?;
        stdout.flush().map_err(|e| format!("stdout: {}", e))?;

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => return Err(format!("stdin: {}", e)),
        }
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if query == "exit" {
            break;
        }

        let started = Instant::now();
        let results = engine
            .evaluate_text(query, mode, top_k)
            .map_err(|e| format!("Query failed: {}", e))?;
        let elapsed = started.elapsed();

        if results.is_empty() {
            println!("{}", styled(DIM, "no matching documents"));
            continue;
        }
        for (rank, hit) in results.iter().enumerate() {
            let doc_id = hit.doc_id.to_string();
            let passage_id = engine.passage_id(hit.doc_id).unwrap_or(&doc_id);
            println!(
                "{:>3}. {} {}",
                rank + 1,
                styled(GREEN, &format!("{:8.4}", hit.score)),
                styled(BOLD, passage_id)
            );
            if let Some(store) = passages.as_mut() {
                if let Ok(Some(text)) = store.fetch(hit.doc_id) {
                    println!("     {}", styled(DIM, &truncate_snippet(&text, 100)));
                }
            }
        }
        println!(
            "{}",
            styled(
                YELLOW,
                &format!("{} hits in {:.1?}", results.len(), elapsed)
            )
        );
    }
    Ok(())
}

fn run_inspect(work_dir: &str, top_terms: usize) -> Result<(), String> {
    let work_path = Path::new(work_dir);
    let lexicon = Lexicon::load(&work_path.join(layout::LEXICON_FILE))
        .map_err(|e| format!("Failed to load lexicon: {}", e))?;
    let index_bytes = fs::metadata(work_path.join(layout::INDEX_FILE))
        .map_err(|e| format!("Failed to stat index: {}", e))?
        .len();

    let total_postings: u64 = lexicon.iter().map(|(_, e)| u64::from(e.doc_frequency)).sum();
    let mean_df = if lexicon.is_empty() {
        0.0
    } else {
        total_postings as f64 / lexicon.len() as f64
    };

    println!("{}", styled(BOLD, "Index"));
    println!("  terms         {}", lexicon.len());
    println!("  postings      {}", total_postings);
    println!("  index size    {}", format_size(index_bytes));
    println!("  mean df       {:.1}", mean_df);

    let mut by_df: Vec<(&str, u32)> = lexicon
        .iter()
        .map(|(term, entry)| (term, entry.doc_frequency))
        .collect();
    by_df.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    if top_terms > 0 && !by_df.is_empty() {
        println!("{}", styled(BOLD, "Highest document frequency"));
        for (term, df) in by_df.iter().take(top_terms) {
            println!("  {:<20} {}", term, df);
        }
    }
    Ok(())
}
