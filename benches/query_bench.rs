//! Benchmarks for cursor skipping and DAAT evaluation.
//!
//! Builds a synthetic index once per size (a Zipf-ish mix of one dense term,
//! a few mid-frequency terms, and sparse ones), then measures the primitives
//! queries are made of: a full `next_geq` walk, skip-heavy advancement, and
//! the two DAAT modes end to end.
//!
//! Run with: cargo bench

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use vole::index::{merge_runs, InvertedList, Lexicon, MAX_DOC_ID};
use vole::layout;
use vole::query::{QueryEngine, QueryMode};

/// Synthetic collection sizes (documents).
const SIZES: &[u32] = &[10_000, 100_000];

/// Build a work directory with an index plus sidecars over `docs` documents.
fn build_synthetic(dir: &Path, docs: u32) -> PathBuf {
    let work = dir.join(format!("work_{}", docs));
    std::fs::create_dir_all(work.join(layout::RUNS_DIR)).unwrap();

    // One run is enough: merge cost is not what we measure here.
    let mut run = String::new();
    // "common": every 2nd document, "mid": every 16th, "rare": every 1024th.
    for (term, stride) in [("common", 2u32), ("mid", 16), ("rare", 1024)] {
        let mut doc = 0;
        while doc < docs {
            writeln!(run, "{} {} {}", term, doc, doc % 7 + 1).unwrap();
            doc += stride;
        }
    }
    let run_path = work.join(layout::RUNS_DIR).join(layout::run_file_name(1));
    std::fs::write(&run_path, run).unwrap();

    merge_runs(
        &[run_path],
        &work.join(layout::INDEX_FILE),
        &work.join(layout::LEXICON_FILE),
        None,
    )
    .unwrap();

    let mut lengths = String::new();
    let mut pages = String::new();
    for doc in 0..docs {
        writeln!(lengths, "{} {}", doc, doc % 40 + 5).unwrap();
        writeln!(pages, "{} P{}", doc, doc).unwrap();
    }
    std::fs::write(work.join(layout::DOC_LENGTHS_FILE), lengths).unwrap();
    std::fs::write(work.join(layout::PAGE_TABLE_FILE), pages).unwrap();
    std::fs::write(
        work.join(layout::COLLECTION_STATS_FILE),
        format!("{} 24.5\n", docs),
    )
    .unwrap();
    std::fs::write(work.join(layout::PASSAGE_OFFSETS_FILE), "").unwrap();

    work
}

fn bench_cursor(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let mut group = c.benchmark_group("cursor");

    for &docs in SIZES {
        let work = build_synthetic(dir.path(), docs);
        let index_path = work.join(layout::INDEX_FILE);
        let lexicon = Lexicon::load(&work.join(layout::LEXICON_FILE)).unwrap();

        group.bench_with_input(BenchmarkId::new("walk_common", docs), &docs, |b, _| {
            let entry = *lexicon.get("common").unwrap();
            b.iter(|| {
                let mut list = InvertedList::open(&index_path, "common", &entry).unwrap();
                let mut target = 0;
                let mut count = 0u32;
                loop {
                    let doc = list.next_geq(target);
                    if doc == MAX_DOC_ID {
                        break;
                    }
                    count += 1;
                    target = doc + 1;
                }
                black_box(count)
            });
        });

        group.bench_with_input(BenchmarkId::new("skip_to_rare", docs), &docs, |b, _| {
            let entry = *lexicon.get("common").unwrap();
            b.iter(|| {
                // Skip through the dense list at the sparse list's stride.
                let mut list = InvertedList::open(&index_path, "common", &entry).unwrap();
                let mut target = 0;
                while list.next_geq(target) != MAX_DOC_ID {
                    target += 1024;
                }
                black_box(target)
            });
        });
    }
    group.finish();
}

fn bench_daat(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let mut group = c.benchmark_group("daat");

    for &docs in SIZES {
        let work = build_synthetic(dir.path(), docs);
        let engine = QueryEngine::open(&work).unwrap();
        let terms = vec!["common".to_string(), "mid".to_string(), "rare".to_string()];

        group.bench_with_input(BenchmarkId::new("conjunctive", docs), &docs, |b, _| {
            b.iter(|| {
                let hits = engine
                    .evaluate(black_box(&terms), QueryMode::Conjunctive, 10)
                    .unwrap();
                black_box(hits)
            });
        });

        group.bench_with_input(BenchmarkId::new("disjunctive", docs), &docs, |b, _| {
            b.iter(|| {
                let hits = engine
                    .evaluate(black_box(&terms), QueryMode::Disjunctive, 10)
                    .unwrap();
                black_box(hits)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_cursor, bench_daat);
criterion_main!(benches);
