//! End-to-end pipeline tests: parse -> merge -> query.

mod common;

use std::fs;
use std::path::Path;

use vole::index::{InvertedList, Lexicon, MAX_DOC_ID};
use vole::layout;
use vole::query::daat::{conjunctive, disjunctive, TermCursor};
use vole::query::{Bm25, DocumentLengths, QueryEngine, QueryMode};

use common::build_index;

// ============================================================================
// FULL PIPELINE
// ============================================================================

#[test]
fn pipeline_answers_ranked_queries() {
    let dir = tempfile::tempdir().unwrap();
    let work = build_index(
        dir.path(),
        &[
            ("P1", "the cat sat on the mat"),
            ("P2", "a dog chased the cat"),
            ("P3", "dogs and cats living together"),
            ("P4", "nothing relevant here"),
        ],
    );

    let engine = QueryEngine::open(&work).unwrap();

    let hits = engine
        .evaluate_text("cat", QueryMode::Disjunctive, 10)
        .unwrap();
    let docs: Vec<u32> = hits.iter().map(|h| h.doc_id).collect();
    assert_eq!(docs.len(), 2);
    assert!(docs.contains(&0) && docs.contains(&1));

    // Conjunctive: both terms must appear.
    let hits = engine
        .evaluate_text("dog cat", QueryMode::Conjunctive, 10)
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].doc_id, 1);
    assert_eq!(engine.passage_id(hits[0].doc_id), Some("P2"));
}

#[test]
fn missing_term_empties_conjunctive_but_not_disjunctive() {
    let dir = tempfile::tempdir().unwrap();
    let work = build_index(dir.path(), &[("P1", "cat"), ("P2", "cat dog")]);
    let engine = QueryEngine::open(&work).unwrap();

    let and_hits = engine
        .evaluate_text("cat xyzzy", QueryMode::Conjunctive, 10)
        .unwrap();
    assert!(and_hits.is_empty());

    let or_hits = engine
        .evaluate_text("cat xyzzy", QueryMode::Disjunctive, 10)
        .unwrap();
    assert_eq!(or_hits.len(), 2);
}

#[test]
fn rare_term_outranks_common_term_in_disjunction() {
    // "pemmican" appears once; "water" is everywhere. A document matching
    // only the rare term must outrank one matching only the common term.
    let dir = tempfile::tempdir().unwrap();
    let mut passages: Vec<(String, String)> = vec![("R".to_string(), "pemmican rations".to_string())];
    for i in 0..20 {
        passages.push((format!("C{}", i), "water bottle supply".to_string()));
    }
    let passages: Vec<(&str, &str)> = passages
        .iter()
        .map(|(id, text)| (id.as_str(), text.as_str()))
        .collect();
    let work = build_index(dir.path(), &passages);
    let engine = QueryEngine::open(&work).unwrap();

    let hits = engine
        .evaluate_text("pemmican water", QueryMode::Disjunctive, 30)
        .unwrap();
    assert_eq!(hits[0].doc_id, 0);
    assert!(hits[0].score > hits[1].score);
}

#[test]
fn batch_mode_writes_trec_lines() {
    let dir = tempfile::tempdir().unwrap();
    let work = build_index(
        dir.path(),
        &[
            ("P1", "coffee beans roasted dark"),
            ("P2", "green tea leaves"),
            ("P3", "coffee with milk"),
        ],
    );
    let engine = QueryEngine::open(&work).unwrap();

    let queries = dir.path().join("queries.tsv");
    fs::write(&queries, "11\tcoffee\n12\ttea\n\n").unwrap();
    let output = dir.path().join("results.trec");
    let evaluated = engine
        .run_batch(&queries, &output, QueryMode::Disjunctive, 10)
        .unwrap();
    assert_eq!(evaluated, 2);

    let results = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = results.lines().collect();
    assert_eq!(lines.len(), 3); // two coffee hits + one tea hit

    let mut prev_rank = 0;
    let mut prev_score = f64::INFINITY;
    for line in lines.iter().take(2) {
        let fields: Vec<&str> = line.split(' ').collect();
        assert_eq!(fields.len(), 6);
        assert_eq!(fields[0], "11");
        assert_eq!(fields[1], "Q0");
        assert_eq!(fields[5], "STANDARD");
        let rank: usize = fields[3].parse().unwrap();
        let score: f64 = fields[4].parse().unwrap();
        assert_eq!(rank, prev_rank + 1);
        assert!(score <= prev_score);
        prev_rank = rank;
        prev_score = score;
    }
    assert!(lines[2].starts_with("12 Q0 P2 1 "));
}

#[test]
fn top_k_caps_result_count() {
    let dir = tempfile::tempdir().unwrap();
    let passages: Vec<(String, String)> = (0..50)
        .map(|i| (format!("P{}", i), format!("shared term plus unique{}", i)))
        .collect();
    let passages: Vec<(&str, &str)> = passages
        .iter()
        .map(|(id, text)| (id.as_str(), text.as_str()))
        .collect();
    let work = build_index(dir.path(), &passages);
    let engine = QueryEngine::open(&work).unwrap();

    let hits = engine
        .evaluate_text("shared", QueryMode::Disjunctive, 7)
        .unwrap();
    assert_eq!(hits.len(), 7);
    assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
}

// ============================================================================
// DAAT OVER HAND-BUILT LISTS
// ============================================================================

/// Merge hand-written run text and open cursors for the given terms.
fn open_cursors(dir: &Path, run: &str, terms: &[&str]) -> Vec<TermCursor> {
    let run_path = dir.join("run.txt");
    fs::write(&run_path, run).unwrap();
    let index_path = dir.join("index.bin");
    let lexicon_path = dir.join("lexicon.txt");
    vole::merge_runs(&[run_path], &index_path, &lexicon_path, None).unwrap();
    let lexicon = Lexicon::load(&lexicon_path).unwrap();

    terms
        .iter()
        .map(|term| {
            let entry = lexicon.get(term).unwrap();
            TermCursor {
                list: InvertedList::open(&index_path, term, entry).unwrap(),
                doc_frequency: entry.doc_frequency,
            }
        })
        .collect()
}

fn uniform_lengths(dir: &Path, max_doc: u32) -> DocumentLengths {
    let mut contents = String::new();
    for doc in 0..=max_doc {
        contents.push_str(&format!("{} 10\n", doc));
    }
    let path = dir.join(layout::DOC_LENGTHS_FILE);
    fs::write(&path, contents).unwrap();
    DocumentLengths::load(&path).unwrap()
}

#[test]
fn conjunction_is_the_intersection() {
    // A = [1,4,7,10], B = [2,4,9,10], C = [4,10,11] -> {4, 10}
    let dir = tempfile::tempdir().unwrap();
    let mut run = String::new();
    for (term, docs) in [
        ("a", vec![1u32, 4, 7, 10]),
        ("b", vec![2, 4, 9, 10]),
        ("c", vec![4, 10, 11]),
    ] {
        for doc in docs {
            run.push_str(&format!("{} {} 1\n", term, doc));
        }
    }
    let cursors = open_cursors(dir.path(), &run, &["a", "b", "c"]);
    let lengths = uniform_lengths(dir.path(), 11);
    let scorer = Bm25::new(12, 10.0);

    let results = conjunctive(cursors, &lengths, &scorer, 10);
    let mut docs: Vec<u32> = results.iter().map(|r| r.doc_id).collect();
    docs.sort_unstable();
    assert_eq!(docs, vec![4, 10]);
}

#[test]
fn disjunction_is_the_union() {
    let dir = tempfile::tempdir().unwrap();
    let run = "x 1 1\nx 3 1\ny 2 1\ny 3 1\n";
    let cursors = open_cursors(dir.path(), run, &["x", "y"]);
    let lengths = uniform_lengths(dir.path(), 3);
    let scorer = Bm25::new(4, 10.0);

    let results = disjunctive(cursors, &lengths, &scorer, 10);
    let mut docs: Vec<u32> = results.iter().map(|r| r.doc_id).collect();
    docs.sort_unstable();
    assert_eq!(docs, vec![1, 2, 3]);

    // Doc 3 matched both terms, so it must carry the highest score.
    let best = results
        .iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .unwrap();
    assert_eq!(best.doc_id, 3);
}

#[test]
fn exhausted_cursor_ends_conjunction_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let run = "p 1 1\np 2 1\nq 2 1\nq 5 1\n";
    let cursors = open_cursors(dir.path(), run, &["p", "q"]);
    let lengths = uniform_lengths(dir.path(), 5);
    let scorer = Bm25::new(6, 10.0);

    let results = conjunctive(cursors, &lengths, &scorer, 10);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].doc_id, 2);
}

#[test]
fn cursor_walk_matches_merged_postings() {
    let dir = tempfile::tempdir().unwrap();
    let run = "z 0 2\nz 40 1\nz 300 5\n";
    let mut cursors = open_cursors(dir.path(), run, &["z"]);
    let cursor = &mut cursors[0];

    assert_eq!(cursor.list.next_geq(0), 0);
    assert_eq!(cursor.list.score(), 2.0);
    assert_eq!(cursor.list.next_geq(1), 40);
    assert_eq!(cursor.list.next_geq(41), 300);
    assert_eq!(cursor.list.score(), 5.0);
    assert_eq!(cursor.list.next_geq(301), MAX_DOC_ID);
}
