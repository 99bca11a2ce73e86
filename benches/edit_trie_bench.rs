//! Benchmarks for the edit-tolerant trie
//!
//! This benchmark suite measures:
//! - Trie construction and finalization
//! - Whole-string lookup at increasing edit budgets
//! - Per-keystroke typeahead with top-L retrieval
//! - Bounded edit distance against the unbounded reference

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::time::Duration;

use edit_trie::distance::{levenshtein_str, BoundedEditDistance};
use edit_trie::fsa::{EditTrie, EntityAdd, LookupIndex};

// =============================================================================
// BENCHMARK DATA GENERATORS
// =============================================================================

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

fn generate_vocabulary(count: usize, seed: u64) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut words: Vec<String> = (0..count)
        .map(|_| {
            let len = rng.gen_range(3..12);
            (0..len)
                .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
                .collect()
        })
        .collect();
    words.sort();
    words.dedup();
    words
}

/// Vocabulary entries with one random substitution each
fn generate_queries(words: &[String], count: usize, seed: u64) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .filter_map(|_| words.choose(&mut rng))
        .map(|w| {
            let mut bytes = w.clone().into_bytes();
            let pos = rng.gen_range(0..bytes.len());
            bytes[pos] = ALPHABET[rng.gen_range(0..ALPHABET.len())];
            String::from_utf8_lossy(&bytes).into_owned()
        })
        .collect()
}

fn build_trie(words: &[String]) -> EditTrie {
    let mut trie = EditTrie::new(10);
    trie.begin_update().unwrap();
    trie.add_all(words).unwrap();
    trie.end_update().unwrap();
    trie
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for size in [1_000, 10_000, 50_000] {
        let words = generate_vocabulary(size, 42);
        group.throughput(Throughput::Elements(words.len() as u64));
        group.bench_with_input(BenchmarkId::new("add_and_finalize", size), &words, |b, words| {
            b.iter(|| black_box(build_trie(words)));
        });
    }

    group.finish();
}

fn bench_edit_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("edit_lookup");
    let words = generate_vocabulary(20_000, 7);
    let queries = generate_queries(&words, 200, 11);
    let mut trie = build_trie(&words);

    for k in [0u32, 1, 2] {
        group.throughput(Throughput::Elements(queries.len() as u64));
        group.bench_with_input(BenchmarkId::new("max_edit", k), &k, |b, &k| {
            b.iter(|| {
                let mut total = 0;
                for q in &queries {
                    total += trie.lookup(q, k).unwrap();
                }
                black_box(total)
            });
        });
    }

    group.finish();
}

fn bench_typeahead(c: &mut Criterion) {
    let mut group = c.benchmark_group("typeahead");
    let words = generate_vocabulary(20_000, 13);
    let queries = generate_queries(&words, 100, 17);
    let mut trie = build_trie(&words);

    for k in [0u32, 1, 2] {
        group.bench_with_input(BenchmarkId::new("append_char_top", k), &k, |b, &k| {
            b.iter(|| {
                let mut total = 0;
                for q in &queries {
                    trie.begin_ac(k).unwrap();
                    for c in q.chars() {
                        total += trie.append_char_top(c, 10).unwrap().len();
                    }
                }
                black_box(total)
            });
        });
    }

    group.finish();
}

fn bench_edit_distance(c: &mut Criterion) {
    let mut group = c.benchmark_group("edit_distance");
    let words = generate_vocabulary(500, 23);
    let queries = generate_queries(&words, 500, 29);
    let pairs: Vec<(&String, &String)> = words.iter().zip(queries.iter()).collect();

    for k in [1u32, 3] {
        group.bench_with_input(BenchmarkId::new("bounded", k), &k, |b, &k| {
            let mut ed = BoundedEditDistance::new();
            b.iter(|| {
                for (a, q) in &pairs {
                    black_box(ed.distance_str(a, q, k).unwrap());
                }
            });
        });
    }

    group.bench_function("levenshtein", |b| {
        b.iter(|| {
            for (a, q) in &pairs {
                black_box(levenshtein_str(a, q));
            }
        });
    });

    group.finish();
}

criterion_group!(
    name = edit_trie_benches;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(5))
        .sample_size(20);
    targets = bench_build, bench_edit_lookup, bench_typeahead, bench_edit_distance
);
criterion_main!(edit_trie_benches);
