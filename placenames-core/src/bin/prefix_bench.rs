//! Prefix Lookup Benchmarking Tool
//!
//! Loads a place-name data file, builds the bounded prefix index and measures
//! lookup throughput over prefixes sampled from the indexed names.
//!
//! ## What It Benchmarks
//!
//! 1. **Build**: CSV decode + trie inserts + finalize (timed once)
//! 2. **Lookup**: `find_by_prefix` over the sampled prefixes
//! 3. **Query**: lookup + truncation + display recasing (`QueryEngine`)
//!
//! ## Usage
//!
//! ```bash
//! ./target/release/prefix_bench data/placenames_with_relevancy.csv.gz
//!
//! # Retain 20 entries per node instead of 100
//! ./target/release/prefix_bench data/placenames_with_relevancy.csv.gz 20
//! ```
//!
//! ## Example Output
//!
//! ```text
//! === Query ===
//! --------------------------------
//! Mode        : Query
//! Elapsed     : 0.021 s
//! Prefixes    : 30_000
//! Lookups/sec : 1_428_571
//! --------------------------------
//! ```

use std::env;
use std::time::{Duration, Instant};

use placenames_core::{load_index, PrefixIndex, QueryEngine, SuggestConfig};

const WARMUP_RUNS: usize = 1;
const MEASURE_RUNS: usize = 5;
const SAMPLE_STRIDE: usize = 7;
const MAX_PREFIX_CHARS: usize = 3;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: prefix_bench <path> [k]");
        std::process::exit(1);
    }

    let path = &args[1];
    let k = match args.get(2) {
        Some(raw) => raw.parse()?,
        None => SuggestConfig::default().capacity_per_node,
    };

    println!("Building index (k={k})...");
    let start = Instant::now();
    let index = load_index(path, SuggestConfig::with_capacity(k))?;
    let build = start.elapsed();

    println!("Build       : {:.3} s", build.as_secs_f64());
    println!("Index       : {}\n", index.stats());

    let prefixes = sample_prefixes(&index);
    if prefixes.is_empty() {
        println!("No entries to query.");
        return Ok(());
    }

    bench_lookup(&index, &prefixes);
    bench_query(QueryEngine::new(index), &prefixes);

    Ok(())
}

/// Takes 1..=3 code point prefixes of every `SAMPLE_STRIDE`th name.
fn sample_prefixes(index: &PrefixIndex) -> Vec<String> {
    let mut prefixes = Vec::new();
    for id in (0..index.len() as u32).step_by(SAMPLE_STRIDE) {
        let Some(entry) = index.entry(id) else {
            continue;
        };
        for n in 1..=MAX_PREFIX_CHARS {
            prefixes.push(entry.name.chars().take(n).collect());
        }
    }
    prefixes
}

fn bench_lookup(index: &PrefixIndex, prefixes: &[String]) {
    println!("=== Lookup ===");

    warmup(|| {
        for p in prefixes {
            std::hint::black_box(index.find_by_prefix(p).len());
        }
    });

    let elapsed = measure(|| {
        for p in prefixes {
            std::hint::black_box(index.find_by_prefix(p).len());
        }
    });

    print_perf("Lookup", prefixes.len(), elapsed);
}

fn bench_query(engine: QueryEngine, prefixes: &[String]) {
    let limit = engine.default_limit() as i64;

    println!("=== Query ===");

    warmup(|| {
        for p in prefixes {
            std::hint::black_box(engine.query(p, limit).map(|r| r.len()).unwrap_or(0));
        }
    });

    let elapsed = measure(|| {
        for p in prefixes {
            std::hint::black_box(engine.query(p, limit).map(|r| r.len()).unwrap_or(0));
        }
    });

    print_perf("Query", prefixes.len(), elapsed);
}

fn warmup<F: FnMut()>(mut f: F) {
    for _ in 0..WARMUP_RUNS {
        f();
    }
}

fn measure<F: FnMut()>(mut f: F) -> Duration {
    let mut total = Duration::ZERO;

    for _ in 0..MEASURE_RUNS {
        let start = Instant::now();
        f();
        total += start.elapsed();
    }

    total / MEASURE_RUNS as u32
}

fn print_perf(label: &str, lookups: usize, elapsed: Duration) {
    let secs = elapsed.as_secs_f64();

    println!("--------------------------------");
    println!("Mode        : {}", label);
    println!("Elapsed     : {:.3} s", secs);
    println!("Prefixes    : {}", fmt_count(lookups as u64));
    println!("Lookups/sec : {}", fmt_count((lookups as f64 / secs) as u64));
    println!("--------------------------------\n");
}

fn fmt_count(n: u64) -> String {
    let s = n.to_string();
    let mut out = String::with_capacity(s.len() + s.len() / 3);

    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push('_');
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}
