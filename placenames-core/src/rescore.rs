//! Ordered scoring pool.
//!
//! Recomputes relevancy for a list of names with a fixed number of worker
//! threads and writes the result back out as a `location,score` table. The
//! scorer is usually slow and remote, so work is spread over the pool, but
//! the output always follows input order regardless of which worker
//! finishes first.

use std::fmt;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use placenames_types::ScoreError;
use tracing::{info, trace, warn};

/// Produces a relevancy score for one name.
///
/// Implementations are shared by reference across worker threads.
pub trait Scorer: Sync {
    type Error: fmt::Display;

    fn score(&self, name: &str) -> Result<f64, Self::Error>;
}

/// A name with its recomputed score, clamped to `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredName {
    pub name: String,
    pub score: f64,
}

/// Scores every name with `workers` threads and returns the results in
/// input order.
///
/// Each worker claims the next unscored position, runs the scorer and sends
/// `(position, result)` back to the collector. Every name is attempted even
/// when an earlier one fails; the error returned is the first failure in
/// input order.
pub fn score_in_order<N, S>(
    names: &[N],
    workers: usize,
    scorer: &S,
) -> Result<Vec<ScoredName>, ScoreError>
where
    N: AsRef<str> + Sync,
    S: Scorer + ?Sized,
{
    if workers == 0 {
        return Err(ScoreError::NoWorkers);
    }

    let start = Instant::now();
    let threads = workers.min(names.len()).max(1);
    info!(names = names.len(), workers = threads, "scoring names");

    let cursor = AtomicUsize::new(0);
    let mut slots: Vec<Option<Result<f64, String>>> = vec![None; names.len()];

    thread::scope(|s| {
        let (tx, rx) = mpsc::channel::<(usize, Result<f64, String>)>();

        for worker in 1..=threads {
            let tx = tx.clone();
            let cursor = &cursor;
            s.spawn(move || loop {
                let index = cursor.fetch_add(1, Ordering::Relaxed);
                let Some(name) = names.get(index) else {
                    break;
                };
                let name = name.as_ref();

                let result = scorer.score(name).map_err(|err| err.to_string());
                match &result {
                    Ok(score) => trace!(worker, name, score, "scored"),
                    Err(reason) => warn!(worker, name, reason = %reason, "scoring failed"),
                }
                if tx.send((index, result)).is_err() {
                    break;
                }
            });
        }
        drop(tx);

        for (index, result) in rx {
            slots[index] = Some(result);
        }
    });

    let scored = names
        .iter()
        .zip(slots)
        .enumerate()
        .map(|(index, (name, slot))| {
            let name = name.as_ref();
            match slot {
                Some(Ok(score)) if score.is_finite() => Ok(ScoredName {
                    name: name.to_owned(),
                    score: score.clamp(0.0, 1.0),
                }),
                Some(Ok(_)) => Err(ScoreError::NotFinite {
                    name: name.to_owned(),
                }),
                Some(Err(reason)) => Err(ScoreError::Scorer {
                    index,
                    name: name.to_owned(),
                    reason,
                }),
                None => Err(ScoreError::Lost { index }),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        names = scored.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "scoring complete"
    );
    Ok(scored)
}

/// Writes scores as CSV with a `location,score` header and two-decimal
/// scores.
pub fn write_scores<W: Write>(writer: W, scores: &[ScoredName]) -> Result<(), ScoreError> {
    let mut csv = csv::Writer::from_writer(writer);
    let write_err = |err: csv::Error| ScoreError::Write(err.to_string());

    csv.write_record(["location", "score"]).map_err(write_err)?;
    for scored in scores {
        let score = format!("{:.2}", scored.score);
        csv.write_record([scored.name.as_str(), score.as_str()])
            .map_err(write_err)?;
    }
    csv.flush()
        .map_err(|err| ScoreError::Write(err.to_string()))?;
    Ok(())
}
