//! Relevancy regeneration.
//!
//! Asks a chat-completions endpoint to rate how well known each place is,
//! one name per request, and writes the answers out as a fresh
//! `location,score` table that the server can load.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use placenames_core::{read_names, score_in_order, write_scores, BuildError, ScoreError, Scorer};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::info;

/// Instruction sent as the system message when no prompt file is given.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You rate how widely known a place name is to the general public. \
Reply with a single number between 0 and 1 and nothing else: \
1 for world-famous places, 0 for places almost nobody has heard of.";

/// Errors from a regeneration run.
#[derive(Debug, thiserror::Error)]
pub enum RegenError {
    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),
    #[error("chat request failed: {0}")]
    Request(reqwest::Error),
    #[error("chat endpoint returned {0}")]
    Status(StatusCode),
    #[error("chat endpoint returned invalid JSON: {0}")]
    Decode(reqwest::Error),
    #[error("chat response has no message content")]
    NoContent,
    #[error("no numeric output in {0:?}")]
    NoScore(String),
    #[error(transparent)]
    Load(#[from] BuildError),
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error("failed to write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Settings for [`ChatScorer`].
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub endpoint: String,
    pub model: Option<String>,
    pub system_prompt: String,
    pub timeout: Duration,
}

impl ChatConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: None,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_owned(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Scores a name with one chat-completions request.
///
/// The reply is expected to contain a number in `[0, 1]`; the first such
/// number found is the score.
pub struct ChatScorer {
    client: Client,
    config: ChatConfig,
}

impl ChatScorer {
    pub fn new(config: ChatConfig) -> Result<Self, RegenError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(RegenError::Client)?;
        Ok(Self { client, config })
    }
}

impl Scorer for ChatScorer {
    type Error = RegenError;

    fn score(&self, name: &str) -> Result<f64, RegenError> {
        let mut payload = serde_json::json!({
            "temperature": 0.1,
            "max_tokens": 6,
            "messages": [
                {"role": "system", "content": self.config.system_prompt},
                {"role": "user", "content": name}
            ]
        });
        if let Some(model) = &self.config.model {
            payload["model"] = Value::String(model.clone());
        }

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&payload)
            .send()
            .map_err(RegenError::Request)?;
        if !response.status().is_success() {
            return Err(RegenError::Status(response.status()));
        }

        let value = response.json::<Value>().map_err(RegenError::Decode)?;
        let content = extract_content(&value).ok_or(RegenError::NoContent)?;
        extract_score(content).ok_or_else(|| RegenError::NoScore(content.trim().to_owned()))
    }
}

/// Pulls the reply text out of a chat response, accepting the OpenAI
/// `choices` shape and the bare `message` shape.
pub fn extract_content(value: &Value) -> Option<&str> {
    value
        .get("choices")
        .and_then(|choices| choices.as_array())
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .or_else(|| value.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
}

/// Finds the first score-shaped number in `text` and clamps it to `[0, 1]`.
///
/// A score is either `0` with an optional decimal part, starting a word, or
/// `1` with optional trailing zeros, ending a word. Anything else (`10`,
/// `0x`, `.5`) is skipped.
pub fn extract_score(text: &str) -> Option<f64> {
    let text = text.trim();
    let bytes = text.as_bytes();

    for (i, &b) in bytes.iter().enumerate() {
        let end = match b {
            b'0' if i == 0 || !is_word(bytes[i - 1]) => {
                i + 1 + fraction_len(&bytes[i + 1..], |d| d.is_ascii_digit())
            }
            b'1' => {
                let with_zeros = i + 1 + fraction_len(&bytes[i + 1..], |d| d == b'0');
                if ends_word(bytes, with_zeros) {
                    with_zeros
                } else if ends_word(bytes, i + 1) {
                    i + 1
                } else {
                    continue;
                }
            }
            _ => continue,
        };
        return text[i..end].parse::<f64>().ok().map(|score| score.clamp(0.0, 1.0));
    }
    None
}

#[inline]
fn is_word(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[inline]
fn ends_word(bytes: &[u8], pos: usize) -> bool {
    bytes.get(pos).map_or(true, |&b| !is_word(b))
}

/// Length of a `.ddd` run at the start of `rest`, or 0 when there is no dot
/// followed by at least one matching digit.
fn fraction_len(rest: &[u8], digit: impl Fn(u8) -> bool) -> usize {
    match rest.split_first() {
        Some((b'.', tail)) => match tail.iter().take_while(|&&d| digit(d)).count() {
            0 => 0,
            n => n + 1,
        },
        _ => 0,
    }
}

/// Rescores every name in `data_file` and writes the table to `output`.
///
/// Nothing is written unless every name scored. Returns the number of rows
/// written.
pub fn regenerate<S>(
    data_file: &Path,
    output: &Path,
    workers: usize,
    scorer: &S,
) -> Result<usize, RegenError>
where
    S: Scorer + ?Sized,
{
    let start = Instant::now();
    let names = read_names(data_file)?;
    let scored = score_in_order(&names, workers, scorer)?;

    let output_err = |source| RegenError::Output {
        path: output.to_path_buf(),
        source,
    };
    let file = File::create(output).map_err(output_err)?;
    write_scores(BufWriter::new(file), &scored)?;

    info!(
        output = %output.display(),
        rows = scored.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "scores written"
    );
    Ok(scored.len())
}
