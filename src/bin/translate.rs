//! Offline batch translation utility.
//!
//! Walks a collection document and translates its English text fields in
//! place through an HTTP translation endpoint, writing the result to a new
//! file. This is a one-off preprocessing tool; the API server never calls
//! out to the network.
//!
//! Failed fields keep their original text after the retry budget (3
//! attempts with a fixed delay) is exhausted, so a flaky connection
//! degrades the output instead of aborting a long run.

use clap::{Arg, Command};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use hadith_api::errors::{ApiError, Result};

/// Fields holding translatable English text.
const FIELDS_TO_TRANSLATE: &[&str] = &[
    "indextag",
    "english_name",
    "about_title",
    "about_content",
    "english_book_name",
    "chapter_title_english",
    "english_text",
    "narrator",
];

const MAX_RETRIES: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(2);

struct Translator {
    client: reqwest::Client,
    target_lang: String,
    request_delay: Duration,
    translated: usize,
    failed: usize,
}

impl Translator {
    fn new(target_lang: String, request_delay: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            target_lang,
            request_delay,
            translated: 0,
            failed: 0,
        }
    }

    /// Translate one string, retrying up to [`MAX_RETRIES`] times. Returns
    /// the original text when every attempt fails.
    async fn translate_text(&mut self, text: &str) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }

        for attempt in 1..=MAX_RETRIES {
            match self.request_translation(text).await {
                Ok(translated) => {
                    self.translated += 1;
                    info!(attempt, chars = text.len(), "translated field");
                    return translated;
                }
                Err(e) => {
                    warn!(attempt, error = %e, "translation attempt failed");
                    tokio::time::sleep(RETRY_DELAY).await;
                }
            }
        }

        self.failed += 1;
        warn!("all translation attempts failed, keeping original text");
        text.to_string()
    }

    async fn request_translation(&self, text: &str) -> Result<String> {
        let response: Value = self
            .client
            .get("https://translate.googleapis.com/translate_a/single")
            .query(&[
                ("client", "gtx"),
                ("sl", "en"),
                ("tl", self.target_lang.as_str()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        // Response shape: [[[segment, original, ...], ...], ...]
        let segments = response
            .get(0)
            .and_then(Value::as_array)
            .ok_or_else(|| ApiError::Translation {
                details: "unexpected response shape".to_string(),
            })?;

        let translated: String = segments
            .iter()
            .filter_map(|segment| segment.get(0).and_then(Value::as_str))
            .collect();

        if translated.is_empty() {
            return Err(ApiError::Translation {
                details: "empty translation".to_string(),
            });
        }
        Ok(translated)
    }

    /// Recursively translate matching fields in place.
    async fn process(&mut self, value: &mut Value) {
        match value {
            Value::Object(map) => {
                for (key, child) in map.iter_mut() {
                    if FIELDS_TO_TRANSLATE.contains(&key.as_str()) {
                        if let Value::String(text) = child {
                            let translated = self.translate_text(text).await;
                            *child = Value::String(translated);
                            tokio::time::sleep(self.request_delay).await;
                        }
                    } else {
                        Box::pin(self.process(child)).await;
                    }
                }
            }
            Value::Array(items) => {
                for item in items.iter_mut() {
                    Box::pin(self.process(item)).await;
                }
            }
            _ => {}
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    let matches = Command::new("hadith-translate")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Translate the English fields of a collection document")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("FILE")
                .help("Source collection document")
                .required(true),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Where to write the translated document")
                .required(true),
        )
        .arg(
            Arg::new("target-lang")
                .short('t')
                .long("target-lang")
                .value_name("LANG")
                .help("Target language code")
                .default_value("fr"),
        )
        .arg(
            Arg::new("delay-ms")
                .long("delay-ms")
                .value_name("MS")
                .help("Delay between translation requests")
                .value_parser(clap::value_parser!(u64))
                .default_value("500"),
        )
        .get_matches();

    let input = PathBuf::from(matches.get_one::<String>("input").unwrap());
    let output = PathBuf::from(matches.get_one::<String>("output").unwrap());
    let target_lang = matches.get_one::<String>("target-lang").unwrap().clone();
    let delay = Duration::from_millis(*matches.get_one::<u64>("delay-ms").unwrap());

    info!("Loading {:?}", input);
    let content = std::fs::read_to_string(&input)?;
    let mut document: Value =
        serde_json::from_str(&content).map_err(|e| ApiError::DocumentParse {
            file: input.clone(),
            details: e.to_string(),
        })?;

    let mut translator = Translator::new(target_lang, delay);
    translator.process(&mut document).await;

    info!(
        translated = translator.translated,
        failed = translator.failed,
        "translation pass complete"
    );

    let body = serde_json::to_string_pretty(&document).map_err(ApiError::from)?;
    std::fs::write(&output, body)?;
    info!("Wrote {:?}", output);

    Ok(())
}
