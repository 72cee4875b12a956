//! Turns free-form completion text into validated recommendation records.
//!
//! The completion service is asked for bare JSON but often wraps it in prose or
//! markdown fences. Extraction runs an ordered cascade of strategies; the first
//! one that yields parseable JSON wins, and its value must then be an array of
//! records carrying all five fields.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::models::RecommendationRecord;

const REQUIRED_FIELDS: [&str; 5] = ["title", "year", "reason", "genre", "streaming"];

static BRACKETED_ARRAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*\]").expect("valid bracketed array pattern"));

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?i:json)?\s*(.*?)```").expect("valid fenced block pattern")
});

static VALUE_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\[{]").expect("valid value start pattern"));

/// Why a completion could not be turned into records
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("no JSON found in response")]
    NoJson,

    #[error("response JSON is not an array")]
    NotAnArray,

    #[error("recommendation {index} is not an object")]
    NotAnObject { index: usize },

    #[error("recommendation {index} is missing field `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("recommendation {index} has an invalid `{field}` value")]
    InvalidField { index: usize, field: &'static str },
}

/// One extraction stage: a name for diagnostics and a function that either
/// yields a JSON value or signals "try next" with `None`
struct Strategy {
    name: &'static str,
    extract: fn(&str) -> Option<Value>,
}

const STRATEGIES: [Strategy; 4] = [
    Strategy {
        name: "direct",
        extract: parse_direct,
    },
    Strategy {
        name: "bracketed_array",
        extract: parse_bracketed_array,
    },
    Strategy {
        name: "fenced_block",
        extract: parse_fenced_block,
    },
    Strategy {
        name: "embedded_value",
        extract: parse_embedded_value,
    },
];

fn parse_direct(raw: &str) -> Option<Value> {
    serde_json::from_str(raw.trim()).ok()
}

fn parse_bracketed_array(raw: &str) -> Option<Value> {
    let candidate = BRACKETED_ARRAY.find(raw)?;
    serde_json::from_str(candidate.as_str()).ok()
}

fn parse_fenced_block(raw: &str) -> Option<Value> {
    let inner = FENCED_BLOCK.captures(raw)?.get(1)?;
    serde_json::from_str(inner.as_str().trim()).ok()
}

/// Tries every `[` or `{` position, reading the first complete JSON value from
/// there and ignoring whatever follows it. Arrays are preferred over objects.
fn parse_embedded_value(raw: &str) -> Option<Value> {
    let mut first_object = None;

    for start in VALUE_START.find_iter(raw) {
        let mut values =
            serde_json::Deserializer::from_str(&raw[start.start()..]).into_iter::<Value>();

        match values.next() {
            Some(Ok(value @ Value::Array(_))) => return Some(value),
            Some(Ok(value)) if first_object.is_none() => first_object = Some(value),
            _ => {}
        }
    }

    first_object
}

/// Normalizes raw completion text into recommendation records
pub fn normalize(raw: &str) -> Result<Vec<RecommendationRecord>, ParseFailure> {
    normalize_with_strategy(raw).map(|(records, _)| records)
}

/// Like [`normalize`], also reporting which extraction strategy matched
pub fn normalize_with_strategy(
    raw: &str,
) -> Result<(Vec<RecommendationRecord>, &'static str), ParseFailure> {
    let result = STRATEGIES
        .iter()
        .find_map(|strategy| (strategy.extract)(raw).map(|value| (value, strategy.name)))
        .ok_or(ParseFailure::NoJson)
        .and_then(|(value, strategy)| {
            tracing::debug!(strategy, "Extracted JSON from completion");
            into_records(value).map(|records| (records, strategy))
        });

    if let Err(e) = &result {
        tracing::warn!(error = %e, raw = %raw, "Failed to normalize completion");
    }

    result
}

fn into_records(value: Value) -> Result<Vec<RecommendationRecord>, ParseFailure> {
    let Value::Array(items) = value else {
        return Err(ParseFailure::NotAnArray);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| record_from_value(index, item))
        .collect()
}

fn record_from_value(index: usize, item: Value) -> Result<RecommendationRecord, ParseFailure> {
    let Value::Object(map) = item else {
        return Err(ParseFailure::NotAnObject { index });
    };

    let [title, year, reason, genre, streaming] =
        REQUIRED_FIELDS.map(|field| text_field(&map, index, field));

    let title = title?;
    if title.trim().is_empty() {
        return Err(ParseFailure::InvalidField {
            index,
            field: "title",
        });
    }

    Ok(RecommendationRecord {
        title,
        year: year?,
        reason: reason?,
        genre: genre?,
        streaming: streaming?,
    })
}

fn text_field(
    map: &Map<String, Value>,
    index: usize,
    field: &'static str,
) -> Result<String, ParseFailure> {
    match map.get(field) {
        None | Some(Value::Null) => Err(ParseFailure::MissingField { index, field }),
        Some(Value::String(text)) => Ok(text.clone()),
        // Models frequently emit the year as a bare number
        Some(Value::Number(number)) if field == "year" => number
            .as_u64()
            .map(|year| year.to_string())
            .ok_or(ParseFailure::InvalidField { index, field }),
        Some(_) => Err(ParseFailure::InvalidField { index, field }),
    }
}
