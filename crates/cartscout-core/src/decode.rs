//! Decodes the reasoning service's free-text reply into an [`Intent`].
//!
//! ## Action-line grammar
//!
//! The reply is expected to contain a line such as:
//!
//! ```text
//! - **Action:** necessary tools = {search_products : True} | params = {query:"white sneaker", size:8, platform:"all"}
//! ```
//!
//! The first line containing `Action` is the action line. Everything after
//! its first `|` (up to the next `|`, if any) is the parameter segment, which
//! holds comma-separated `key:value` pairs inside `{...}`. Spaces around the
//! colon are allowed. A value is either a double-quoted string (quotes
//! stripped) or a bare integer. Every token between commas must be such a
//! pair; nothing is skipped.
//!
//! ## Stage detection
//!
//! A stage is enabled when its tool name (see [`StageName::literal`]) occurs
//! anywhere in the reply, not only on the action line. Mentions inside the
//! reasoning prose therefore enable stages too, and a literal embedded in a
//! longer word still counts.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::intent::{Intent, ParamValue, Params, StageName};

const ACTION_MARKER: &str = "Action";

static KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w+$").expect("valid regex"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("response contains no Action line")]
    MissingActionLine,

    #[error("action line has no `|` parameter segment: {line}")]
    MissingParameterSegment { line: String },

    #[error("parameter segment contains no key:value pairs")]
    NoParameters,

    #[error("parameter {key} has value {value}, expected a quoted string or an integer")]
    InvalidValue { key: String, value: String },
}

/// Decodes a full reasoning-service reply into an [`Intent`].
///
/// # Errors
///
/// Returns [`DecodeError`] when the reply has no action line, the action line
/// has no parameter segment, the segment holds no pairs, or a value is
/// neither a quoted string nor an integer.
pub fn decode_intent(raw: &str) -> Result<Intent, DecodeError> {
    let line = find_action_line(raw).ok_or(DecodeError::MissingActionLine)?;
    let segment =
        parameter_segment(line).ok_or_else(|| DecodeError::MissingParameterSegment {
            line: line.trim().to_owned(),
        })?;

    let params = parse_params(segment)?;
    if params.is_empty() {
        return Err(DecodeError::NoParameters);
    }

    Ok(Intent::new(detect_stages(raw), params))
}

/// Returns every stage whose tool name appears anywhere in `raw`.
#[must_use]
pub fn detect_stages(raw: &str) -> BTreeSet<StageName> {
    StageName::ALL
        .into_iter()
        .filter(|stage| raw.contains(stage.literal()))
        .collect()
}

fn find_action_line(raw: &str) -> Option<&str> {
    raw.lines()
        .find(|line| !line.trim().is_empty() && line.contains(ACTION_MARKER))
}

fn parameter_segment(line: &str) -> Option<&str> {
    line.split('|').nth(1)
}

fn parse_params(segment: &str) -> Result<Params, DecodeError> {
    let mut params = Params::new();
    for token in split_pairs(segment) {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let (key, raw_value) = split_pair(token)?;
        params.insert(key, parse_value(key, raw_value)?);
    }
    Ok(params)
}

/// Splits the pair list between `{` and its closing `}` on commas that sit
/// outside double quotes. Without a `{` the whole segment is the list.
fn split_pairs(segment: &str) -> Vec<&str> {
    let body = segment
        .split_once('{')
        .map_or(segment, |(_, rest)| rest);

    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    for (i, c) in body.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                tokens.push(&body[start..i]);
                start = i + 1;
            }
            '}' if !in_quotes => {
                tokens.push(&body[start..i]);
                return tokens;
            }
            _ => {}
        }
    }
    tokens.push(&body[start..]);
    tokens
}

fn split_pair(token: &str) -> Result<(&str, &str), DecodeError> {
    let malformed = || DecodeError::InvalidValue {
        key: token.to_owned(),
        value: String::new(),
    };
    let (key, value) = token.split_once(':').ok_or_else(malformed)?;
    let key = key.trim();
    if !KEY_PATTERN.is_match(key) {
        return Err(malformed());
    }
    Ok((key, value.trim()))
}

fn parse_value(key: &str, raw: &str) -> Result<ParamValue, DecodeError> {
    if let Some(quoted) = raw
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        return Ok(ParamValue::Text(quoted.to_owned()));
    }

    raw.parse::<i64>()
        .map(ParamValue::Integer)
        .map_err(|_| DecodeError::InvalidValue {
            key: key.to_owned(),
            value: raw.to_owned(),
        })
}

#[cfg(test)]
#[path = "decode_test.rs"]
mod tests;
