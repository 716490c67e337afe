//! Response decoding for the batch-execute RPC
//!
//! The response body is newline-framed. Line 3 (0-based) holds a JSON array;
//! the string at `0.2` inside it is a second JSON document carrying the
//! actual translation. Fields of that document are addressed positionally.
//!
//! The paths below are an unversioned contract with a third-party service
//! and are kept here, in one place, for when its output shape drifts.

use crate::json_path::JsonPath;
use flashcards::{Definition, PartOfSpeech, TranslateError, TranslateResult, WordTranslation};
use serde_json::Value;
use std::collections::BTreeMap;

/// 0-based index of the line holding the RPC result
const PAYLOAD_LINE: usize = 3;
/// Path of the embedded JSON string within the payload line
const PAYLOAD_PATH: &str = "0.2";

const WORD_PATH: &str = "1.4.0";
const SOURCE_LANG_PATH: &str = "1.3";
const TARGET_LANG_PATH: &str = "1.1";
const MAIN_TRANSLATION_PATH: &str = "1.0.0.5.0.0";

const EXAMPLES_PATH: &str = "3.2.0";
const EXAMPLE_TEXT_PATH: &str = "1";

const DEFINITIONS_PATH: &str = "3.1.0";
const TRANSLATIONS_PATH: &str = "3.5.0";
const GROUP_POS_PATH: &str = "0";
const GROUP_ITEMS_PATH: &str = "1";
const ITEM_TEXT_PATH: &str = "0";
const ITEM_EXAMPLE_PATH: &str = "1";

/// Decode a raw response body into a `WordTranslation`
///
/// Missing or mistyped fields decode to empty values. An empty
/// `translations` map is returned as-is; deciding that it means "word not
/// supported" is up to the caller.
///
/// # Errors
///
/// * `TranslateError::Decode` - The body is not UTF-8, has fewer than four
///   lines, or the payload line or its embedded document is not JSON
pub fn decode_response(body: &[u8]) -> TranslateResult<WordTranslation> {
    let payload = extract_payload(body)?;
    Ok(decode_payload(&payload))
}

/// Locate and parse the embedded translation document
fn extract_payload(body: &[u8]) -> TranslateResult<Value> {
    let text = std::str::from_utf8(body)
        .map_err(|e| TranslateError::Decode(format!("response is not UTF-8: {}", e)))?;

    let line = text.split('\n').nth(PAYLOAD_LINE).ok_or_else(|| {
        TranslateError::Decode(format!(
            "response has {} lines, expected at least {}",
            text.split('\n').count(),
            PAYLOAD_LINE + 1
        ))
    })?;

    let chunk: Value = serde_json::from_str(line.trim())
        .map_err(|e| TranslateError::Decode(format!("payload line is not JSON: {}", e)))?;

    let embedded = chunk.str_at(PAYLOAD_PATH);
    if embedded.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(embedded)
        .map_err(|e| TranslateError::Decode(format!("embedded payload is not JSON: {}", e)))
}

/// Extract every field from the embedded document
pub fn decode_payload(payload: &Value) -> WordTranslation {
    WordTranslation {
        word: payload.str_at(WORD_PATH).to_string(),
        source_lang: payload.str_at(SOURCE_LANG_PATH).to_string(),
        target_lang: payload.str_at(TARGET_LANG_PATH).to_string(),
        main_translation: payload.str_at(MAIN_TRANSLATION_PATH).to_string(),
        examples: examples(payload),
        definitions: definitions(payload),
        translations: translations(payload),
    }
}

fn examples(payload: &Value) -> Vec<String> {
    payload
        .array_at(EXAMPLES_PATH)
        .iter()
        .map(|example| example.str_at(EXAMPLE_TEXT_PATH).to_string())
        .collect()
}

/// Walk `[pos, [item, ...]]` groups, converting each item with `item`.
/// A tag seen again replaces its earlier group.
fn grouped<T>(
    payload: &Value,
    path: &str,
    item: impl Fn(&Value) -> T,
) -> BTreeMap<PartOfSpeech, Vec<T>> {
    let mut groups: BTreeMap<PartOfSpeech, Vec<T>> = BTreeMap::new();
    for group in payload.array_at(path) {
        let pos = PartOfSpeech::from(group.str_at(GROUP_POS_PATH));
        let items = group.array_at(GROUP_ITEMS_PATH).iter().map(&item).collect();
        groups.insert(pos, items);
    }
    groups
}

fn definitions(payload: &Value) -> BTreeMap<PartOfSpeech, Vec<Definition>> {
    grouped(payload, DEFINITIONS_PATH, |item| {
        let example = item.str_at(ITEM_EXAMPLE_PATH);
        Definition {
            definition: item.str_at(ITEM_TEXT_PATH).to_string(),
            example: (!example.is_empty()).then(|| example.to_string()),
        }
    })
}

fn translations(payload: &Value) -> BTreeMap<PartOfSpeech, Vec<String>> {
    grouped(payload, TRANSLATIONS_PATH, |item| {
        item.str_at(ITEM_TEXT_PATH).to_string()
    })
}
