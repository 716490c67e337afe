//! Request encoding for the batch-execute RPC
//!
//! The remote endpoint takes a form-encoded body with one field, `f.req`.
//! Its value is a JSON array whose second element is itself a JSON document
//! serialized to a string:
//!
//! ```text
//! [[["MkEWBc","[[\"lead\",\"en\",\"ru\",true],[null]]",null,"generic"]]]
//! ```
//!
//! The double encoding is required by the protocol.

use flashcards::{TranslateResult, require_non_empty};
use serde_json::json;
use url::form_urlencoded;

/// RPC id of the translation call
pub const RPC_ID: &str = "MkEWBc";

/// Form field carrying the RPC payload
pub const FORM_FIELD: &str = "f.req";

/// Fixed query parameters the endpoint expects alongside the RPC id
pub const QUERY_PARAMS: [(&str, &str); 6] = [
    ("rpcids", RPC_ID),
    ("soc-app", "1"),
    ("soc-device", "1"),
    ("soc-platform", "1"),
    ("rt", "c"),
    ("bl", "boq_translate-webserver_20201207.13_p0"),
];

/// Build the `f.req` value for one word
///
/// # Arguments
///
/// * `word` - Word to translate
/// * `source_lang` - Source language code (e.g., "en")
/// * `target_lang` - Target language code (e.g., "ru")
///
/// # Returns
///
/// * `Ok(String)` - The double-encoded RPC payload
/// * `Err(TranslateError::InvalidInput)` - If any argument is empty
pub fn encode_payload(word: &str, source_lang: &str, target_lang: &str) -> TranslateResult<String> {
    require_non_empty("word", word)?;
    require_non_empty("source language", source_lang)?;
    require_non_empty("target language", target_lang)?;

    let inner = json!([[word, source_lang, target_lang, true], [null]]).to_string();
    Ok(json!([[[RPC_ID, inner, null, "generic"]]]).to_string())
}

/// Build the form field as a key/value pair
pub fn encode_request(
    word: &str,
    source_lang: &str,
    target_lang: &str,
) -> TranslateResult<(&'static str, String)> {
    Ok((FORM_FIELD, encode_payload(word, source_lang, target_lang)?))
}

/// Build the complete `application/x-www-form-urlencoded` request body
pub fn encode_form_body(
    word: &str,
    source_lang: &str,
    target_lang: &str,
) -> TranslateResult<String> {
    let (field, payload) = encode_request(word, source_lang, target_lang)?;
    Ok(form_urlencoded::Serializer::new(String::new())
        .append_pair(field, &payload)
        .finish())
}
