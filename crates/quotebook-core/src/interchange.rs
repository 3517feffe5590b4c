//! Export/import file format
//!
//! A quotes file is a JSON array of `{ "text": ..., "category": ... }`
//! objects. Export writes it with 2-space indentation; import accepts any
//! formatting but rejects anything that is not an array of well-formed
//! quotes.

use serde_json::Value;

use crate::error::QuoteError;
use crate::models::Quote;
use crate::storage::StorageResult;

/// Default file name offered for exports
pub const EXPORT_FILE_NAME: &str = "quotes.json";

/// Serialize a collection for export
pub fn export_quotes(quotes: &[Quote]) -> StorageResult<String> {
    Ok(serde_json::to_string_pretty(quotes)?)
}

/// Parse the contents of an import file
///
/// Fails with `MalformedImport` if the contents are not JSON, the top-level
/// value is not an array, or any element is not an object with non-empty
/// string `text` and `category` fields.
pub fn parse_import(contents: &str) -> Result<Vec<Quote>, QuoteError> {
    let value: Value = serde_json::from_str(contents)
        .map_err(|e| QuoteError::malformed(format!("invalid JSON: {}", e)))?;

    let Value::Array(items) = value else {
        return Err(QuoteError::malformed(format!(
            "expected a JSON array of quotes, found {}",
            describe(&value)
        )));
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_item(index, item))
        .collect()
}

fn parse_item(index: usize, item: &Value) -> Result<Quote, QuoteError> {
    let Value::Object(fields) = item else {
        return Err(QuoteError::malformed(format!(
            "item {} is {}, expected an object",
            index,
            describe(item)
        )));
    };

    let field = |name: &str| -> Result<String, QuoteError> {
        match fields.get(name) {
            Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
            Some(Value::String(_)) => Err(QuoteError::malformed(format!(
                "item {} has an empty '{}'",
                index, name
            ))),
            Some(other) => Err(QuoteError::malformed(format!(
                "item {} has {} for '{}', expected a string",
                index,
                describe(other),
                name
            ))),
            None => Err(QuoteError::malformed(format!(
                "item {} is missing '{}'",
                index, name
            ))),
        }
    };

    Ok(Quote::new(field("text")?, field("category")?))
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
