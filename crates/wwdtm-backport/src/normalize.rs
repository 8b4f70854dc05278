//! ASCII transliteration for text written to the 3.0 schema.
//!
//! The older schema cannot store extended Unicode reliably, so text is run
//! through compatibility decomposition (NFKD) and every non-ASCII character
//! left afterwards is dropped: `"José"` becomes `"Jose"`, `"ﬁ"` becomes
//! `"fi"`, and characters with no ASCII decomposition disappear.

use unicode_normalization::UnicodeNormalization;

use crate::core::SqlValue;

/// Transliterate `value` to ASCII.
///
/// Absent and empty input both yield `None`; the destination stores NULL
/// rather than an empty string.
pub fn to_ascii(value: Option<&str>) -> Option<String> {
    match value {
        Some(text) if !text.is_empty() => Some(text.nfkd().filter(char::is_ascii).collect()),
        _ => None,
    }
}

/// Apply [`to_ascii`] to a text value. Non-text values pass through.
pub fn normalize_value(value: SqlValue) -> SqlValue {
    match value {
        SqlValue::Text(text) => to_ascii(Some(&text)).map_or(SqlValue::Null, SqlValue::Text),
        other => other,
    }
}
