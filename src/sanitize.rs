//! Full-text sanitization.
//!
//! Drops every character that is not a legal XML 1.0 `Char`, so the saved
//! text can be embedded in XML or fed to tools that reject control codes.

use std::borrow::Cow;

/// Returns `true` if `c` belongs to the XML 1.0 `Char` production:
/// `#x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]`.
pub fn is_valid_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{9}' | '\u{A}' | '\u{D}'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Remove characters that are invalid in XML 1.0 text.
///
/// Valid characters are kept untouched and in order. The input is borrowed
/// when it is already clean.
pub fn remove_invalid_xml_chars(content: &str) -> Cow<'_, str> {
    if content.chars().all(is_valid_xml_char) {
        Cow::Borrowed(content)
    } else {
        Cow::Owned(content.chars().filter(|c| is_valid_xml_char(*c)).collect())
    }
}
