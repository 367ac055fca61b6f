use std::borrow::Cow;

/// Escapes the five reserved markup characters (`& < > " '`).
///
/// Characters XML 1.0 does not allow at all (C0 controls other than tab, line
/// feed and carriage return, `U+FFFE`, `U+FFFF`) are dropped first.
///
/// Every piece of user-supplied text goes through here before it reaches the
/// document, both as element content and as attribute values.
pub fn escape_markup(raw: &str) -> Cow<'_, str> {
    match strip_disallowed(raw) {
        Cow::Borrowed(text) => quick_xml::escape::escape(text),
        Cow::Owned(text) => Cow::Owned(quick_xml::escape::escape(text.as_str()).into_owned()),
    }
}

fn strip_disallowed(raw: &str) -> Cow<'_, str> {
    if raw.chars().all(is_xml_char) {
        Cow::Borrowed(raw)
    } else {
        Cow::Owned(raw.chars().filter(|c| is_xml_char(*c)).collect())
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}')
        || c >= '\u{10000}'
}
