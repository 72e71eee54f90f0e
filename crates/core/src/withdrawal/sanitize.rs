//! Free-text sanitization for withdrawal metadata.
//!
//! Strips markup so bank names and holder names can be echoed back or stored
//! without becoming an injection vector. This is output hygiene, not an
//! authorization boundary.

/// Removes null bytes, HTML tags and inline event-handler attributes, then trims.
#[must_use]
pub fn sanitize_text(input: &str) -> String {
    let without_nulls: String = input.chars().filter(|c| *c != '\0').collect();
    let without_tags = strip_tags(&without_nulls);
    strip_event_handlers(&without_tags).trim().to_string()
}

/// Drops `<...>` tag spans, honoring quoted attribute values.
///
/// A `<` that cannot start a tag (e.g. `A < B`) is kept. An unterminated tag
/// swallows the rest of the input.
fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        let opens_tag = c == '<'
            && chars
                .peek()
                .is_some_and(|n| n.is_ascii_alphabetic() || matches!(*n, '/' | '!' | '?'));
        if !opens_tag {
            out.push(c);
            continue;
        }

        let mut quote: Option<char> = None;
        for t in chars.by_ref() {
            match quote {
                Some(q) if t == q => quote = None,
                Some(_) => {}
                None if t == '"' || t == '\'' => quote = Some(t),
                None if t == '>' => break,
                None => {}
            }
        }
    }

    out
}

/// Drops `on<name>=value` fragments left outside of tags.
fn strip_event_handlers(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;

    while i < chars.len() {
        if let Some(end) = event_handler_end(&chars, i) {
            i = end;
            continue;
        }
        out.push(chars[i]);
        i += 1;
    }

    out
}

/// If an event-handler attribute starts at `start`, returns the index just past it.
fn event_handler_end(chars: &[char], start: usize) -> Option<usize> {
    if start > 0 && chars[start - 1].is_alphanumeric() {
        return None;
    }
    let (o, n) = (chars.get(start)?, chars.get(start + 1)?);
    if !o.eq_ignore_ascii_case(&'o') || !n.eq_ignore_ascii_case(&'n') {
        return None;
    }

    let mut i = start + 2;
    let name_start = i;
    while chars.get(i).is_some_and(char::is_ascii_alphabetic) {
        i += 1;
    }
    if i == name_start {
        return None;
    }
    while chars.get(i).is_some_and(|c| c.is_whitespace()) {
        i += 1;
    }
    if chars.get(i) != Some(&'=') {
        return None;
    }
    i += 1;
    while chars.get(i).is_some_and(|c| c.is_whitespace()) {
        i += 1;
    }

    match chars.get(i) {
        Some(&q) if q == '"' || q == '\'' => {
            i += 1;
            while chars.get(i).is_some_and(|c| *c != q) {
                i += 1;
            }
            Some((i + 1).min(chars.len()))
        }
        _ => {
            while chars.get(i).is_some_and(|c| !c.is_whitespace()) {
                i += 1;
            }
            Some(i)
        }
    }
}
