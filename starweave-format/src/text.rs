//! Shared lexical helpers for the writers

/// Escape a literal's lexical form for double-quoted output
pub(crate) fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// Reverse of [`escape_literal`]
pub(crate) fn unescape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Whether a compacted local name is safe to emit without escaping
///
/// Conservative subset of PN_LOCAL: anything outside it falls back to the
/// full IRI form.
pub(crate) fn is_safe_local(local: &str) -> bool {
    !local.is_empty()
        && !local.starts_with('-')
        && !local.starts_with('.')
        && !local.ends_with('.')
        && local
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_round_trip() {
        let raw = "line one\nline \"two\"\twith \\ backslash";
        assert_eq!(unescape_literal(&escape_literal(raw)), raw);
    }

    #[test]
    fn test_safe_local() {
        assert!(is_safe_local("Dataset"));
        assert!(is_safe_local("item_1-a"));
        assert!(!is_safe_local(""));
        assert!(!is_safe_local("has/slash"));
        assert!(!is_safe_local("-leading"));
        assert!(!is_safe_local("trailing."));
    }
}
