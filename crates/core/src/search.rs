//! Helpers for the listing text search.
//!
//! The search is deliberately substring-based (`ILIKE` against name and
//! description), not tokenized full-text search.

/// Turn a raw user query into an `ILIKE` pattern with `%`, `_`, and `\`
/// escaped, so user input is always matched literally.
///
/// Returns `None` for queries that are empty after trimming, which callers
/// treat as "no text predicate".
pub fn like_pattern(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut escaped = String::with_capacity(trimmed.len() + 2);
    escaped.push('%');
    for ch in trimmed.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    Some(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_query_is_wrapped_in_wildcards() {
        assert_eq!(like_pattern("ceviche").as_deref(), Some("%ceviche%"));
    }

    #[test]
    fn whitespace_is_trimmed() {
        assert_eq!(like_pattern("  bodega "), Some("%bodega%".to_string()));
    }

    #[test]
    fn empty_and_blank_queries_yield_none() {
        assert_eq!(like_pattern(""), None);
        assert_eq!(like_pattern("   "), None);
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(
            like_pattern("100%_off\\now").as_deref(),
            Some("%100\\%\\_off\\\\now%")
        );
    }
}
