//! Quote-aware re-tokenization of a split command line.
//!
//! The host hands the dispatcher a line already split on whitespace. Before
//! routing, runs of tokens delimited by `"` or `'` are merged back into a
//! single token so that quoted values may contain spaces.

/// Re-merge quoted spans in a whitespace-split token sequence.
///
/// A token beginning with `"` (or `'`) opens a span; the first later token
/// ending with the matching quote closes it. The span is joined with single
/// spaces and the quote pair is stripped. An unterminated quote absorbs every
/// remaining token. A single token carrying both its opening and closing
/// quote is unquoted in place.
pub fn merge_quoted(tokens: &[String]) -> Vec<String> {
    let mut merged = Vec::with_capacity(tokens.len());
    let mut i = 0;

    while i < tokens.len() {
        let token = &tokens[i];
        let quote = match token.chars().next() {
            Some(c @ ('"' | '\'')) => c,
            _ => {
                merged.push(token.clone());
                i += 1;
                continue;
            }
        };

        // Opening and closing quote inside one token
        if token.len() >= 2 && token.ends_with(quote) {
            merged.push(token[1..token.len() - 1].to_string());
            i += 1;
            continue;
        }

        let mut span = token[1..].to_string();
        let mut j = i + 1;
        while j < tokens.len() {
            let next = &tokens[j];
            span.push(' ');
            if next.ends_with(quote) {
                span.push_str(&next[..next.len() - 1]);
                break;
            }
            span.push_str(next);
            j += 1;
        }

        merged.push(span);
        i = j + 1;
    }

    merged
}
