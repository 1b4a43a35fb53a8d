use std::borrow::Cow;
use std::sync::LazyLock;

/// Splits the interior of a parenthetical token on `;` with any adjacent
/// whitespace consumed (only whitespace touching the `;` is trimmed).
static SUB_SPLIT: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\s*;\s*").expect("valid pattern"));

/// Replace line-break characters with a NUL sentinel so they can never act
/// as token separators or leak into downstream string operations.
pub(crate) fn scrub_line_breaks(ua: &str) -> Cow<'_, str> {
    if ua.contains(['\r', '\n']) {
        Cow::Owned(ua.replace(['\r', '\n'], "\0"))
    } else {
        Cow::Borrowed(ua)
    }
}

/// Does `[^(]+\)` match at the start of `rest`?  True when a `)` appears
/// before any `(`, with at least one character in front of it, meaning the
/// whitespace we just scanned lies inside a parenthetical group.
fn inside_group(rest: &str) -> bool {
    let mut preceded = false;
    for c in rest.chars() {
        if c == '(' {
            return false;
        }
        if c == ')' && preceded {
            return true;
        }
        preceded = true;
    }
    false
}

/// Split a User-Agent string into top-level tokens: whitespace runs are
/// separators only when they fall outside a parenthetical group.
///
/// Equivalent to splitting on `\s+(?![^(]+\))`; unbalanced parentheses get
/// whatever the lookahead naturally produces, no validation is attempted.
pub(crate) fn split_tokens(ua: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut seg_start = 0;
    let mut iter = ua.char_indices().peekable();

    while let Some((i, c)) = iter.next() {
        if !c.is_whitespace() {
            continue;
        }
        // Extend to the full whitespace run.
        let mut end = i + c.len_utf8();
        while let Some(&(j, d)) = iter.peek() {
            if !d.is_whitespace() {
                break;
            }
            end = j + d.len_utf8();
            iter.next();
        }
        if !inside_group(&ua[end..]) {
            tokens.push(&ua[seg_start..i]);
            seg_start = end;
        }
    }

    tokens.push(&ua[seg_start..]);
    tokens
}

/// Split a parenthetical token's interior into sub-tokens.  The enclosing
/// parentheses are stripped first (all of them, on either side).
pub(crate) fn split_sub_tokens(token: &str) -> Vec<&str> {
    let interior = token.trim_start_matches('(').trim_end_matches(')');
    SUB_SPLIT.split(interior).collect()
}
