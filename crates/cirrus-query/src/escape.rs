//! Escaping of user text for the backend's query-string syntax.
//!
//! The backend parses the full-text query with a Lucene-style query-string grammar. User
//! text is made safe for that grammar by backslash-escaping the reserved operators while
//! leaving wildcards (`*`), fuzzy/proximity markers (`~`) and phrase quotes (`"`) alone, so
//! those keep their native meaning.

/// Single characters that are always escaped.
const RESERVED: &[char] = &[
    '+', '-', '/', '!', '(', ')', '{', '}', '[', ']', '^', '?', ':', '\\',
];

/// Escapes user text for embedding in a backend query string.
///
/// Reserved characters are prefixed with a backslash, quotes are balanced by appending a
/// trailing `"` when needed, and malformed fuzzy or proximity suffixes (`term~bogus`,
/// `"phrase"~bogus`) are turned into a literal `\~`.
pub fn escape(raw: &str) -> String {
    fix_fuzzy(&balance_quotes(&escape_reserved(raw)))
}

/// Escapes a term whose quotes are literal text rather than phrase delimiters.
///
/// This is used for words produced by the scanner, where `\"` has already been unescaped to
/// a bare quote: every quote is escaped again so it cannot open a phrase.
pub fn escape_term(text: &str) -> String {
    escape_word(text, &[])
}

/// Escapes a scanned word, keeping the characters the user escaped literal.
///
/// `escaped` holds the sorted byte offsets in `text` of characters that were
/// backslash-escaped in the query. Those are escaped again even where a bare character would
/// keep its operator meaning, so `foo\*` stays a literal asterisk and `a\ b` stays one term.
pub fn escape_word(text: &str, escaped: &[usize]) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 4);
    let mut literal = escaped.iter().copied().peekable();
    let mut chars = text.char_indices().peekable();

    while let Some((offset, ch)) = chars.next() {
        while literal.next_if(|&pos| pos < offset).is_some() {}
        let is_literal = literal.next_if_eq(&offset).is_some();

        match ch {
            c if is_literal && (c == '*' || c == '~' || c.is_whitespace()) => {
                out.push('\\');
                out.push(c);
            }
            '&' | '|' if chars.peek().map(|&(_, next)| next) == Some(ch) => {
                chars.next();
                out.push('\\');
                out.push(ch);
                out.push(ch);
            }
            c if c == '"' || RESERVED.contains(&c) => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }

    fix_fuzzy(&out)
}

/// Escapes text for use inside a quoted phrase.
pub fn escape_phrase(text: &str) -> String {
    escape_reserved(text).replace('"', "\\\"")
}

/// Prefixes every reserved character (and the `&&`/`||` operators) with a backslash.
pub fn escape_reserved(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + raw.len() / 4);
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '&' | '|' if chars.peek() == Some(&ch) => {
                chars.next();
                out.push('\\');
                out.push(ch);
                out.push(ch);
            }
            c if RESERVED.contains(&c) => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }

    out
}

/// Appends a closing quote if the string has an odd number of unescaped quotes.
///
/// A dangling trailing backslash is doubled first so the appended quote is not swallowed by
/// it.
pub fn balance_quotes(text: &str) -> String {
    let mut in_quote = false;
    let mut in_escape = false;

    for ch in text.chars() {
        if in_escape {
            in_escape = false;
            continue;
        }
        match ch {
            '"' => in_quote = !in_quote,
            '\\' => in_escape = true,
            _ => {}
        }
    }

    if !in_quote {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + 2);
    out.push_str(text);
    if in_escape {
        out.push('\\');
    }
    out.push('"');
    out
}

/// Escapes every unescaped `~` whose suffix is present but not a number.
///
/// `term~`, `term~2`, `term~0.5` and `"phrase"~3` are left untouched. Runs in linear time.
pub fn fix_fuzzy(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let numeric = numeric_suffixes(&chars);
    let mut out = String::with_capacity(text.len());
    let mut cursor = chars.iter().zip(numeric);

    while let Some((&ch, suffix_ok)) = cursor.next() {
        match ch {
            '\\' => {
                out.push(ch);
                if let Some((&next, _)) = cursor.next() {
                    out.push(next);
                }
            }
            '~' => {
                if !suffix_ok {
                    out.push('\\');
                }
                out.push('~');
            }
            c => out.push(c),
        }
    }

    out
}

/// For each position, whether the run of non-whitespace characters after it is empty or a
/// number such as `2`, `0.5`, `.5` or `2.`.
///
/// Computed right to left in one pass.
fn numeric_suffixes(chars: &[char]) -> Vec<bool> {
    let mut verdicts = vec![true; chars.len()];
    let (mut digits, mut dots, mut other) = (0_usize, 0_usize, false);

    for (verdict, &ch) in verdicts.iter_mut().zip(chars).rev() {
        let empty = digits == 0 && dots == 0 && !other;
        *verdict = empty || (!other && digits > 0 && dots <= 1);
        match ch {
            c if c.is_whitespace() => {
                digits = 0;
                dots = 0;
                other = false;
            }
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => other = true,
        }
    }

    verdicts
}
