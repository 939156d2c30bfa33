//! Word tokenizer with source offsets.
//!
//! A token is a run of word characters (letters, digits, `_`) that may continue
//! through single joiners: `-`, `'` or `’`, each followed by more word characters.
//! So `mother-in-law` and `don't` stay whole, while `end-` stops before the hyphen
//! and `a--b` splits into `a` and `b`.

/// A word token. `start..end` are UTF-8 byte offsets into the tokenized text,
/// so `&text[start..end] == token.text` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Regex class matching exactly the chars `is_word_char` rejects.
/// `char::is_alphanumeric` is `Alphabetic` or a `N*` general category.
pub(crate) const NON_WORD_CLASS: &str = r"[^\p{Alphabetic}\p{N}_]";

fn is_joiner(c: char) -> bool {
    matches!(c, '-' | '\'' | '\u{2019}')
}

fn char_at(text: &str, pos: usize) -> Option<char> {
    text[pos..].chars().next()
}

/// Advance past a run of word characters starting at `pos`.
fn skip_word_run(text: &str, mut pos: usize) -> usize {
    while let Some(c) = char_at(text, pos) {
        if !is_word_char(c) {
            break;
        }
        pos += c.len_utf8();
    }
    pos
}

/// Split `text` into word tokens in document order.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(c) = char_at(text, pos) {
        if !is_word_char(c) {
            pos += c.len_utf8();
            continue;
        }

        let start = pos;
        pos = skip_word_run(text, pos);

        // A joiner only belongs to the token when a word character follows it.
        while let Some(j) = char_at(text, pos).filter(|&c| is_joiner(c)) {
            let after = pos + j.len_utf8();
            match char_at(text, after) {
                Some(w) if is_word_char(w) => pos = skip_word_run(text, after),
                _ => break,
            }
        }

        tokens.push(Token {
            text: text[start..pos].to_string(),
            start,
            end: pos,
        });
    }

    tokens
}
